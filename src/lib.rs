//! coffee-smoke
//!
//! A small cross-platform (native and WASM) wgpu scene: a coffee cup with
//! pre-baked lighting and an animated, noise-driven smoke plume, viewed
//! through a damped orbit camera. The crate is deliberately thin glue over
//! wgpu/winit; the one shader-heavy piece, the plume deformation, lives in
//! WGSL and is treated as a versioned asset interface.
//!
//! High-level modules
//! - `app`: event loop, render loop lifecycle and asset completion events
//! - `camera`: orbit camera state, damped controller and view/projection uniforms
//! - `context`: central GPU and window context owning device/queue/pipelines
//! - `geometry`: procedural plane generator for the plume mesh
//! - `model`: mesh/material types and draw-call plumbing
//! - `pipelines`: the two render pipelines (baked cup, translucent smoke)
//! - `resources`: async asset loading and glTF parsing
//! - `scene`: scene composition and the texture substitution gate
//! - `smoke`: the animated plume and its uniforms
//! - `texture`: GPU textures plus the sampling/transform parameter set
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod geometry;
pub mod model;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod smoke;
pub mod texture;
pub mod viewport;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
