//! The render context: every GPU- and window-side entity the scene needs,
//! owned by one struct and passed by reference to the render loop and the
//! resize handler.

use std::sync::Arc;

use anyhow::*;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::{self, CameraResources, CameraUniform, Projection};
use crate::pipelines::Pipelines;
use crate::texture::Texture;
use crate::viewport::Viewport;

#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub viewport: Viewport,
    pub projection: Projection,
    pub camera: CameraResources,
    pub depth_texture: Texture,
    pub clear_colour: wgpu::Color,
    pub pipelines: Pipelines,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let logical: winit::dpi::LogicalSize<u32> = size.to_logical(scale_factor);
        let viewport = Viewport::new(logical.width, logical.height, scale_factor);

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        log::info!("surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface; a linear one would come out
        // darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let (render_width, render_height) = viewport.render_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: render_width,
            height: render_height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // The rig orbits a point a little above the cup, looking in from up
        // high.
        let camera = camera::Camera::new((8.0, 10.0, 12.0), (0.0, 3.0, 0.0));
        let projection = Projection::new(
            viewport.width,
            viewport.height,
            cgmath::Deg(25.0),
            0.1,
            100.0,
        );
        let camera_controller = camera::OrbitController::new(0.005, 0.1);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipelines = Pipelines::new(&device, &config, &camera_bind_group_layout);

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            viewport,
            projection,
            camera,
            depth_texture,
            clear_colour: wgpu::Color::BLACK,
            pipelines,
        })
    }
}
