//! Orbit camera rig: camera state, projection, damped controller and the GPU
//! uniform that feeds the shaders.
//!
//! The camera orbits a fixed target point. Pointer drags and scroll wheel
//! input accumulate into goal angles on the controller; `update` eases the
//! camera towards those goals every frame, which gives the damped (inertia
//! like) feel. `update` must run once per frame before the draw call or the
//! interaction appears stale.

use instant::Duration;

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::event::{MouseButton, MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 80.0;
// Keep the pitch strictly inside the poles so look_at stays well defined.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera state: target point plus spherical coordinates around it.
#[derive(Clone, Debug)]
pub struct Camera {
    pub target: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub distance: f32,
}

impl Camera {
    /// Build the orbit state that places the eye at `position` looking at
    /// `target`.
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        let position = position.into();
        let target = target.into();
        let offset = position - target;
        let distance = offset.magnitude();
        Self {
            target,
            yaw: Rad(offset.x.atan2(offset.z)),
            pitch: Rad((offset.y / distance).asin()),
            distance,
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        self.target
            + self.distance * Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), self.target, Vector3::unit_y())
    }
}

/// Perspective projection, aspect kept in sync with the viewport.
#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Damped orbit controller.
///
/// Input mutates the goal angles; [`OrbitController::update`] interpolates the
/// camera towards them. With damping disabled the camera snaps to the goal in
/// a single update.
#[derive(Debug)]
pub struct OrbitController {
    goal_yaw: Rad<f32>,
    goal_pitch: Rad<f32>,
    goal_distance: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    pub enable_damping: bool,
    damping_factor: f32,
    dragging: bool,
    synced: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            goal_yaw: Rad(0.0),
            goal_pitch: Rad(0.0),
            goal_distance: 1.0,
            rotate_speed,
            zoom_speed,
            enable_damping: true,
            damping_factor: 0.05,
            dragging: false,
            synced: false,
        }
    }

    /// Track button state and wheel zoom. Anything else is ignored, malformed
    /// pointer input never reaches the goal angles.
    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.dragging = state.is_pressed(),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.zoom(lines);
            }
            _ => (),
        }
    }

    /// Raw pointer motion; only applied while the drag button is held.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.rotate(dx as f32, dy as f32);
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.goal_yaw -= Rad(dx * self.rotate_speed);
        self.goal_pitch = Rad(
            (self.goal_pitch.0 + dy * self.rotate_speed).clamp(-MAX_PITCH, MAX_PITCH),
        );
    }

    pub fn zoom(&mut self, delta: f32) {
        self.goal_distance =
            (self.goal_distance * (1.0 - delta * self.zoom_speed)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance the damped interpolation. Must be called once per frame before
    /// the draw call.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        if !self.synced {
            // Adopt the camera's start pose as the initial goal.
            self.goal_yaw = camera.yaw;
            self.goal_pitch = camera.pitch;
            self.goal_distance = camera.distance;
            self.synced = true;
        }
        let t = if self.enable_damping {
            (self.damping_factor * dt.as_secs_f32() * 60.0).min(1.0)
        } else {
            1.0
        };
        camera.yaw += (self.goal_yaw - camera.yaw) * t;
        camera.pitch += (self.goal_pitch - camera.pitch) * t;
        camera.distance += (self.goal_distance - camera.distance) * t;
    }
}

/// Camera data as the shaders see it.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.eye().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything camera-related the render context owns: state, controller and
/// the GPU-side uniform resources.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
