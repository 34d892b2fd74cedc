//! The animated smoke plume above the cup.
//!
//! A subdivided plane, pivot at its base, deformed entirely on the GPU: the
//! vertex stage twists and bends it with noise lookups, the fragment stage
//! carves the plume mask out of the same tiling noise. The host only feeds a
//! monotonically increasing time uniform.

use instant::Duration;

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::geometry::{self, PlaneGeometry};
use crate::texture::{Texture, TextureSettings};

/// World position of the plume's base, just above the cup's rim.
pub const SMOKE_POSITION: [f32; 3] = [0.0, 1.83, 0.0];

/// Plane subdivisions; the vertex shader needs enough of them to bend
/// smoothly.
pub const SMOKE_SEGMENTS: (u32, u32) = (16, 64);

/// Uniform block shared by the smoke vertex and fragment stages.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SmokeUniform {
    model: [[f32; 4]; 4],
    time: f32,
    _padding: [f32; 3],
}

/// Bind group layout: uniform block, noise texture, noise sampler. The noise
/// texture is sampled in the vertex stage as well, hence the visibility.
pub fn smoke_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("smoke_bind_group_layout"),
    })
}

/// Sampling parameters for the noise texture: tiling on both axes, sampled as
/// linear data.
pub fn noise_texture_settings() -> TextureSettings {
    TextureSettings {
        wrap_u: wgpu::AddressMode::Repeat,
        wrap_v: wgpu::AddressMode::Repeat,
        srgb: false,
        ..Default::default()
    }
}

#[derive(Debug)]
pub struct SmokePlume {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
    uniform: SmokeUniform,
    uniform_buffer: wgpu::Buffer,
    noise: Texture,
    bind_group: wgpu::BindGroup,
}

impl SmokePlume {
    /// The plume mesh: a unit plane with its pivot moved to the base, then
    /// stretched tall and slightly widened.
    pub fn geometry() -> PlaneGeometry {
        let mut plane = geometry::plane(1.0, 1.0, SMOKE_SEGMENTS.0, SMOKE_SEGMENTS.1);
        plane.translate(0.0, 0.5, 0.0).scale(1.5, 6.0, 1.5);
        plane
    }

    /// Compose the plume with a placeholder noise texture; the real one is
    /// swapped in when its load completes.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let plume = Self::geometry();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Smoke Vertex Buffer"),
            contents: bytemuck::cast_slice(&plume.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Smoke Index Buffer"),
            contents: bytemuck::cast_slice(&plume.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let model = Matrix4::from_translation(Vector3::from(SMOKE_POSITION));
        let uniform = SmokeUniform {
            model: model.into(),
            time: 0.0,
            _padding: [0.0; 3],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Smoke Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let noise = Texture::placeholder(device, queue, noise_texture_settings(), "noise placeholder");
        let bind_group = Self::mk_bind_group(device, &uniform_buffer, &noise);

        Self {
            vertex_buffer,
            index_buffer,
            num_elements: plume.indices.len() as u32,
            uniform,
            uniform_buffer,
            noise,
            bind_group,
        }
    }

    fn mk_bind_group(
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        noise: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &smoke_bind_group_layout(device),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&noise.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&noise.sampler),
                },
            ],
            label: Some("smoke bind group"),
        })
    }

    /// Swap the placeholder for the loaded noise texture.
    pub fn set_noise_texture(&mut self, device: &wgpu::Device, noise: Texture) {
        self.bind_group = Self::mk_bind_group(device, &self.uniform_buffer, &noise);
        self.noise = noise;
    }

    /// Advance the time uniform. `elapsed` comes from the render loop's
    /// monotonic clock, so the value never decreases.
    pub fn update(&mut self, queue: &wgpu::Queue, elapsed: Duration) {
        self.uniform.time = elapsed.as_secs_f32();
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    pub fn time(&self) -> f32 {
        self.uniform.time
    }

    pub fn draw<'a, 'b>(
        &'b self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'b wgpu::BindGroup,
    ) where
        'b: 'a,
    {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_bind_group(1, camera_bind_group, &[]);
        render_pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}
