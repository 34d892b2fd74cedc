use crate::model::{self, Vertex};
use crate::pipelines::mk_render_pipeline;
use crate::smoke::smoke_bind_group_layout;
use crate::texture::Texture;

/// Translucent pipeline for the smoke plume: double-sided, alpha blended,
/// depth writes disabled so the plume never occludes geometry behind it while
/// still being depth-tested against it.
pub fn mk_smoke_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Smoke Pipeline Layout"),
        bind_group_layouts: &[&smoke_bind_group_layout(device), camera_bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Smoke Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("smoke.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        false,
        None,
        &[model::ModelVertex::desc()],
        shader,
    )
}
