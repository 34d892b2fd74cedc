use crate::model::{self, Vertex, baked_texture_layout};
use crate::pipelines::mk_render_pipeline;
use crate::texture::Texture;

/// Opaque pipeline for the baked cup model: straight texture lookup, lighting
/// is already baked into the map.
pub fn mk_baked_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Baked Pipeline Layout"),
        bind_group_layouts: &[&baked_texture_layout(device), camera_bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Baked Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("baked.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        true,
        Some(wgpu::Face::Back),
        &[model::ModelVertex::desc()],
        shader,
    )
}
