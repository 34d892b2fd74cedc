//! Asynchronous asset loading.
//!
//! All loaders are CPU-only: they fetch bytes (filesystem on native, HTTP
//! against the page origin on wasm) and decode them into plain data. GPU
//! upload happens later on the event-loop thread. A load that fails is logged
//! by the caller and its visual element simply stays absent; there is no
//! retry and no cancellation.

use anyhow::*;
use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix};

use crate::model::{MeshData, ModelVertex};
use crate::texture::TextureSettings;

/// Fixed relative asset paths, resolved under `assets/`.
pub const MODEL_PATH: &str = "bakedModel.glb";
pub const BAKED_TEXTURE_PATH: &str = "baked.jpg";
pub const NOISE_TEXTURE_PATH: &str = "perlin.png";

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/assets/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_binary(file_name: &str) -> Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

/// Decode an image asset.
pub async fn load_texture_image(file_name: &str) -> Result<image::DynamicImage> {
    let data = load_binary(file_name).await?;
    Ok(image::load_from_memory(&data)?)
}

/// A decoded material image together with the sampling parameters the model
/// file declares for it.
#[derive(Clone, Debug)]
pub struct LoadedMaterial {
    pub name: String,
    pub image: image::DynamicImage,
    pub settings: TextureSettings,
}

/// CPU-side parse result of the model asset: named meshes in world space plus
/// their materials.
#[derive(Clone, Debug, Default)]
pub struct LoadedModel {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<LoadedMaterial>,
}

impl LoadedModel {
    pub fn mesh_by_name(&self, name: &str) -> Option<&MeshData> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }

    /// The mesh carrying the baked lightmap. A model without it cannot be
    /// shown at all, so the lookup is not recoverable.
    pub fn baked_mesh(&self) -> &MeshData {
        self.mesh_by_name("baked")
            .expect("model has no node named \"baked\"")
    }
}

fn address_mode(mode: gltf::texture::WrappingMode) -> wgpu::AddressMode {
    match mode {
        gltf::texture::WrappingMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        gltf::texture::WrappingMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        gltf::texture::WrappingMode::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn mag_filter(filter: gltf::texture::MagFilter) -> wgpu::FilterMode {
    match filter {
        gltf::texture::MagFilter::Nearest => wgpu::FilterMode::Nearest,
        gltf::texture::MagFilter::Linear => wgpu::FilterMode::Linear,
    }
}

fn min_filter(filter: gltf::texture::MinFilter) -> wgpu::FilterMode {
    use gltf::texture::MinFilter::*;
    match filter {
        Nearest | NearestMipmapNearest | NearestMipmapLinear => wgpu::FilterMode::Nearest,
        Linear | LinearMipmapNearest | LinearMipmapLinear => wgpu::FilterMode::Linear,
    }
}

/// Load and parse the glTF model.
///
/// Buffers and images may live in the binary blob or behind separate URIs;
/// both are resolved here. Node transforms are baked into the vertex data so
/// the render side needs no per-mesh matrix.
pub async fn load_gltf_model(file_name: &str) -> Result<LoadedModel> {
    let bytes = load_binary(file_name).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_binary(uri).await?);
            }
        }
    }

    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let info = pbr
            .base_color_texture()
            .context("material has no base colour texture")?;

        let mut settings = TextureSettings::default();
        let sampler = info.texture().sampler();
        settings.wrap_u = address_mode(sampler.wrap_s());
        settings.wrap_v = address_mode(sampler.wrap_t());
        if let Some(filter) = sampler.mag_filter() {
            settings.mag_filter = mag_filter(filter);
        }
        if let Some(filter) = sampler.min_filter() {
            settings.min_filter = min_filter(filter);
        }
        if let Some(transform) = info.texture_transform() {
            settings.offset = transform.offset().into();
            settings.rotation = transform.rotation();
            settings.repeat = transform.scale().into();
        }

        let image = match info.texture().source().source() {
            gltf::image::Source::View { view, mime_type: _ } => {
                let start = view.offset();
                let end = start + view.length();
                image::load_from_memory(&buffer_data[view.buffer().index()][start..end])?
            }
            gltf::image::Source::Uri { uri, mime_type: _ } => {
                image::load_from_memory(&load_binary(uri).await?)?
            }
        };

        materials.push(LoadedMaterial {
            name: material.name().unwrap_or("unnamed").to_string(),
            image,
            settings,
        });
    }

    let mut meshes = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            collect_meshes(&node, &buffer_data, Matrix4::identity(), &mut meshes);
        }
    }

    Ok(LoadedModel { meshes, materials })
}

fn collect_meshes(
    node: &gltf::Node,
    buffers: &[Vec<u8>],
    parent: Matrix4<f32>,
    out: &mut Vec<MeshData>,
) {
    let local: Matrix4<f32> = node.transform().matrix().into();
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        let normal_matrix = normal_matrix(&world);
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.as_slice()));

            let mut vertices = Vec::new();
            if let Some(positions) = reader.read_positions() {
                for position in positions {
                    let p = world * cgmath::Vector4::new(position[0], position[1], position[2], 1.0);
                    vertices.push(ModelVertex {
                        position: [p.x, p.y, p.z],
                        tex_coords: Default::default(),
                        normal: Default::default(),
                    });
                }
            }
            if let Some(normals) = reader.read_normals() {
                for (i, normal) in normals.enumerate() {
                    if let Some(vertex) = vertices.get_mut(i) {
                        let n = (normal_matrix * cgmath::Vector3::from(normal)).normalize();
                        vertex.normal = n.into();
                    }
                }
            }
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|tc| tc.into_f32()) {
                for (i, uv) in tex_coords.enumerate() {
                    if let Some(vertex) = vertices.get_mut(i) {
                        vertex.tex_coords = uv;
                    }
                }
            }

            let mut indices = Vec::new();
            if let Some(raw) = reader.read_indices() {
                indices.extend(raw.into_u32());
            }

            let material = primitive.material().index().unwrap_or(0);
            out.push(MeshData {
                name: node.name().unwrap_or("unnamed").to_string(),
                vertices,
                indices,
                material,
            });
        }
    }

    for child in node.children() {
        collect_meshes(&child, buffers, world, out);
    }
}

fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(
        world.x.truncate(),
        world.y.truncate(),
        world.z.truncate(),
    );
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}
