//! GPU textures plus the sampling/transform parameter set that travels with
//! them.
//!
//! [`TextureSettings`] captures every parameter that shapes how an image is
//! sampled and mapped: wrap modes, filters, anisotropy, the UV transform
//! (repeat/offset/rotation/center), colour space, vertical flip and alpha
//! handling. Keeping it separate from the pixel data is what makes the baked
//! texture substitution safe: the replacement image inherits the complete
//! parameter set of the original before any GPU resource is built from it, so
//! a partially configured texture can never reach a material.

use anyhow::*;
use cgmath::{Matrix3, SquareMatrix, Vector2};
use image::GenericImageView;

/// How the texture is projected onto geometry. Everything this scene loads is
/// plain UV mapped; the variant exists because the mapping mode is one of the
/// parameters carried across the texture substitution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureMapping {
    #[default]
    Uv,
}

/// Sampling and UV-transform parameters of a texture.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSettings {
    pub wrap_u: wgpu::AddressMode,
    pub wrap_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub anisotropy: u16,
    pub repeat: Vector2<f32>,
    pub offset: Vector2<f32>,
    /// Rotation around `center`, in radians.
    pub rotation: f32,
    pub center: Vector2<f32>,
    pub flip_y: bool,
    /// Interpret the pixel data as sRGB rather than linear.
    pub srgb: bool,
    pub mapping: TextureMapping,
    pub premultiply_alpha: bool,
    /// Stored UV transform, used verbatim when `matrix_auto_update` is off.
    pub matrix: Matrix3<f32>,
    pub matrix_auto_update: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            wrap_u: wgpu::AddressMode::ClampToEdge,
            wrap_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            anisotropy: 1,
            repeat: Vector2::new(1.0, 1.0),
            offset: Vector2::new(0.0, 0.0),
            rotation: 0.0,
            center: Vector2::new(0.0, 0.0),
            flip_y: false,
            srgb: true,
            mapping: TextureMapping::Uv,
            premultiply_alpha: false,
            matrix: Matrix3::identity(),
            matrix_auto_update: true,
        }
    }
}

impl TextureSettings {
    /// Copy every sampling/transform parameter from `other`.
    ///
    /// This is the parameter transfer of the baked-texture substitution: after
    /// the call, UV mapping, wrapping, filtering and colour-space behaviour of
    /// `self` are indistinguishable from `other` — only the pixel content may
    /// differ.
    pub fn copy_transform_from(&mut self, other: &TextureSettings) {
        self.anisotropy = other.anisotropy;
        self.wrap_u = other.wrap_u;
        self.wrap_v = other.wrap_v;
        self.repeat = other.repeat;
        self.offset = other.offset;
        self.rotation = other.rotation;
        self.center = other.center;
        self.flip_y = other.flip_y;
        self.srgb = other.srgb;
        self.min_filter = other.min_filter;
        self.mag_filter = other.mag_filter;
        self.mapping = other.mapping;
        self.premultiply_alpha = other.premultiply_alpha;
        self.matrix = other.matrix;
        self.matrix_auto_update = other.matrix_auto_update;
    }

    /// The 3x3 UV transform fed to the vertex shader.
    ///
    /// Composed from offset/repeat/rotation/center while auto update is on;
    /// otherwise the stored matrix is authoritative.
    pub fn uv_matrix(&self) -> Matrix3<f32> {
        if !self.matrix_auto_update {
            return self.matrix;
        }
        let (s, c) = self.rotation.sin_cos();
        let Vector2 { x: sx, y: sy } = self.repeat;
        let Vector2 { x: ox, y: oy } = self.offset;
        let Vector2 { x: cx, y: cy } = self.center;
        Matrix3::new(
            sx * c,
            -sy * s,
            0.0,
            sx * s,
            sy * c,
            0.0,
            -sx * (c * cx + s * cy) + cx + ox,
            -sy * (-s * cx + c * cy) + cy + oy,
            1.0,
        )
    }

    /// Build the wgpu sampler described by these settings.
    pub fn sampler(&self, device: &wgpu::Device) -> wgpu::Sampler {
        // Anisotropic filtering requires all filters to be linear.
        let linear = self.mag_filter == wgpu::FilterMode::Linear
            && self.min_filter == wgpu::FilterMode::Linear;
        device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: self.wrap_u,
            address_mode_v: self.wrap_v,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: if linear { self.anisotropy.max(1) } else { 1 },
            ..Default::default()
        })
    }

    fn format(&self) -> wgpu::TextureFormat {
        if self.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

/// A GPU texture with its view, sampler and the settings it was built from.
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub settings: TextureSettings,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture matching the render surface.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            settings: TextureSettings::default(),
        }
    }

    /// Upload a decoded image under the given settings.
    ///
    /// The settings must be complete before this is called; flip, colour
    /// space and alpha handling are applied here and the sampler is derived
    /// from the wrap/filter parameters.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        settings: TextureSettings,
        label: &str,
    ) -> Result<Self> {
        let dimensions = img.dimensions();
        let mut rgba = if settings.flip_y {
            img.flipv().to_rgba8()
        } else {
            img.to_rgba8()
        };
        if settings.premultiply_alpha {
            for pixel in rgba.pixels_mut() {
                let a = pixel[3] as u32;
                for c in 0..3 {
                    pixel[c] = ((pixel[c] as u32 * a) / 255) as u8;
                }
            }
        }

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: settings.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = settings.sampler(device);

        Ok(Self {
            texture,
            view,
            sampler,
            settings,
        })
    }

    /// A 1x1 black texture used until an async image load lands.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        settings: TextureSettings,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: settings.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &[0, 0, 0, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = settings.sampler(device);
        Self {
            texture,
            view,
            sampler,
            settings,
        }
    }
}
