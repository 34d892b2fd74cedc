//! Scene composition and the asynchronous asset hand-off.
//!
//! The scene is composed once at startup: the smoke plume immediately, the
//! cup model whenever its load completes. The baked-texture substitution is
//! gated on two causally independent loads (model and replacement image);
//! [`TextureSwapGate`] makes that two-stage continuation explicit and
//! order-independent.

use anyhow::*;

use crate::model::{Material, Model, baked_texture_layout};
use crate::resources::LoadedModel;
use crate::smoke::SmokePlume;
use crate::texture::{Texture, TextureSettings};

/// The uploaded cup model plus what the substitution needs later: which
/// material carries the baked map and the settings it shipped with.
#[derive(Debug)]
pub struct CupModel {
    pub model: Model,
    pub baked_material: usize,
}

impl CupModel {
    /// Settings of the currently bound baked map.
    pub fn baked_settings(&self) -> &TextureSettings {
        &self.model.materials[self.baked_material].texture.settings
    }
}

#[derive(Debug)]
pub struct Scene {
    pub cup: Option<CupModel>,
    pub smoke: SmokePlume,
}

impl Scene {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            cup: None,
            smoke: SmokePlume::new(device, queue),
        }
    }

    /// Upload the loaded model and attach it to the scene.
    ///
    /// Panics if the model lacks a node named `"baked"` — such a model cannot
    /// carry the lightmap and there is no fallback. Returns the original
    /// baked-texture settings for the pending substitution.
    pub fn attach_cup(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        loaded: LoadedModel,
    ) -> Result<TextureSettings> {
        let baked = loaded.baked_mesh();
        log::debug!(
            "baked node: {} vertices, {} indices, material {}",
            baked.vertices.len(),
            baked.indices.len(),
            baked.material
        );
        let baked_material = baked.material;

        let layout = baked_texture_layout(device);
        let mut materials = Vec::with_capacity(loaded.materials.len());
        for loaded_material in &loaded.materials {
            log::debug!(
                "material {:?}: {:?}",
                loaded_material.name,
                loaded_material.settings
            );
            let texture = Texture::from_image(
                device,
                queue,
                &loaded_material.image,
                loaded_material.settings.clone(),
                &loaded_material.name,
            )?;
            materials.push(Material::new(device, &loaded_material.name, texture, &layout));
        }

        let meshes = loaded.meshes.iter().map(|mesh| mesh.upload(device)).collect();

        let settings = loaded.materials[baked_material].settings.clone();
        self.cup = Some(CupModel {
            model: Model { meshes, materials },
            baked_material,
        });
        Ok(settings)
    }

    /// Swap the baked map for the replacement image.
    ///
    /// The replacement inherits every sampling/transform parameter of the
    /// original before any GPU resource is created from it, so UV behaviour
    /// is unchanged by the swap; only pixel content differs.
    pub fn swap_baked_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: image::DynamicImage,
    ) -> Result<()> {
        let cup = self
            .cup
            .as_mut()
            .context("texture swap requested before the model was attached")?;

        let mut settings = TextureSettings::default();
        settings.copy_transform_from(cup.baked_settings());
        log::debug!("replacement baked texture inherits: {:?}", settings);

        let texture = Texture::from_image(device, queue, &image, settings, "baked replacement")?;
        cup.model.materials[cup.baked_material].set_texture(device, queue, texture);
        Ok(())
    }
}

/// Order-independent join of the two loads feeding the texture substitution.
///
/// The swap may only run once the model is attached *and* the replacement
/// image has arrived; the two loads race freely. `take_ready` yields the
/// image exactly once, when both conditions hold.
#[derive(Debug, Default)]
pub struct TextureSwapGate {
    model_attached: bool,
    replacement: Option<image::DynamicImage>,
}

impl TextureSwapGate {
    pub fn model_attached(&mut self) {
        self.model_attached = true;
    }

    pub fn replacement_loaded(&mut self, image: image::DynamicImage) {
        if self.replacement.is_some() {
            log::warn!("replacement baked texture delivered twice; keeping the first");
            return;
        }
        self.replacement = Some(image);
    }

    pub fn take_ready(&mut self) -> Option<image::DynamicImage> {
        if self.model_attached {
            self.replacement.take()
        } else {
            None
        }
    }
}
