use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// The scene expects its three assets (the baked cup model, the replacement
/// baked texture and the tiling noise pattern) next to the binary.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/bakedModel.glb");
    println!("cargo:rerun-if-changed=assets/baked.jpg");
    println!("cargo:rerun-if-changed=assets/perlin.png");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if assets_src.exists() {
        copy_items(&["assets/"], out_dir, &copy_options)?;
    }

    Ok(())
}
