use cgmath::{Matrix3, SquareMatrix, Vector2, Vector3};
use coffee_smoke::texture::{TextureMapping, TextureSettings};

/// A parameter set where every field differs from the defaults.
fn distinctive_settings() -> TextureSettings {
    TextureSettings {
        wrap_u: wgpu::AddressMode::Repeat,
        wrap_v: wgpu::AddressMode::MirrorRepeat,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        anisotropy: 8,
        repeat: Vector2::new(2.0, 3.0),
        offset: Vector2::new(0.25, 0.5),
        rotation: 0.7,
        center: Vector2::new(0.5, 0.5),
        flip_y: true,
        srgb: false,
        mapping: TextureMapping::Uv,
        premultiply_alpha: true,
        matrix: Matrix3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.5, 0.5, 1.0),
        matrix_auto_update: false,
    }
}

#[test]
fn every_parameter_is_copied() {
    let original = distinctive_settings();
    let mut replacement = TextureSettings::default();
    replacement.copy_transform_from(&original);

    assert_eq!(replacement.anisotropy, original.anisotropy);
    assert_eq!(replacement.wrap_u, original.wrap_u);
    assert_eq!(replacement.wrap_v, original.wrap_v);
    assert_eq!(replacement.repeat, original.repeat);
    assert_eq!(replacement.offset, original.offset);
    assert_eq!(replacement.rotation, original.rotation);
    assert_eq!(replacement.center, original.center);
    assert_eq!(replacement.flip_y, original.flip_y);
    assert_eq!(replacement.srgb, original.srgb);
    assert_eq!(replacement.min_filter, original.min_filter);
    assert_eq!(replacement.mag_filter, original.mag_filter);
    assert_eq!(replacement.mapping, original.mapping);
    assert_eq!(replacement.premultiply_alpha, original.premultiply_alpha);
    assert_eq!(replacement.matrix, original.matrix);
    assert_eq!(replacement.matrix_auto_update, original.matrix_auto_update);

    // Nothing left over: the structs compare equal as a whole.
    assert_eq!(replacement, original);
}

#[test]
fn default_uv_matrix_is_identity() {
    let settings = TextureSettings::default();
    assert_eq!(settings.uv_matrix(), Matrix3::identity());
}

#[test]
fn uv_matrix_applies_repeat_and_offset() {
    let settings = TextureSettings {
        repeat: Vector2::new(2.0, 3.0),
        offset: Vector2::new(0.1, 0.2),
        ..Default::default()
    };
    let uv = settings.uv_matrix() * Vector3::new(1.0, 1.0, 1.0);
    assert!((uv.x - 2.1).abs() < 1e-6);
    assert!((uv.y - 3.2).abs() < 1e-6);
}

#[test]
fn uv_rotation_pivots_around_center() {
    let settings = TextureSettings {
        rotation: 0.7,
        center: Vector2::new(0.5, 0.5),
        ..Default::default()
    };
    // The pivot itself must not move under rotation.
    let uv = settings.uv_matrix() * Vector3::new(0.5, 0.5, 1.0);
    assert!((uv.x - 0.5).abs() < 1e-6);
    assert!((uv.y - 0.5).abs() < 1e-6);
}

#[test]
fn stored_matrix_wins_when_auto_update_is_off() {
    let stored = Matrix3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.5, 0.5, 1.0);
    let settings = TextureSettings {
        // These would produce a very different matrix if composed.
        repeat: Vector2::new(9.0, 9.0),
        rotation: 1.0,
        matrix: stored,
        matrix_auto_update: false,
        ..Default::default()
    };
    assert_eq!(settings.uv_matrix(), stored);
}
