use coffee_smoke::camera::Projection;
use coffee_smoke::viewport::{MAX_PIXEL_RATIO, Viewport};

#[test]
fn aspect_follows_resize() {
    let mut viewport = Viewport::new(1920, 1080, 1.0);
    assert_eq!(viewport.aspect(), 1920.0 / 1080.0);

    viewport.resize(1280, 720, 1.0);
    assert_eq!(viewport.aspect(), 1280.0 / 720.0);

    let mut projection = Projection::new(1920, 1080, cgmath::Deg(25.0), 0.1, 100.0);
    projection.resize(viewport.width, viewport.height);
    assert_eq!(projection.aspect(), viewport.aspect());
}

#[test]
fn render_size_matches_viewport_at_ratio_one() {
    let viewport = Viewport::new(1024, 768, 1.0);
    assert_eq!(viewport.render_size(), (1024, 768));
}

#[test]
fn pixel_ratio_never_exceeds_two() {
    let viewport = Viewport::new(800, 600, 3.0);
    assert_eq!(viewport.pixel_ratio, MAX_PIXEL_RATIO);
    assert_eq!(viewport.render_size(), (1600, 1200));

    let mut viewport = Viewport::new(800, 600, 1.5);
    assert_eq!(viewport.pixel_ratio, 1.5);
    assert_eq!(viewport.render_size(), (1200, 900));

    viewport.resize(800, 600, 4.0);
    assert_eq!(viewport.pixel_ratio, MAX_PIXEL_RATIO);
}

#[test]
fn degenerate_sizes_stay_well_formed() {
    let viewport = Viewport::new(640, 0, 1.0);
    assert!(viewport.aspect().is_finite());

    let viewport = Viewport::new(0, 0, 2.0);
    assert_eq!(viewport.render_size(), (1, 1));
}
