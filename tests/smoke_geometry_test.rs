use coffee_smoke::geometry;
use coffee_smoke::smoke::{SMOKE_POSITION, SMOKE_SEGMENTS, SmokePlume};

#[test]
fn plume_sits_above_the_cup() {
    assert_eq!(SMOKE_POSITION, [0.0, 1.83, 0.0]);
}

#[test]
fn plume_scale_relative_to_unit_plane() {
    let unit = geometry::plane(1.0, 1.0, SMOKE_SEGMENTS.0, SMOKE_SEGMENTS.1);
    let plume = SmokePlume::geometry();

    let unit_size = unit.bounds().size();
    let plume_size = plume.bounds().size();

    assert!((plume_size[0] / unit_size[0] - 1.5).abs() < 1e-6);
    assert!((plume_size[1] / unit_size[1] - 6.0).abs() < 1e-6);
    // The plane is flat; depth stays zero through the 1.5x scale.
    assert_eq!(unit_size[2], 0.0);
    assert_eq!(plume_size[2], 0.0);
}

#[test]
fn plume_pivot_is_at_its_base() {
    let bounds = SmokePlume::geometry().bounds();
    assert!((bounds.min[1] - 0.0).abs() < 1e-6);
    assert!((bounds.max[1] - 6.0).abs() < 1e-6);
    assert!((bounds.min[0] + 0.75).abs() < 1e-6);
    assert!((bounds.max[0] - 0.75).abs() < 1e-6);
}

#[test]
fn subdivision_counts() {
    let plume = SmokePlume::geometry();
    let (sx, sy) = SMOKE_SEGMENTS;
    assert_eq!(plume.vertices.len(), ((sx + 1) * (sy + 1)) as usize);
    assert_eq!(plume.indices.len(), (sx * sy * 6) as usize);
}

#[test]
fn uvs_run_zero_to_one_bottom_to_top() {
    let plume = SmokePlume::geometry();
    for vertex in &plume.vertices {
        assert!((0.0..=1.0).contains(&vertex.tex_coords[0]));
        assert!((0.0..=1.0).contains(&vertex.tex_coords[1]));
        if (vertex.position[1] - 6.0).abs() < 1e-6 {
            assert_eq!(vertex.tex_coords[1], 1.0);
        }
        if vertex.position[1].abs() < 1e-6 {
            assert_eq!(vertex.tex_coords[1], 0.0);
        }
    }
}

#[test]
fn indices_stay_in_bounds() {
    let plume = SmokePlume::geometry();
    let max = *plume.indices.iter().max().unwrap();
    assert!((max as usize) < plume.vertices.len());
}
