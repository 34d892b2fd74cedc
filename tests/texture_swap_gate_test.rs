use coffee_smoke::model::MeshData;
use coffee_smoke::resources::LoadedModel;
use coffee_smoke::scene::TextureSwapGate;

fn replacement() -> image::DynamicImage {
    image::DynamicImage::new_rgba8(2, 2)
}

#[test]
fn swap_waits_for_both_loads_model_first() {
    let mut gate = TextureSwapGate::default();

    gate.model_attached();
    assert!(gate.take_ready().is_none());

    gate.replacement_loaded(replacement());
    assert!(gate.take_ready().is_some());
}

#[test]
fn swap_waits_for_both_loads_image_first() {
    let mut gate = TextureSwapGate::default();

    gate.replacement_loaded(replacement());
    assert!(gate.take_ready().is_none());

    gate.model_attached();
    assert!(gate.take_ready().is_some());
}

#[test]
fn swap_fires_exactly_once() {
    let mut gate = TextureSwapGate::default();
    gate.model_attached();
    gate.replacement_loaded(replacement());

    assert!(gate.take_ready().is_some());
    assert!(gate.take_ready().is_none());
}

#[test]
fn duplicate_delivery_keeps_the_first_image() {
    let mut gate = TextureSwapGate::default();
    gate.replacement_loaded(image::DynamicImage::new_rgba8(4, 4));
    gate.replacement_loaded(image::DynamicImage::new_rgba8(16, 16));
    gate.model_attached();

    use image::GenericImageView;
    let image = gate.take_ready().unwrap();
    assert_eq!(image.dimensions(), (4, 4));
}

fn mesh(name: &str) -> MeshData {
    MeshData {
        name: name.to_string(),
        vertices: Vec::new(),
        indices: Vec::new(),
        material: 0,
    }
}

#[test]
fn named_node_lookup() {
    let model = LoadedModel {
        meshes: vec![mesh("table"), mesh("baked")],
        materials: Vec::new(),
    };
    assert!(model.mesh_by_name("baked").is_some());
    assert!(model.mesh_by_name("saucer").is_none());
}

#[test]
#[should_panic(expected = "no node named")]
fn model_without_baked_node_is_a_hard_failure() {
    // Documented behaviour: a model that loads fine but lacks the "baked"
    // node cannot be shown, and the attach path does not paper over it.
    let model = LoadedModel {
        meshes: vec![mesh("table")],
        materials: Vec::new(),
    };
    model.baked_mesh();
}
