use super::*;
use crate::assets::store::AssetKey;
use crate::foundation::core::Canvas;
use crate::scene::model::{FontWeight, TextAlign};

fn scene_with_label(label: &str, name: &str) -> Scene {
    let text = Node::new(
        name,
        NodeKind::Text(TextSpec {
            text: label.to_owned(),
            font_size: 21.0,
            weight: FontWeight::Semibold,
            color: Rgba8Premul::opaque(255, 255, 255),
            letter_spacing: 0.8,
            box_size: Size::new(190.0, 48.0),
            align: TextAlign::Center,
            ellipsize: false,
        }),
    );
    let bell = Node::new(
        "bell",
        NodeKind::Image {
            asset: AssetKey::Bell,
            size: Size::new(39.2, 39.2),
            filter: FilterChain::none(),
        },
    );
    Scene {
        canvas: Canvas {
            width: 1920,
            height: 1080,
        },
        root: Node::group("root", vec![text, bell]),
    }
}

#[test]
fn fingerprint_is_deterministic() {
    let a = fingerprint_scene(&scene_with_label("Subscribe", "label"));
    let b = fingerprint_scene(&scene_with_label("Subscribe", "label"));
    assert_eq!(a, b);
}

#[test]
fn fingerprint_ignores_names_but_not_content() {
    let base = fingerprint_scene(&scene_with_label("Subscribe", "label"));
    assert_eq!(base, fingerprint_scene(&scene_with_label("Subscribe", "other")));
    assert_ne!(base, fingerprint_scene(&scene_with_label("Subscribed", "label")));

    let mut moved = scene_with_label("Subscribe", "label");
    moved.root.transform = Affine::translate((0.0, 0.5));
    assert_ne!(base, fingerprint_scene(&moved));
}

#[test]
fn filter_keys_distinguish_chains() {
    let grey = FilterChain::parse("brightness(0) invert(40%)").unwrap();
    let black = FilterChain::parse("brightness(0)").unwrap();
    assert_eq!(filter_key(&grey), filter_key(&grey.clone()));
    assert_ne!(filter_key(&grey), filter_key(&black));
    assert_ne!(filter_key(&FilterChain::none()), filter_key(&black));
}
