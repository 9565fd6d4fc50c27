use super::*;

fn sample() -> Scene {
    let card = Node::new(
        "card",
        NodeKind::Rect {
            size: Size::new(773.0, 185.0),
            radius: 16.0,
            fill: Rgba8Premul::opaque(255, 255, 255),
        },
    );
    let thumb = Node::new(
        "thumb",
        NodeKind::Image {
            asset: AssetKey::ThumbsUp,
            size: Size::new(75.6, 75.6),
            filter: FilterChain::parse("brightness(0)").unwrap(),
        },
    )
    .with_transform(Affine::translate((391.0, 53.2)));
    Scene {
        canvas: Canvas {
            width: 1920,
            height: 1080,
        },
        root: Node::group("root", vec![card, thumb]),
    }
}

#[test]
fn find_walks_groups() {
    let scene = sample();
    assert_eq!(scene.root.children().len(), 2);
    assert!(scene.root.find("thumb").is_some());
    assert!(scene.root.find("bell").is_none());
    assert!(scene.root.find("card").unwrap().children().is_empty());
}

#[test]
fn validate_rejects_bad_nodes() {
    let mut scene = sample();
    scene.validate().unwrap();

    scene.root.opacity = 1.5;
    assert!(scene.validate().is_err());

    let mut scene = sample();
    scene.root = Node::new(
        "bad",
        NodeKind::Rect {
            size: Size::new(-1.0, 2.0),
            radius: 0.0,
            fill: Rgba8Premul::transparent(),
        },
    );
    assert!(scene.validate().is_err());

    let mut scene = sample();
    scene.canvas.width = 0;
    assert!(scene.validate().is_err());
}

#[test]
fn scene_json_round_trips() {
    let scene = sample();
    let json = scene.to_json().unwrap();
    assert!(json.contains("\"type\": \"image\""));
    assert!(json.contains("\"thumbs_up\""));
    let back: Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(back, scene);
}

#[test]
fn font_weights_map_to_css_values() {
    assert_eq!(FontWeight::Regular.value(), 400);
    assert_eq!(FontWeight::Semibold.value(), 600);
    assert_eq!(FontWeight::Bold.value(), 700);
}
