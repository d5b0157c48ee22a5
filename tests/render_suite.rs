use std::path::Path;

use mindgraph_renderer::spec::DiagramType;
use mindgraph_renderer::theme::{ColorTheme, StyleMap, StyleValue};
use mindgraph_renderer::{ErrorMode, RenderOptions, render_with_options};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("fixture {name} unreadable: {err}"))
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new diagram types must be added intentionally.
    let candidates = [
        ("bubble_map.json", DiagramType::BubbleMap, "Volcanoes"),
        ("circle_map.json", DiagramType::CircleMap, "Photosynthesis"),
        (
            "double_bubble_map.json",
            DiagramType::DoubleBubbleMap,
            "Dolphins",
        ),
        ("bridge_map.json", DiagramType::BridgeMap, "lives in"),
        ("flow_map.json", DiagramType::FlowMap, "Knead"),
        ("multi_flow_map.json", DiagramType::MultiFlowMap, "Deforestation"),
        ("tree_map.json", DiagramType::TreeMap, "Vertebrates"),
        ("brace_map.json", DiagramType::BraceMap, "Drivetrain"),
        ("mindmap.json", DiagramType::Mindmap, "Geothermal"),
        ("concept_map.json", DiagramType::ConceptMap, "Condensation"),
        ("venn_diagram.json", DiagramType::VennDiagram, "Fungi"),
        ("flowchart.json", DiagramType::Flowchart, "Ship it"),
    ];
    assert_eq!(candidates.len(), DiagramType::ALL.len());

    for (fixture, kind, expected_label) in candidates {
        let source = read_fixture(fixture);
        let artifact = render_with_options(&source, &RenderOptions::default())
            .unwrap_or_else(|err| panic!("{fixture}: render failed: {err}"));
        assert_eq!(artifact.kind, kind, "{fixture}: wrong diagram type");
        assert_valid_svg(&artifact.svg, fixture);
        assert!(
            artifact.svg.contains(expected_label),
            "{fixture}: missing label {expected_label:?}"
        );
        assert!(
            artifact.svg.contains("MindGraph"),
            "{fixture}: missing watermark"
        );
        assert!(artifact.width > 0.0 && artifact.height > 0.0, "{fixture}: empty canvas");
    }
}

#[test]
fn invalid_fixture_renders_inline_error_card() {
    let source = read_fixture("invalid_missing_topic.json");
    let artifact = render_with_options(&source, &RenderOptions::default())
        .expect("inline mode should still produce an svg");
    assert_valid_svg(&artifact.svg, "invalid_missing_topic.json");
    assert!(artifact.svg.contains("Unable to render diagram"));
    // Error cards carry no diagram shapes and no watermark.
    assert!(!artifact.svg.contains("<ellipse"));
    assert!(!artifact.svg.contains(">MindGraph<"));
}

#[test]
fn invalid_fixture_fails_in_strict_mode() {
    let source = read_fixture("invalid_missing_topic.json");
    let options = RenderOptions {
        error_mode: ErrorMode::Strict,
        ..RenderOptions::default()
    };
    assert!(render_with_options(&source, &options).is_err());
}

#[test]
fn custom_watermark_replaces_default() {
    let source = read_fixture("bubble_map.json");
    let options = RenderOptions {
        watermark: "Classroom 3B".to_string(),
        ..RenderOptions::default()
    };
    let artifact = render_with_options(&source, &options).expect("render failed");
    assert!(artifact.svg.contains("Classroom 3B"));
    assert!(!artifact.svg.contains(">MindGraph<"));
}

#[test]
fn palette_primary_reaches_the_rendered_root() {
    let source = read_fixture("tree_map.json");
    let options = RenderOptions {
        color_theme: Some(ColorTheme::Innovation),
        ..RenderOptions::default()
    };
    let artifact = render_with_options(&source, &options).expect("render failed");
    // Innovation/colorful primary fills the tree root.
    assert!(artifact.svg.contains("#ff6b6b"));
}

#[test]
fn style_override_reaches_the_rendered_svg() {
    let source = read_fixture("tree_map.json");
    let mut overrides = StyleMap::new();
    overrides.insert("rootColor".to_string(), StyleValue::Text("red".to_string()));
    let options = RenderOptions {
        overrides: Some(overrides),
        ..RenderOptions::default()
    };
    let artifact = render_with_options(&source, &options).expect("render failed");
    // Color names translate to hex before they land in the document.
    assert!(artifact.svg.contains("#ff0000"));
    assert!(!artifact.svg.contains("#4e79a7"));
}

#[test]
fn empty_watermark_is_omitted() {
    let source = read_fixture("circle_map.json");
    let options = RenderOptions {
        watermark: String::new(),
        ..RenderOptions::default()
    };
    let artifact = render_with_options(&source, &options).expect("render failed");
    assert!(!artifact.svg.contains(">MindGraph<"));
}
