use crate::spec::DiagramType;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, LabelLayout, Layout, PathLayout, TextAnchor};

/// Inline error card rendered when a spec fails validation: a framed
/// message plus a version footer, no diagram shapes.
pub fn compute_error_layout(
    kind: DiagramType,
    message: &str,
    style: &StyleMap,
    dims: &Dimensions,
) -> Layout {
    let width = dims.base_width.max(320.0);
    let height = dims.base_height.max(200.0);
    let mut layout = Layout::new(kind, width, height);
    layout.error = Some(message.to_string());

    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let card_width = (width * 0.7).max(280.0);
    let card_x = (width - card_width) / 2.0;

    let text = measure_block(message, 14.0, &font_family, card_width - 40.0);
    let card_height = (text.height + 60.0).max(90.0);
    let card_y = (height - card_height) / 2.0;

    layout.paths.push(PathLayout {
        d: format!(
            "M {x:.2} {y:.2} h {w:.2} v {h:.2} h -{w:.2} Z",
            x = card_x,
            y = card_y,
            w = card_width,
            h = card_height,
        ),
        stroke: "#e15759".to_string(),
        stroke_width: 1.5,
        fill: Some("#fdf3f3".to_string()),
    });

    let mut title = LabelLayout::new(
        width / 2.0,
        card_y + 24.0,
        measure_block("Unable to render diagram", 15.0, &font_family, card_width),
        15.0,
        "#b03a3c",
    );
    title.bold = true;
    layout.labels.push(title);

    layout.labels.push(LabelLayout::new(
        width / 2.0,
        card_y + 46.0,
        text,
        14.0,
        "#2c3e50",
    ));

    let version = format!("mindgraph-renderer v{}", env!("CARGO_PKG_VERSION"));
    let mut footer = LabelLayout::new(
        width - 12.0,
        height - 10.0,
        measure_block(&version, 10.0, &font_family, width),
        10.0,
        "#999999",
    );
    footer.anchor = TextAnchor::End;
    footer.opacity = 0.8;
    layout.labels.push(footer);

    layout
}
