use crate::spec::MultiFlowMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, EdgeLayout, Layout, NodeLayout, NodeShape, Paint, fit_canvas};

/// Multi-flow map: central event with a cause column flowing in from the
/// left and an effect column flowing out to the right.
pub(super) fn layout(spec: &MultiFlowMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let event_font = theme::number(style, "eventFontSize", 16.0);
    let node_font = theme::number(style, "nodeFontSize", 13.0);
    let stroke = theme::color(style, "stroke", "#2c3e50");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);

    let event_block = measure_block(&spec.event, event_font, &font_family, 200.0);
    let event_width = event_block.width + 36.0;
    let event_height = event_block.height + 24.0;

    let measure_column = |items: &[String]| -> (Vec<super::TextBlock>, f32) {
        let blocks: Vec<_> = items
            .iter()
            .map(|item| measure_block(item, node_font, &font_family, 170.0))
            .collect();
        let width = blocks
            .iter()
            .map(|b| b.width + 24.0)
            .fold(100.0_f32, f32::max);
        (blocks, width)
    };
    let (cause_blocks, cause_width) = measure_column(&spec.causes);
    let (effect_blocks, effect_width) = measure_column(&spec.effects);

    let column_height = |blocks: &[super::TextBlock]| -> f32 {
        blocks.iter().map(|b| b.height + 16.0).sum::<f32>()
            + blocks.len().saturating_sub(1) as f32 * 20.0
    };
    let tallest = column_height(&cause_blocks)
        .max(column_height(&effect_blocks))
        .max(event_height);
    let cy = (dims.base_height / 2.0).max(tallest / 2.0 + dims.padding);

    let gap = 90.0;
    let cause_x = dims.padding + cause_width / 2.0;
    let event_x = cause_x + cause_width / 2.0 + gap + event_width / 2.0;
    let effect_x = event_x + event_width / 2.0 + gap + effect_width / 2.0;

    let mut layout = Layout::new(crate::spec::DiagramType::MultiFlowMap, 0.0, 0.0);

    let side_paint = |fill_key: &str, text_key: &str| {
        Paint::new(
            theme::color(style, fill_key, "#a7c7e7"),
            theme::color(style, text_key, "#2c3e50"),
        )
        .stroke(stroke.clone(), 1.5)
        .font(node_font)
    };

    let place_column = |blocks: Vec<super::TextBlock>,
                        x: f32,
                        width: f32,
                        paint: Paint,
                        prefix: &str,
                        into_event: bool,
                        layout: &mut Layout| {
        let total = column_height(&blocks);
        let mut y = cy - total / 2.0;
        for (idx, block) in blocks.into_iter().enumerate() {
            let height = block.height + 16.0;
            let node_cy = y + height / 2.0;
            let (from, to) = if into_event {
                (
                    (x + width / 2.0, node_cy),
                    (event_x - event_width / 2.0, cy),
                )
            } else {
                (
                    (event_x + event_width / 2.0, cy),
                    (x - width / 2.0, node_cy),
                )
            };
            layout
                .edges
                .push(EdgeLayout::arrow(from, to, stroke.clone(), stroke_width));
            layout.nodes.push(NodeLayout {
                id: format!("{prefix}-{idx}"),
                x,
                y: node_cy,
                width,
                height,
                shape: NodeShape::RoundedRect,
                label: block,
                paint: paint.clone(),
            });
            y += height + 20.0;
        }
    };

    place_column(
        cause_blocks,
        cause_x,
        cause_width,
        side_paint("causeColor", "causeTextColor"),
        "cause",
        true,
        &mut layout,
    );
    place_column(
        effect_blocks,
        effect_x,
        effect_width,
        side_paint("effectColor", "effectTextColor"),
        "effect",
        false,
        &mut layout,
    );

    layout.nodes.push(NodeLayout {
        id: "event".to_string(),
        x: event_x,
        y: cy,
        width: event_width,
        height: event_height,
        shape: NodeShape::Rect,
        label: event_block,
        paint: Paint::new(
            theme::color(style, "eventColor", "#1976d2"),
            theme::color(style, "eventTextColor", "#ffffff"),
        )
        .stroke(stroke, stroke_width)
        .font(event_font)
        .bold(),
    });

    fit_canvas(&mut layout, dims);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DiagramSpec, DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    #[test]
    fn causes_left_effects_right_arrows_match() {
        let value = json!({
            "event": "Deforestation",
            "causes": ["logging", "agriculture", "fires"],
            "effects": ["erosion", "habitat loss"]
        });
        let DiagramSpec::MultiFlow(spec) = parse_spec(DiagramType::MultiFlowMap, &value).unwrap()
        else {
            panic!("expected multi-flow spec");
        };
        let style = default_style(DiagramType::MultiFlowMap);
        let result = layout(&spec, &style, &Dimensions::default());

        let event = result.nodes.iter().find(|n| n.id == "event").unwrap();
        for node in result.nodes.iter().filter(|n| n.id.starts_with("cause-")) {
            assert!(node.x < event.x);
        }
        for node in result.nodes.iter().filter(|n| n.id.starts_with("effect-")) {
            assert!(node.x > event.x);
        }
        assert_eq!(result.edges.len(), 5);
        assert!(result.edges.iter().all(|e| e.arrow_end));
    }
}
