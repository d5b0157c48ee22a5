use std::f32::consts::PI;

use crate::spec::CircleMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, Layout, NodeLayout, NodeShape, Paint, fit_canvas};

/// Circle map: topic circle centered inside a large boundary circle, with
/// context items placed on the ring between the two.
pub(super) fn layout(spec: &CircleMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "topicFontSize", 18.0);
    let context_font = theme::number(style, "contextFontSize", 14.0);
    let stroke = theme::color(style, "stroke", "#000000");

    let topic_block = measure_block(&spec.topic, topic_font, &font_family, 200.0);
    let topic_radius = (topic_block.width / 2.0 + 22.0)
        .max(topic_block.height / 2.0 + 16.0)
        .max(50.0);

    let item_blocks: Vec<_> = spec
        .context
        .iter()
        .map(|item| measure_block(item, context_font, &font_family, 120.0))
        .collect();
    let item_radius = item_blocks
        .iter()
        .map(|block| (block.width / 2.0 + 12.0).max(block.height / 2.0 + 8.0))
        .fold(24.0_f32, f32::max);

    let count = spec.context.len().max(1) as f32;
    // The boundary must leave room for the item ring between it and the
    // topic, and for the items' own chord spacing.
    let min_boundary = topic_radius + item_radius * 2.0 + 50.0;
    let chord_ring = count * (2.0 * item_radius + 10.0) / (2.0 * PI);
    let boundary_radius = min_boundary
        .max(chord_ring + item_radius + 20.0)
        .max(dims.base_height.min(dims.base_width) / 2.0 - dims.padding);

    let cx = (dims.base_width / 2.0).max(boundary_radius + dims.padding);
    let cy = (dims.base_height / 2.0).max(boundary_radius + dims.padding);
    let ring = (topic_radius + boundary_radius) / 2.0;

    let mut layout = Layout::new(crate::spec::DiagramType::CircleMap, 0.0, 0.0);

    // Boundary first so everything else draws on top of it.
    layout.nodes.push(NodeLayout {
        id: "boundary".to_string(),
        x: cx,
        y: cy,
        width: boundary_radius * 2.0,
        height: boundary_radius * 2.0,
        shape: NodeShape::Circle,
        label: measure_block("", context_font, &font_family, 10.0),
        paint: Paint::new(
            theme::color(style, "boundaryColor", "#f5f5f5"),
            "#000000",
        )
        .stroke(stroke.clone(), theme::number(style, "strokeWidth", 2.0)),
    });

    let item_paint = Paint::new(
        theme::color(style, "contextColor", "#e3f2fd"),
        theme::color(style, "contextTextColor", "#333333"),
    )
    .stroke(stroke.clone(), 1.5)
    .font(context_font);

    for (idx, block) in item_blocks.into_iter().enumerate() {
        let angle = -PI / 2.0 + 2.0 * PI * idx as f32 / count;
        layout.nodes.push(NodeLayout {
            id: format!("context-{idx}"),
            x: cx + ring * angle.cos(),
            y: cy + ring * angle.sin(),
            width: item_radius * 2.0,
            height: item_radius * 2.0,
            shape: NodeShape::Circle,
            label: block,
            paint: item_paint.clone(),
        });
    }

    layout.nodes.push(NodeLayout {
        id: "topic".to_string(),
        x: cx,
        y: cy,
        width: topic_radius * 2.0,
        height: topic_radius * 2.0,
        shape: NodeShape::Circle,
        label: topic_block,
        paint: Paint::new(
            theme::color(style, "topicColor", "#1976d2"),
            theme::color(style, "topicTextColor", "#ffffff"),
        )
        .stroke(stroke, theme::number(style, "strokeWidth", 2.0))
        .font(topic_font)
        .bold(),
    });

    fit_canvas(&mut layout, dims);
    layout
}
