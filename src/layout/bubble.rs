use std::f32::consts::PI;

use crate::spec::BubbleMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, EdgeLayout, Layout, NodeLayout, NodeShape, Paint, ellipse_edge, fit_canvas};

/// Bubble map: topic ellipse in the center, attribute bubbles on a ring
/// around it, one spoke per attribute.
pub(super) fn layout(spec: &BubbleMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "topicFontSize", 18.0);
    let attr_font = theme::number(style, "charFontSize", 14.0);
    let stroke = theme::color(style, "stroke", "#000000");
    let stroke_width = theme::number(style, "strokeWidth", 3.0);

    let topic_block = measure_block(&spec.topic, topic_font, &font_family, 220.0);
    let topic_rx = (topic_block.width / 2.0 + 30.0).max(60.0);
    let topic_ry = (topic_block.height / 2.0 + 18.0).max(34.0);

    // All attribute bubbles share the radius of the largest one so the
    // ring reads evenly.
    let attr_blocks: Vec<_> = spec
        .attributes
        .iter()
        .map(|attr| measure_block(attr, attr_font, &font_family, 140.0))
        .collect();
    let attr_radius = attr_blocks
        .iter()
        .map(|block| (block.width / 2.0 + 14.0).max(block.height / 2.0 + 10.0))
        .fold(28.0_f32, f32::max);

    let count = spec.attributes.len().max(1) as f32;
    // Ring radius adapts to both the topic size and the chord spacing the
    // bubbles need so neighbors do not touch.
    let clearance = topic_rx.max(topic_ry) + attr_radius + 60.0;
    let chord = count * (2.0 * attr_radius + 12.0) / (2.0 * PI);
    let ring = clearance.max(chord);

    let extent = ring + attr_radius;
    let cx = (dims.base_width / 2.0).max(extent + dims.padding);
    let cy = (dims.base_height / 2.0).max(extent + dims.padding);

    let mut layout = Layout::new(crate::spec::DiagramType::BubbleMap, 0.0, 0.0);

    let topic_paint = Paint::new(
        theme::color(style, "topicColor", "#1976d2"),
        theme::color(style, "topicTextColor", "#ffffff"),
    )
    .stroke(stroke.clone(), stroke_width)
    .font(topic_font)
    .bold();

    let attr_paint = Paint::new(
        theme::color(style, "charColor", "#e3f2fd"),
        theme::color(style, "charTextColor", "#333333"),
    )
    .stroke(stroke.clone(), 2.0)
    .font(attr_font);

    for (idx, block) in attr_blocks.into_iter().enumerate() {
        let angle = -PI / 2.0 + 2.0 * PI * idx as f32 / count;
        let (bx, by) = (cx + ring * angle.cos(), cy + ring * angle.sin());
        let start = ellipse_edge(cx, cy, topic_rx, topic_ry, bx - cx, by - cy);
        let end = ellipse_edge(bx, by, attr_radius, attr_radius, cx - bx, cy - by);
        layout
            .edges
            .push(EdgeLayout::line(start, end, stroke.clone(), 2.0));
        layout.nodes.push(NodeLayout {
            id: format!("attr-{idx}"),
            x: bx,
            y: by,
            width: attr_radius * 2.0,
            height: attr_radius * 2.0,
            shape: NodeShape::Circle,
            label: block,
            paint: attr_paint.clone(),
        });
    }

    layout.nodes.push(NodeLayout {
        id: "topic".to_string(),
        x: cx,
        y: cy,
        width: topic_rx * 2.0,
        height: topic_ry * 2.0,
        shape: NodeShape::Ellipse,
        label: topic_block,
        paint: topic_paint,
    });

    fit_canvas(&mut layout, dims);
    layout
}
