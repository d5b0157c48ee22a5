use crate::spec::DoubleBubbleMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, EdgeLayout, Layout, NodeLayout, NodeShape, Paint, ellipse_edge, fit_canvas};

/// Double bubble map: two topic ellipses with a shared similarity column
/// between them and difference bubbles fanned on the outer sides.
pub(super) fn layout(spec: &DoubleBubbleMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "topicFontSize", 18.0);
    let sim_font = theme::number(style, "similarityFontSize", 14.0);
    let diff_font = theme::number(style, "diffFontSize", 13.0);
    let stroke = theme::color(style, "stroke", "#000000");
    let stroke_width = theme::number(style, "strokeWidth", 3.0);

    let left_block = measure_block(&spec.left, topic_font, &font_family, 180.0);
    let right_block = measure_block(&spec.right, topic_font, &font_family, 180.0);
    let topic_rx = (left_block.width.max(right_block.width) / 2.0 + 26.0).max(55.0);
    let topic_ry = (left_block.height.max(right_block.height) / 2.0 + 16.0).max(32.0);

    let sim_blocks: Vec<_> = spec
        .similarities
        .iter()
        .map(|s| measure_block(s, sim_font, &font_family, 130.0))
        .collect();
    let sim_radius = sim_blocks
        .iter()
        .map(|b| (b.width / 2.0 + 12.0).max(b.height / 2.0 + 8.0))
        .fold(26.0_f32, f32::max);

    let measure_diffs = |items: &[String]| -> (Vec<super::TextBlock>, f32) {
        let blocks: Vec<_> = items
            .iter()
            .map(|s| measure_block(s, diff_font, &font_family, 120.0))
            .collect();
        let radius = blocks
            .iter()
            .map(|b| (b.width / 2.0 + 10.0).max(b.height / 2.0 + 8.0))
            .fold(24.0_f32, f32::max);
        (blocks, radius)
    };
    let (left_diff_blocks, left_diff_radius) = measure_diffs(&spec.left_differences);
    let (right_diff_blocks, right_diff_radius) = measure_diffs(&spec.right_differences);

    // Column x positions, left to right.
    let gap = 70.0;
    let left_diff_x = dims.padding + left_diff_radius;
    let left_topic_x = left_diff_x + left_diff_radius + gap + topic_rx;
    let mid_x = left_topic_x + topic_rx + gap + sim_radius;
    let right_topic_x = mid_x + sim_radius + gap + topic_rx;
    let right_diff_x = right_topic_x + topic_rx + gap + right_diff_radius;

    let column_height = |count: usize, radius: f32| -> f32 {
        let n = count.max(1) as f32;
        n * radius * 2.0 + (n - 1.0) * 18.0
    };
    let tallest = column_height(sim_blocks.len(), sim_radius)
        .max(column_height(left_diff_blocks.len(), left_diff_radius))
        .max(column_height(right_diff_blocks.len(), right_diff_radius))
        .max(topic_ry * 2.0);
    let cy = (dims.base_height / 2.0).max(tallest / 2.0 + dims.padding);

    let mut layout = Layout::new(crate::spec::DiagramType::DoubleBubbleMap, 0.0, 0.0);

    let stack = |blocks: &[super::TextBlock], radius: f32| -> Vec<f32> {
        let n = blocks.len() as f32;
        let total = n * radius * 2.0 + (n - 1.0) * 18.0;
        let top = cy - total / 2.0 + radius;
        (0..blocks.len())
            .map(|i| top + i as f32 * (radius * 2.0 + 18.0))
            .collect()
    };

    let topic_paint = |key: &str| {
        Paint::new(
            theme::color(style, key, "#1976d2"),
            theme::color(style, "topicTextColor", "#ffffff"),
        )
        .stroke(stroke.clone(), stroke_width)
        .font(topic_font)
        .bold()
    };

    // Similarities connect to both topics.
    let sim_paint = Paint::new(
        theme::color(style, "similarityColor", "#a7c7e7"),
        theme::color(style, "similarityTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), 2.0)
    .font(sim_font);
    for (idx, (block, y)) in sim_blocks
        .iter()
        .zip(stack(&sim_blocks, sim_radius))
        .enumerate()
    {
        for topic_x in [left_topic_x, right_topic_x] {
            let start = ellipse_edge(topic_x, cy, topic_rx, topic_ry, mid_x - topic_x, y - cy);
            let end = ellipse_edge(mid_x, y, sim_radius, sim_radius, topic_x - mid_x, cy - y);
            layout
                .edges
                .push(EdgeLayout::line(start, end, stroke.clone(), 2.0));
        }
        layout.nodes.push(NodeLayout {
            id: format!("sim-{idx}"),
            x: mid_x,
            y,
            width: sim_radius * 2.0,
            height: sim_radius * 2.0,
            shape: NodeShape::Circle,
            label: block.clone(),
            paint: sim_paint.clone(),
        });
    }

    let place_diffs = |blocks: &[super::TextBlock],
                       radius: f32,
                       x: f32,
                       topic_x: f32,
                       fill_key: &str,
                       prefix: &str,
                       layout: &mut Layout| {
        let paint = Paint::new(
            theme::color(style, fill_key, "#f4f6fb"),
            theme::color(style, "diffTextColor", "#2c3e50"),
        )
        .stroke(stroke.clone(), 1.5)
        .font(diff_font);
        for (idx, (block, y)) in blocks.iter().zip(stack(blocks, radius)).enumerate() {
            let start = ellipse_edge(topic_x, cy, topic_rx, topic_ry, x - topic_x, y - cy);
            let end = ellipse_edge(x, y, radius, radius, topic_x - x, cy - y);
            layout
                .edges
                .push(EdgeLayout::line(start, end, stroke.clone(), 1.5));
            layout.nodes.push(NodeLayout {
                id: format!("{prefix}-{idx}"),
                x,
                y,
                width: radius * 2.0,
                height: radius * 2.0,
                shape: NodeShape::Circle,
                label: block.clone(),
                paint: paint.clone(),
            });
        }
    };
    place_diffs(
        &left_diff_blocks,
        left_diff_radius,
        left_diff_x,
        left_topic_x,
        "leftDiffColor",
        "left-diff",
        &mut layout,
    );
    place_diffs(
        &right_diff_blocks,
        right_diff_radius,
        right_diff_x,
        right_topic_x,
        "rightDiffColor",
        "right-diff",
        &mut layout,
    );

    layout.nodes.push(NodeLayout {
        id: "left-topic".to_string(),
        x: left_topic_x,
        y: cy,
        width: topic_rx * 2.0,
        height: topic_ry * 2.0,
        shape: NodeShape::Ellipse,
        label: left_block,
        paint: topic_paint("leftTopicColor"),
    });
    layout.nodes.push(NodeLayout {
        id: "right-topic".to_string(),
        x: right_topic_x,
        y: cy,
        width: topic_rx * 2.0,
        height: topic_ry * 2.0,
        shape: NodeShape::Ellipse,
        label: right_block,
        paint: topic_paint("rightTopicColor"),
    });

    fit_canvas(&mut layout, dims);
    layout
}
