use crate::spec::FlowMapSpec;
use crate::theme::{self, StyleMap};

use super::text::{measure_block, measure_line};
use super::{
    Dimensions, EdgeLayout, LabelLayout, Layout, NodeLayout, NodeShape, Paint, TextAnchor,
    fit_canvas,
};

/// Minimum vertical gap between consecutive steps; grows when a step's
/// substep block is taller.
const MIN_STEP_GAP: f32 = 45.0;

/// Flow map: title top-left, steps as a vertical column of rounded rects,
/// substeps in a right-hand column attached to their step.
pub(super) fn layout(spec: &FlowMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let title_font = theme::number(style, "titleFontSize", 18.0);
    let step_font = theme::number(style, "stepFontSize", 14.0);
    let substep_font = theme::number(style, "substepFontSize", 12.0);
    let stroke = theme::color(style, "stroke", "#2c3e50");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);

    let mut layout = Layout::new(crate::spec::DiagramType::FlowMap, 0.0, 0.0);

    let title_block = measure_line(&spec.title, title_font, &font_family);
    let mut title = LabelLayout::new(
        dims.padding,
        dims.padding,
        title_block,
        title_font,
        theme::color(style, "titleColor", "#2c3e50"),
    );
    title.bold = true;
    title.anchor = TextAnchor::Start;
    layout.labels.push(title);

    let step_paint = Paint::new(
        theme::color(style, "stepColor", "#a7c7e7"),
        theme::color(style, "stepTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), stroke_width)
    .font(step_font);
    let substep_paint = Paint::new(
        theme::color(style, "substepColor", "#f4f6fb"),
        theme::color(style, "substepTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), 1.0)
    .font(substep_font);

    let step_blocks: Vec<_> = spec
        .steps
        .iter()
        .map(|step| measure_block(step, step_font, &font_family, 200.0))
        .collect();
    let step_width = step_blocks
        .iter()
        .map(|b| b.width + 32.0)
        .fold(120.0_f32, f32::max);

    let substeps_for = |step: &str| -> Vec<String> {
        spec.substeps
            .iter()
            .find(|group| group.step == step)
            .map(|group| group.substeps.clone())
            .unwrap_or_default()
    };

    let step_x = dims.padding + step_width / 2.0 + 20.0;
    let substep_x = step_x + step_width / 2.0 + 150.0;
    let mut y = dims.padding + 60.0;
    let mut prev_bottom: Option<(f32, f32)> = None;

    for (idx, (step, block)) in spec.steps.iter().zip(step_blocks).enumerate() {
        let step_height = block.height + 20.0;
        let substeps = substeps_for(step);
        let substep_blocks: Vec<_> = substeps
            .iter()
            .map(|s| measure_block(s, substep_font, &font_family, 160.0))
            .collect();
        let substep_heights: Vec<f32> = substep_blocks.iter().map(|b| b.height + 12.0).collect();
        let substack: f32 =
            substep_heights.iter().sum::<f32>() + substep_heights.len().saturating_sub(1) as f32 * 10.0;

        let slot = step_height.max(substack);
        let cy = y + slot / 2.0;

        if let Some(from) = prev_bottom {
            layout.edges.push(EdgeLayout::arrow(
                from,
                (step_x, cy - step_height / 2.0),
                stroke.clone(),
                stroke_width,
            ));
        }
        prev_bottom = Some((step_x, cy + step_height / 2.0));

        layout.nodes.push(NodeLayout {
            id: format!("step-{idx}"),
            x: step_x,
            y: cy,
            width: step_width,
            height: step_height,
            shape: NodeShape::RoundedRect,
            label: block,
            paint: step_paint.clone(),
        });

        let substep_width = substep_blocks
            .iter()
            .map(|b| b.width + 20.0)
            .fold(90.0_f32, f32::max);
        let mut sy = cy - substack / 2.0;
        for (sub_idx, (sub_block, sub_height)) in
            substep_blocks.into_iter().zip(substep_heights).enumerate()
        {
            let sub_cy = sy + sub_height / 2.0;
            layout.edges.push(EdgeLayout::line(
                (step_x + step_width / 2.0, cy),
                (substep_x - substep_width / 2.0, sub_cy),
                stroke.clone(),
                1.0,
            ));
            layout.nodes.push(NodeLayout {
                id: format!("substep-{idx}-{sub_idx}"),
                x: substep_x,
                y: sub_cy,
                width: substep_width,
                height: sub_height,
                shape: NodeShape::RoundedRect,
                label: sub_block,
                paint: substep_paint.clone(),
            });
            sy += sub_height + 10.0;
        }

        y += slot + MIN_STEP_GAP;
    }

    fit_canvas(&mut layout, dims);
    layout
}
