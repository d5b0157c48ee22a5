use std::f32::consts::PI;

use crate::spec::VennDiagramSpec;
use crate::theme::{self, StyleMap};

use super::text::{measure_block, measure_line};
use super::{Dimensions, LabelLayout, Layout, NodeLayout, NodeShape, Paint};

/// Venn diagram: 2 to 4 translucent set circles arranged to overlap, set
/// names outside their circle and items pulled toward the non-overlapping
/// part of each set.
pub(super) fn layout(spec: &VennDiagramSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let name_font = theme::number(style, "setFontSize", 16.0);
    let item_font = theme::number(style, "itemFontSize", 12.0);
    let opacity = theme::number(style, "setOpacity", 0.55);
    let stroke_width = theme::number(style, "strokeWidth", 2.0);
    let colors = theme::color_list(
        style,
        "setColors",
        &["#4e79a7", "#f28e2b", "#e15759", "#76b7b2"],
    );

    let cx = dims.base_width / 2.0;
    let cy = dims.base_height / 2.0;
    let radius = (dims.base_width.min(dims.base_height) / 2.0 - dims.padding).max(80.0);

    // Unit offsets from the canvas center, scaled by the radius.
    let offsets: Vec<(f32, f32)> = match spec.sets.len() {
        2 => vec![(-0.6, 0.0), (0.6, 0.0)],
        3 => [-90.0_f32, 30.0, 150.0]
            .iter()
            .map(|deg| {
                let rad = deg * PI / 180.0;
                (rad.cos() * 0.65, rad.sin() * 0.65)
            })
            .collect(),
        _ => [45.0_f32, 135.0, 225.0, 315.0]
            .iter()
            .map(|deg| {
                let rad = deg * PI / 180.0;
                (rad.cos() * 0.55, rad.sin() * 0.55)
            })
            .collect(),
    };

    let mut layout = Layout::new(crate::spec::DiagramType::VennDiagram, 0.0, 0.0);
    layout.width = dims.base_width;
    layout.height = dims.base_height;

    for (idx, (set, (ox, oy))) in spec.sets.iter().zip(&offsets).enumerate() {
        let color = &colors[idx % colors.len()];
        let set_cx = cx + ox * radius;
        let set_cy = cy + oy * radius;

        layout.nodes.push(NodeLayout {
            id: format!("set-{idx}"),
            x: set_cx,
            y: set_cy,
            width: radius * 2.0,
            height: radius * 2.0,
            shape: NodeShape::Circle,
            label: measure_block("", item_font, &font_family, 10.0),
            paint: Paint::new(color.clone(), "#2c3e50")
                .stroke(color.clone(), stroke_width)
                .opacity(opacity),
        });

        // Outward unit direction, or straight up for a degenerate center.
        let len = (ox * ox + oy * oy).sqrt();
        let (ux, uy) = if len > f32::EPSILON {
            (ox / len, oy / len)
        } else {
            (0.0, -1.0)
        };

        let name_block = measure_line(&set.name, name_font, &font_family);
        let name_x = set_cx + ux * (radius + 16.0);
        let name_y = set_cy + uy * (radius + 16.0) - name_block.height / 2.0;
        let mut name = LabelLayout::new(
            name_x,
            name_y,
            name_block,
            name_font,
            theme::color(style, "setTextColor", "#2c3e50"),
        );
        name.bold = true;
        layout.labels.push(name);

        // Items stacked in the outer lobe of the circle, away from the
        // shared overlap region.
        let item_blocks: Vec<_> = set
            .items
            .iter()
            .map(|item| measure_block(item, item_font, &font_family, radius * 0.9))
            .collect();
        let stack: f32 = item_blocks.iter().map(|b| b.height).sum::<f32>()
            + item_blocks.len().saturating_sub(1) as f32 * 6.0;
        let anchor_x = set_cx + ux * radius * 0.45;
        let mut y = set_cy + uy * radius * 0.45 - stack / 2.0;
        for block in item_blocks {
            let height = block.height;
            layout.labels.push(LabelLayout::new(
                anchor_x,
                y,
                block,
                item_font,
                theme::color(style, "itemTextColor", "#2c3e50"),
            ));
            y += height + 6.0;
        }
    }

    // Name labels can poke past the base canvas.
    for label in &layout.labels {
        layout.width = layout.width.max(label.x + label.text.width / 2.0 + dims.padding);
        layout.height = layout.height.max(label.y + label.text.height + dims.padding);
    }
    layout
}
