use crate::spec::TreeMapSpec;
use crate::theme::{self, StyleMap};

use super::text::{measure_block, measure_line};
use super::{
    Dimensions, EdgeLayout, LabelLayout, Layout, NodeLayout, NodeShape, Paint, fit_canvas,
};

const COLUMN_GAP: f32 = 36.0;
const LEAF_GAP: f32 = 12.0;

/// Tree map: root at the top, one column per branch below it, leaves
/// stacked under their branch heading.
pub(super) fn layout(spec: &TreeMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "rootFontSize", 18.0);
    let branch_font = theme::number(style, "branchFontSize", 14.0);
    let leaf_font = theme::number(style, "leafFontSize", 12.0);
    let stroke = theme::color(style, "stroke", "#2c3e50");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);

    let topic_block = measure_block(&spec.topic, topic_font, &font_family, 240.0);
    let topic_width = topic_block.width + 36.0;
    let topic_height = topic_block.height + 22.0;

    struct Column {
        branch: super::TextBlock,
        leaves: Vec<super::TextBlock>,
        width: f32,
    }
    let columns: Vec<Column> = spec
        .children
        .iter()
        .map(|branch| {
            let branch_block = measure_block(&branch.text, branch_font, &font_family, 160.0);
            let leaves: Vec<_> = branch
                .children
                .iter()
                .map(|leaf| measure_block(&leaf.text, leaf_font, &font_family, 150.0))
                .collect();
            let width = leaves
                .iter()
                .map(|b| b.width + 20.0)
                .fold(branch_block.width + 28.0, f32::max)
                .max(90.0);
            Column {
                branch: branch_block,
                leaves,
                width,
            }
        })
        .collect();

    let total_width: f32 = columns.iter().map(|c| c.width).sum::<f32>()
        + columns.len().saturating_sub(1) as f32 * COLUMN_GAP;

    let mut layout = Layout::new(crate::spec::DiagramType::TreeMap, 0.0, 0.0);

    let topic_x = dims.padding + total_width.max(topic_width) / 2.0;
    let topic_y = dims.padding + topic_height / 2.0;
    let branch_top = topic_y + topic_height / 2.0 + 60.0;

    let branch_paint = Paint::new(
        theme::color(style, "branchColor", "#a7c7e7"),
        theme::color(style, "branchTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), 1.5)
    .font(branch_font);
    let leaf_paint = Paint::new(
        theme::color(style, "leafColor", "#f4f6fb"),
        theme::color(style, "leafTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), 1.0)
    .font(leaf_font);

    let mut x = dims.padding + (total_width.max(topic_width) - total_width) / 2.0;
    for (idx, column) in columns.into_iter().enumerate() {
        let cx = x + column.width / 2.0;
        let branch_height = column.branch.height + 16.0;
        let branch_cy = branch_top + branch_height / 2.0;

        layout.edges.push(EdgeLayout::line(
            (topic_x, topic_y + topic_height / 2.0),
            (cx, branch_top),
            stroke.clone(),
            stroke_width,
        ));
        layout.nodes.push(NodeLayout {
            id: format!("branch-{idx}"),
            x: cx,
            y: branch_cy,
            width: column.width,
            height: branch_height,
            shape: NodeShape::Rect,
            label: column.branch,
            paint: branch_paint.clone(),
        });

        let mut y = branch_top + branch_height + 24.0;
        for (leaf_idx, block) in column.leaves.into_iter().enumerate() {
            let leaf_height = block.height + 12.0;
            let leaf_cy = y + leaf_height / 2.0;
            layout.edges.push(EdgeLayout::line(
                (cx, branch_cy + branch_height / 2.0),
                (cx, leaf_cy - leaf_height / 2.0),
                stroke.clone(),
                1.0,
            ));
            layout.nodes.push(NodeLayout {
                id: format!("leaf-{idx}-{leaf_idx}"),
                x: cx,
                y: leaf_cy,
                width: column.width - 10.0,
                height: leaf_height,
                shape: NodeShape::Rect,
                label: block,
                paint: leaf_paint.clone(),
            });
            y += leaf_height + LEAF_GAP;
        }

        x += column.width + COLUMN_GAP;
    }

    layout.nodes.push(NodeLayout {
        id: "topic".to_string(),
        x: topic_x,
        y: topic_y,
        width: topic_width,
        height: topic_height,
        shape: NodeShape::Rect,
        label: topic_block,
        paint: Paint::new(
            theme::color(style, "rootColor", "#4e79a7"),
            theme::color(style, "rootTextColor", "#ffffff"),
        )
        .stroke(stroke, stroke_width)
        .font(topic_font)
        .bold(),
    });

    if let Some(dimension) = &spec.dimension {
        let block = measure_line(dimension, leaf_font, &font_family);
        let mut label = LabelLayout::new(
            topic_x,
            topic_y + topic_height / 2.0 + 6.0,
            block,
            leaf_font,
            theme::color(style, "leafTextColor", "#2c3e50"),
        );
        label.opacity = 0.7;
        layout.labels.push(label);
    }

    fit_canvas(&mut layout, dims);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DiagramSpec, DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    fn sample() -> TreeMapSpec {
        let value = json!({
            "topic": "Vertebrates",
            "children": [
                {"text": "Mammals", "children": [{"text": "Whale"}, {"text": "Bat"}]},
                {"text": "Birds", "children": [{"text": "Owl"}]},
                {"text": "Fish", "children": []}
            ]
        });
        match parse_spec(DiagramType::TreeMap, &value).unwrap() {
            DiagramSpec::Tree(spec) => spec,
            _ => unreachable!(),
        }
    }

    #[test]
    fn branches_share_a_row_below_the_topic() {
        let spec = sample();
        let style = default_style(DiagramType::TreeMap);
        let result = layout(&spec, &style, &Dimensions::default());

        let topic = result.nodes.iter().find(|n| n.id == "topic").unwrap();
        let branches: Vec<_> = result
            .nodes
            .iter()
            .filter(|n| n.id.starts_with("branch-"))
            .collect();
        assert_eq!(branches.len(), 3);
        let top = branches[0].y - branches[0].half_height();
        for branch in &branches {
            assert!((branch.y - branch.half_height() - top).abs() < 0.01);
            assert!(branch.y > topic.y);
        }
        for pair in branches.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn leaves_stack_under_their_branch() {
        let spec = sample();
        let style = default_style(DiagramType::TreeMap);
        let result = layout(&spec, &style, &Dimensions::default());

        let branch = result.nodes.iter().find(|n| n.id == "branch-0").unwrap();
        let leaves: Vec<_> = result
            .nodes
            .iter()
            .filter(|n| n.id.starts_with("leaf-0-"))
            .collect();
        assert_eq!(leaves.len(), 2);
        for leaf in &leaves {
            assert!((leaf.x - branch.x).abs() < 0.01);
            assert!(leaf.y > branch.y);
        }
        assert!(leaves[0].y < leaves[1].y);
    }

    #[test]
    fn edge_count_covers_branches_and_leaves() {
        let spec = sample();
        let style = default_style(DiagramType::TreeMap);
        let result = layout(&spec, &style, &Dimensions::default());
        // 3 topic-to-branch lines + 3 leaf connectors.
        assert_eq!(result.edges.len(), 6);
    }

    #[test]
    fn root_color_key_drives_the_root_paint() {
        let spec = sample();
        let mut style = default_style(DiagramType::TreeMap);
        style.insert("rootColor".to_string(), "#ff6b6b".into());
        let result = layout(&spec, &style, &Dimensions::default());
        let root = result.nodes.iter().find(|n| n.id == "topic").unwrap();
        assert_eq!(root.paint.fill, "#ff6b6b");
    }
}
