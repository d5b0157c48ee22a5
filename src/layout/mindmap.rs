use crate::spec::MindmapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{Dimensions, EdgeLayout, Layout, NodeLayout, NodeShape, Paint, fit_canvas, translate};

const BRANCH_GAP: f32 = 34.0;
const CHILD_GAP: f32 = 14.0;
const BRANCH_REACH: f32 = 190.0;
const CHILD_REACH: f32 = 150.0;

/// Mindmap: central topic with branches fanned to both sides, first half
/// on the right, rest on the left. Children stack outward from their
/// branch and the branch settles at the mean of its children.
pub(super) fn layout(spec: &MindmapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let central_font = theme::number(style, "centralTopicFontSize", 20.0);
    let branch_font = theme::number(style, "mainBranchFontSize", 16.0);
    let child_font = theme::number(style, "subBranchFontSize", 14.0);
    let branch_fill = theme::color(style, "mainBranchColor", "#a7c7e7");
    let branch_text = theme::color(style, "mainBranchTextColor", "#2c3e50");
    let child_fill = theme::color(style, "subBranchColor", "#f4f6fb");
    let child_text = theme::color(style, "subBranchTextColor", "#2c3e50");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);
    // Per-branch accents for connectors and outlines.
    let branch_colors = theme::color_list(
        style,
        "branchColors",
        &[
            "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
            "#9c755f",
        ],
    );

    let central_block = measure_block(&spec.topic, central_font, &font_family, 200.0);
    let central_rx = (central_block.width / 2.0 + 28.0).max(60.0);
    let central_ry = (central_block.height / 2.0 + 18.0).max(34.0);

    let mut layout = Layout::new(crate::spec::DiagramType::Mindmap, 0.0, 0.0);

    // Branches centered at the origin, recentered once extents are known.
    let right_count = spec.children.len().div_ceil(2);
    let place_side = |indices: Vec<usize>, sign: f32, layout: &mut Layout| {
        struct Placed {
            branch_idx: usize,
            block: super::TextBlock,
            child_blocks: Vec<super::TextBlock>,
            slot: f32,
        }
        let placed: Vec<Placed> = indices
            .into_iter()
            .map(|branch_idx| {
                let branch = &spec.children[branch_idx];
                let block = measure_block(&branch.text, branch_font, &font_family, 160.0);
                let child_blocks: Vec<_> = branch
                    .children
                    .iter()
                    .map(|c| measure_block(&c.text, child_font, &font_family, 140.0))
                    .collect();
                let child_stack = child_blocks.iter().map(|b| b.height + 12.0).sum::<f32>()
                    + child_blocks.len().saturating_sub(1) as f32 * CHILD_GAP;
                let slot = (block.height + 20.0).max(child_stack);
                Placed {
                    branch_idx,
                    block,
                    child_blocks,
                    slot,
                }
            })
            .collect();

        let total: f32 = placed.iter().map(|p| p.slot).sum::<f32>()
            + placed.len().saturating_sub(1) as f32 * BRANCH_GAP;
        let mut y = -total / 2.0;
        for item in placed {
            let color = &branch_colors[item.branch_idx % branch_colors.len()];
            let branch_width = item.block.width + 24.0;
            let branch_height = item.block.height + 16.0;
            let branch_x = sign * BRANCH_REACH;

            let child_x = branch_x + sign * CHILD_REACH;
            let child_stack = item.child_blocks.iter().map(|b| b.height + 12.0).sum::<f32>()
                + item.child_blocks.len().saturating_sub(1) as f32 * CHILD_GAP;
            let slot_mid = y + item.slot / 2.0;

            // Curve from the topic out to the branch, bowed toward the
            // branch's vertical level.
            let mut edge = EdgeLayout::line(
                (0.0, 0.0),
                (branch_x - sign * branch_width / 2.0, slot_mid),
                color.clone(),
                stroke_width,
            );
            edge.control = Some((sign * BRANCH_REACH * 0.45, slot_mid * 0.8));
            layout.edges.push(edge);

            let mut cy = slot_mid - child_stack / 2.0;
            for (child_idx, block) in item.child_blocks.into_iter().enumerate() {
                let height = block.height + 12.0;
                let width = block.width + 18.0;
                let child_cy = cy + height / 2.0;
                let mut edge = EdgeLayout::line(
                    (branch_x + sign * branch_width / 2.0, slot_mid),
                    (child_x - sign * width / 2.0, child_cy),
                    color.clone(),
                    1.5,
                );
                edge.control = Some((
                    branch_x + sign * CHILD_REACH * 0.5,
                    (slot_mid + child_cy) / 2.0,
                ));
                layout.edges.push(edge);
                layout.nodes.push(NodeLayout {
                    id: format!("child-{}-{child_idx}", item.branch_idx),
                    x: child_x,
                    y: child_cy,
                    width,
                    height,
                    shape: NodeShape::RoundedRect,
                    label: block,
                    paint: Paint::new(child_fill.clone(), child_text.clone())
                        .stroke(color.clone(), 1.5)
                        .font(child_font),
                });
                cy += height + CHILD_GAP;
            }

            layout.nodes.push(NodeLayout {
                id: format!("branch-{}", item.branch_idx),
                x: branch_x,
                y: slot_mid,
                width: branch_width,
                height: branch_height,
                shape: NodeShape::Stadium,
                label: item.block,
                paint: Paint::new(branch_fill.clone(), branch_text.clone())
                    .stroke(color.clone(), stroke_width)
                    .font(branch_font)
                    .bold(),
            });

            y += item.slot + BRANCH_GAP;
        }
    };

    place_side((0..right_count).collect(), 1.0, &mut layout);
    place_side((right_count..spec.children.len()).collect(), -1.0, &mut layout);

    layout.nodes.push(NodeLayout {
        id: "topic".to_string(),
        x: 0.0,
        y: 0.0,
        width: central_rx * 2.0,
        height: central_ry * 2.0,
        shape: NodeShape::Ellipse,
        label: central_block,
        paint: Paint::new(
            theme::color(style, "centralTopicColor", "#4e79a7"),
            theme::color(style, "centralTopicTextColor", "#ffffff"),
        )
        .stroke(theme::color(style, "stroke", "#2c3e50"), stroke_width)
        .font(central_font)
        .bold(),
    });

    // Shift the origin-centered cloud into positive coordinates.
    let min_x = layout
        .nodes
        .iter()
        .map(|n| n.x - n.half_width())
        .fold(0.0_f32, f32::min);
    let min_y = layout
        .nodes
        .iter()
        .map(|n| n.y - n.half_height())
        .fold(0.0_f32, f32::min);
    translate(&mut layout, dims.padding - min_x, dims.padding - min_y);

    fit_canvas(&mut layout, dims);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DiagramSpec, DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    fn sample() -> MindmapSpec {
        let value = json!({
            "topic": "Learning Rust",
            "children": [
                {"text": "Ownership", "children": [{"text": "Borrowing"}, {"text": "Lifetimes"}]},
                {"text": "Tooling", "children": [{"text": "cargo"}]},
                {"text": "Async", "children": []},
                {"text": "Testing", "children": [{"text": "unit"}, {"text": "integration"}]}
            ]
        });
        match parse_spec(DiagramType::Mindmap, &value).unwrap() {
            DiagramSpec::Mindmap(spec) => spec,
            _ => unreachable!(),
        }
    }

    #[test]
    fn branches_split_between_sides() {
        let spec = sample();
        let style = default_style(DiagramType::Mindmap);
        let result = layout(&spec, &style, &Dimensions::default());

        let topic = result.nodes.iter().find(|n| n.id == "topic").unwrap();
        let right: Vec<_> = ["branch-0", "branch-1"]
            .iter()
            .map(|id| result.nodes.iter().find(|n| n.id == *id).unwrap())
            .collect();
        let left: Vec<_> = ["branch-2", "branch-3"]
            .iter()
            .map(|id| result.nodes.iter().find(|n| n.id == *id).unwrap())
            .collect();
        for branch in right {
            assert!(branch.x > topic.x);
        }
        for branch in left {
            assert!(branch.x < topic.x);
        }
    }

    #[test]
    fn children_sit_outside_their_branch() {
        let spec = sample();
        let style = default_style(DiagramType::Mindmap);
        let result = layout(&spec, &style, &Dimensions::default());

        let topic = result.nodes.iter().find(|n| n.id == "topic").unwrap();
        let branch = result.nodes.iter().find(|n| n.id == "branch-0").unwrap();
        for node in result.nodes.iter().filter(|n| n.id.starts_with("child-0-")) {
            assert!((node.x - topic.x).abs() > (branch.x - topic.x).abs());
        }
    }

    #[test]
    fn everything_lands_in_positive_coordinates() {
        let spec = sample();
        let style = default_style(DiagramType::Mindmap);
        let result = layout(&spec, &style, &Dimensions::default());
        for node in &result.nodes {
            assert!(node.x - node.half_width() >= 0.0);
            assert!(node.y - node.half_height() >= 0.0);
        }
    }

    #[test]
    fn branch_edges_are_curved() {
        let spec = sample();
        let style = default_style(DiagramType::Mindmap);
        let result = layout(&spec, &style, &Dimensions::default());
        assert!(result.edges.iter().all(|e| e.control.is_some()));
    }

    #[test]
    fn node_fills_follow_the_style_keys() {
        let spec = sample();
        let mut style = default_style(DiagramType::Mindmap);
        style.insert("centralTopicColor".to_string(), "#abcdef".into());
        style.insert("mainBranchColor".to_string(), "#123456".into());
        style.insert("subBranchColor".to_string(), "#654321".into());
        let result = layout(&spec, &style, &Dimensions::default());

        let fill_of = |id: &str| {
            result
                .nodes
                .iter()
                .find(|n| n.id == id)
                .unwrap()
                .paint
                .fill
                .clone()
        };
        assert_eq!(fill_of("topic"), "#abcdef");
        assert_eq!(fill_of("branch-0"), "#123456");
        assert_eq!(fill_of("child-0-0"), "#654321");
    }
}
