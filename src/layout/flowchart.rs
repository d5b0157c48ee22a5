use std::collections::HashMap;

use crate::spec::{FlowchartNodeKind, FlowchartSpec};
use crate::theme::{self, StyleMap};

use super::text::{measure_block, measure_line};
use super::{
    Dimensions, EdgeLayout, LabelLayout, Layout, NodeLayout, NodeShape, Paint, TextAnchor,
    fit_canvas,
};

const ROW_GAP: f32 = 70.0;
const COL_GAP: f32 = 50.0;

/// Longest-path rank per node. Sources sit at rank 0; every forward edge
/// pushes its target at least one rank below its source. Edges that close
/// a cycle (back edges in a DFS from declaration order) are skipped, so a
/// decision loop does not inflate the ranks of its members.
fn ranks(spec: &FlowchartSpec) -> HashMap<&str, usize> {
    let index: HashMap<&str, usize> = spec
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); spec.nodes.len()];
    for edge in &spec.edges {
        if let (Some(&from), Some(&to)) =
            (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
        {
            adjacency[from].push(to);
        }
    }

    // 0 unvisited, 1 on the DFS stack, 2 finished. An edge into a node
    // still on the stack is a back edge.
    let mut state = vec![0u8; spec.nodes.len()];
    let mut forward: Vec<(usize, usize)> = Vec::new();
    for start in 0..spec.nodes.len() {
        if state[start] != 0 {
            continue;
        }
        state[start] = 1;
        let mut stack = vec![(start, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            if next < adjacency[node].len() {
                frame.1 += 1;
                let target = adjacency[node][next];
                if state[target] == 1 {
                    continue;
                }
                forward.push((node, target));
                if state[target] == 0 {
                    state[target] = 1;
                    stack.push((target, 0));
                }
            } else {
                state[node] = 2;
                stack.pop();
            }
        }
    }

    // The forward subset is acyclic, so relaxation settles within n passes.
    let mut rank = vec![0usize; spec.nodes.len()];
    for _ in 0..spec.nodes.len() {
        let mut changed = false;
        for &(from, to) in &forward {
            if rank[to] < rank[from] + 1 {
                rank[to] = rank[from] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    spec.nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), rank[i]))
        .collect()
}

/// Flowchart: nodes ranked top to bottom by longest path from a source,
/// each rank centered as a row, arrows between ranks with optional
/// condition labels.
pub(super) fn layout(spec: &FlowchartSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let title_font = theme::number(style, "titleFontSize", 18.0);
    let edge_font = theme::number(style, "edgeFontSize", 12.0);
    let stroke = theme::color(style, "stroke", "#2c3e50");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);

    let font_for = |kind: FlowchartNodeKind| -> f32 {
        let key = match kind {
            FlowchartNodeKind::Start | FlowchartNodeKind::End => "startEndFontSize",
            FlowchartNodeKind::Process => "processFontSize",
            FlowchartNodeKind::Decision => "decisionFontSize",
        };
        theme::number(style, key, 14.0)
    };

    let mut layout = Layout::new(crate::spec::DiagramType::Flowchart, 0.0, 0.0);

    let mut top = dims.padding;
    if let Some(title) = &spec.title {
        let block = measure_line(title, title_font, &font_family);
        let height = block.height;
        let mut label = LabelLayout::new(
            dims.padding,
            top,
            block,
            title_font,
            theme::color(style, "titleColor", "#2c3e50"),
        );
        label.bold = true;
        label.anchor = TextAnchor::Start;
        layout.labels.push(label);
        top += height + 24.0;
    }

    let rank = ranks(spec);
    let max_rank = rank.values().copied().max().unwrap_or(0);
    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (idx, node) in spec.nodes.iter().enumerate() {
        rows[rank[node.id.as_str()]].push(idx);
    }

    let paint_for = |kind: FlowchartNodeKind| -> Paint {
        let (fill_key, fill, text_key) = match kind {
            FlowchartNodeKind::Start | FlowchartNodeKind::End => {
                ("startEndColor", "#4caf50", "startEndTextColor")
            }
            FlowchartNodeKind::Process => ("processColor", "#2196f3", "processTextColor"),
            FlowchartNodeKind::Decision => ("decisionColor", "#ff9800", "decisionTextColor"),
        };
        Paint::new(
            theme::color(style, fill_key, fill),
            theme::color(style, text_key, "#ffffff"),
        )
        .stroke(stroke.clone(), stroke_width)
        .font(font_for(kind))
    };

    // Widest row decides the shared horizontal center.
    let mut measured: Vec<(f32, f32, super::TextBlock)> = Vec::with_capacity(spec.nodes.len());
    for node in &spec.nodes {
        let block = measure_block(&node.label, font_for(node.kind), &font_family, 160.0);
        let (width, height) = match node.kind {
            FlowchartNodeKind::Decision => {
                ((block.width + 30.0) * 1.6, (block.height + 18.0) * 1.8)
            }
            FlowchartNodeKind::Start | FlowchartNodeKind::End => {
                (block.width + 44.0, block.height + 18.0)
            }
            FlowchartNodeKind::Process => (block.width + 28.0, block.height + 18.0),
        };
        measured.push((width, height, block));
    }
    let widest_row = rows
        .iter()
        .map(|row| {
            row.iter().map(|&i| measured[i].0).sum::<f32>()
                + row.len().saturating_sub(1) as f32 * COL_GAP
        })
        .fold(0.0_f32, f32::max);
    let center_x = dims.padding + widest_row.max(dims.base_width - 2.0 * dims.padding) / 2.0;

    let mut y = top;
    for row in &rows {
        if row.is_empty() {
            continue;
        }
        let row_width: f32 = row.iter().map(|&i| measured[i].0).sum::<f32>()
            + row.len().saturating_sub(1) as f32 * COL_GAP;
        let row_height = row.iter().map(|&i| measured[i].1).fold(0.0_f32, f32::max);
        let mut x = center_x - row_width / 2.0;
        for &idx in row {
            let node = &spec.nodes[idx];
            let (width, height, _) = measured[idx];
            let shape = match node.kind {
                FlowchartNodeKind::Start | FlowchartNodeKind::End => NodeShape::Stadium,
                FlowchartNodeKind::Process => NodeShape::Rect,
                FlowchartNodeKind::Decision => NodeShape::Diamond,
            };
            layout.nodes.push(NodeLayout {
                id: node.id.clone(),
                x: x + width / 2.0,
                y: y + row_height / 2.0,
                width,
                height,
                shape,
                label: measured[idx].2.clone(),
                paint: paint_for(node.kind),
            });
            x += width + COL_GAP;
        }
        y += row_height + ROW_GAP;
    }

    let by_id: HashMap<&str, usize> = layout
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    for edge in &spec.edges {
        let (Some(&from_idx), Some(&to_idx)) =
            (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str()))
        else {
            continue;
        };
        let from = &layout.nodes[from_idx];
        let to = &layout.nodes[to_idx];
        let (start, end) = if to.y > from.y {
            (
                (from.x, from.y + from.half_height()),
                (to.x, to.y - to.half_height()),
            )
        } else if to.y < from.y {
            // Back edge, leave from the side and bow outward.
            (
                (from.x + from.half_width(), from.y),
                (to.x + to.half_width(), to.y),
            )
        } else {
            let sign = if to.x > from.x { 1.0 } else { -1.0 };
            (
                (from.x + sign * from.half_width(), from.y),
                (to.x - sign * to.half_width(), to.y),
            )
        };
        let mut line = EdgeLayout::arrow(start, end, stroke.clone(), stroke_width);
        if to.y < from.y {
            let reach = from.half_width().max(to.half_width()) + 50.0;
            line.control = Some((from.x.max(to.x) + reach, (from.y + to.y) / 2.0));
        }
        if let Some(label) = &edge.label {
            let anchor = line.control.unwrap_or(((start.0 + end.0) / 2.0 + 8.0, (start.1 + end.1) / 2.0));
            line.label = Some(measure_line(label, edge_font, &font_family));
            line.label_anchor = Some(anchor);
            line.font_size = edge_font;
            line.text_color = theme::color(style, "edgeTextColor", "#5d7492");
        }
        layout.edges.push(line);
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

    fn sample() -> FlowchartSpec {
        let value = json!({
            "title": "Login",
            "nodes": [
                {"id": "start", "label": "Start", "type": "start"},
                {"id": "input", "label": "Enter credentials"},
                {"id": "check", "label": "Valid?", "type": "decision"},
                {"id": "home", "label": "Show home"},
                {"id": "end", "label": "End", "type": "end"}
            ],
            "edges": [
                {"from": "start", "to": "input"},
                {"from": "input", "to": "check"},
                {"from": "check", "to": "home", "label": "yes"},
                {"from": "check", "to": "input", "label": "no"},
                {"from": "home", "to": "end"}
            ]
        });
        match parse_spec(DiagramType::Flowchart, &value).unwrap() {
            DiagramSpec::Flowchart(spec) => spec,
            _ => unreachable!(),
        }
    }

    #[test]
    fn ranks_follow_the_longest_path() {
        let spec = sample();
        let rank = ranks(&spec);
        assert_eq!(rank["start"], 0);
        assert!(rank["input"] > rank["start"]);
        assert!(rank["check"] > rank["input"]);
        assert!(rank["home"] > rank["check"]);
        assert!(rank["end"] > rank["home"]);
    }

    #[test]
    fn shapes_match_node_kinds() {
        let spec = sample();
        let style = default_style(DiagramType::Flowchart);
        let result = layout(&spec, &style, &Dimensions::default());
        let shape_of = |id: &str| result.nodes.iter().find(|n| n.id == id).unwrap().shape;
        assert_eq!(shape_of("start"), NodeShape::Stadium);
        assert_eq!(shape_of("end"), NodeShape::Stadium);
        assert_eq!(shape_of("input"), NodeShape::Rect);
        assert_eq!(shape_of("check"), NodeShape::Diamond);
    }

    #[test]
    fn back_edge_is_curved_and_labelled() {
        let spec = sample();
        let style = default_style(DiagramType::Flowchart);
        let result = layout(&spec, &style, &Dimensions::default());
        let back = result
            .edges
            .iter()
            .find(|e| e.label.as_ref().is_some_and(|l| l.lines[0] == "no"))
            .unwrap();
        assert!(back.control.is_some());
        assert!(back.arrow_end);
    }

    #[test]
    fn back_edge_does_not_inflate_cycle_ranks() {
        // input and check loop on each other; their ranks must stay at
        // their forward-path depth so home and end still land below.
        let spec = sample();
        let rank = ranks(&spec);
        assert_eq!(rank["input"], 1);
        assert_eq!(rank["check"], 2);
        assert_eq!(rank["home"], 3);
        assert_eq!(rank["end"], 4);
    }

    #[test]
    fn start_end_color_key_drives_terminal_fills() {
        let spec = sample();
        let mut style = default_style(DiagramType::Flowchart);
        style.insert("startEndColor".to_string(), "#ff6b6b".into());
        let result = layout(&spec, &style, &Dimensions::default());
        for id in ["start", "end"] {
            let node = result.nodes.iter().find(|n| n.id == id).unwrap();
            assert_eq!(node.paint.fill, "#ff6b6b");
        }
    }

    #[test]
    fn rows_descend_with_rank() {
        let spec = sample();
        let style = default_style(DiagramType::Flowchart);
        let result = layout(&spec, &style, &Dimensions::default());
        let y_of = |id: &str| result.nodes.iter().find(|n| n.id == id).unwrap().y;
        assert!(y_of("start") < y_of("input"));
        assert!(y_of("input") < y_of("check"));
        assert!(y_of("check") < y_of("home"));
    }
}
