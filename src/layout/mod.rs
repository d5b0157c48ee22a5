use serde::{Deserialize, Serialize};

use crate::spec::{DiagramSpec, DiagramType};
use crate::theme::StyleMap;

pub mod types;
pub use types::*;

mod brace;
mod bridge;
mod bubble;
mod circle;
mod concept;
mod double_bubble;
mod error;
mod flow;
mod flowchart;
mod mindmap;
mod multi_flow;
mod text;
mod tree;
mod venn;

pub use error::compute_error_layout;

/// Canvas request: layouts start from this size and grow to fit content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dimensions {
    pub base_width: f32,
    pub base_height: f32,
    pub padding: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions {
            base_width: 700.0,
            base_height: 500.0,
            padding: 40.0,
        }
    }
}

impl Dimensions {
    /// Recommended canvas per diagram type; everything else uses the
    /// global default.
    pub fn for_kind(kind: DiagramType) -> Self {
        let (base_width, base_height, padding) = match kind {
            DiagramType::BubbleMap => (800.0, 600.0, 80.0),
            DiagramType::CircleMap => (900.0, 700.0, 100.0),
            DiagramType::DoubleBubbleMap => (1000.0, 700.0, 100.0),
            DiagramType::BridgeMap => (1000.0, 600.0, 80.0),
            DiagramType::BraceMap => (800.0, 600.0, 40.0),
            DiagramType::ConceptMap => (800.0, 600.0, 100.0),
            _ => return Dimensions::default(),
        };
        Dimensions {
            base_width,
            base_height,
            padding,
        }
    }
}

/// Maximum passes of the pairwise overlap-separation sweep.
pub(crate) const MAX_COLLISION_ITERATIONS: usize = 50;

/// Computes the layout for a validated spec. Canvas dimensions default to
/// the per-type recommendation when the caller does not supply any.
pub fn compute_layout(spec: &DiagramSpec, style: &StyleMap, dims: Option<Dimensions>) -> Layout {
    let dims = dims.unwrap_or_else(|| Dimensions::for_kind(spec.kind()));
    match spec {
        DiagramSpec::Bubble(spec) => bubble::layout(spec, style, &dims),
        DiagramSpec::Circle(spec) => circle::layout(spec, style, &dims),
        DiagramSpec::DoubleBubble(spec) => double_bubble::layout(spec, style, &dims),
        DiagramSpec::Bridge(spec) => bridge::layout(spec, style, &dims),
        DiagramSpec::Flow(spec) => flow::layout(spec, style, &dims),
        DiagramSpec::MultiFlow(spec) => multi_flow::layout(spec, style, &dims),
        DiagramSpec::Tree(spec) => tree::layout(spec, style, &dims),
        DiagramSpec::Brace(spec) => brace::layout(spec, style, &dims),
        DiagramSpec::Mindmap(spec) => mindmap::layout(spec, style, &dims),
        DiagramSpec::Concept(spec) => concept::layout(spec, style, &dims),
        DiagramSpec::Venn(spec) => venn::layout(spec, style, &dims),
        DiagramSpec::Flowchart(spec) => flowchart::layout(spec, style, &dims),
    }
}

/// Axis-aligned overlap test on node bounding boxes with extra padding.
pub(crate) fn nodes_overlap(a: &NodeLayout, b: &NodeLayout, pad: f32) -> bool {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx < a.half_width() + b.half_width() + pad && dy < a.half_height() + b.half_height() + pad
}

/// Pushes overlapping nodes apart, half the separation to each side, until
/// no overlaps remain or the iteration bound is hit. Nodes with index below
/// `pinned` never move.
pub(crate) fn resolve_collisions(nodes: &mut [NodeLayout], pinned: usize, pad: f32) {
    for _ in 0..MAX_COLLISION_ITERATIONS {
        let mut moved = false;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if !nodes_overlap(&nodes[i], &nodes[j], pad) {
                    continue;
                }
                let dx = nodes[j].x - nodes[i].x;
                let dy = nodes[j].y - nodes[i].y;
                let overlap_x =
                    nodes[i].half_width() + nodes[j].half_width() + pad - dx.abs();
                let overlap_y =
                    nodes[i].half_height() + nodes[j].half_height() + pad - dy.abs();
                // Separate along the axis with the smaller intrusion.
                let (mx, my) = if overlap_x < overlap_y {
                    (overlap_x / 2.0 * if dx >= 0.0 { 1.0 } else { -1.0 }, 0.0)
                } else {
                    (0.0, overlap_y / 2.0 * if dy >= 0.0 { 1.0 } else { -1.0 })
                };
                if j >= pinned {
                    nodes[j].x += mx;
                    nodes[j].y += my;
                }
                if i >= pinned {
                    nodes[i].x -= mx;
                    nodes[i].y -= my;
                }
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
}

/// Grows the canvas so all nodes and labels fit inside the padding box.
/// Content is never translated; modules place their own origin.
pub(crate) fn fit_canvas(layout: &mut Layout, dims: &Dimensions) {
    let mut max_x: f32 = 0.0;
    let mut max_y: f32 = 0.0;
    for node in &layout.nodes {
        max_x = max_x.max(node.x + node.half_width());
        max_y = max_y.max(node.y + node.half_height());
    }
    for label in &layout.labels {
        max_x = max_x.max(label.x + label.text.width / 2.0);
        max_y = max_y.max(label.y + label.text.height);
    }
    for edge in &layout.edges {
        for (x, y) in &edge.points {
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }
    }
    layout.width = layout.width.max(dims.base_width).max(max_x + dims.padding);
    layout.height = layout
        .height
        .max(dims.base_height)
        .max(max_y + dims.padding);
}

/// Translates all geometry by (dx, dy). Only used by modules that lay out
/// around an origin and recenter afterwards; those carry no raw paths.
pub(crate) fn translate(layout: &mut Layout, dx: f32, dy: f32) {
    debug_assert!(layout.paths.is_empty(), "paths cannot be translated");
    for node in &mut layout.nodes {
        node.x += dx;
        node.y += dy;
    }
    for edge in &mut layout.edges {
        for point in &mut edge.points {
            point.0 += dx;
            point.1 += dy;
        }
        if let Some(control) = &mut edge.control {
            control.0 += dx;
            control.1 += dy;
        }
        if let Some(anchor) = &mut edge.label_anchor {
            anchor.0 += dx;
            anchor.1 += dy;
        }
    }
    for label in &mut layout.labels {
        label.x += dx;
        label.y += dy;
    }
}

/// Point on an ellipse boundary in the direction of `(dx, dy)` from its
/// center. Used to start spokes at the shape edge instead of the center.
pub(crate) fn ellipse_edge(cx: f32, cy: f32, rx: f32, ry: f32, dx: f32, dy: f32) -> (f32, f32) {
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return (cx, cy);
    }
    let (ux, uy) = (dx / len, dy / len);
    // Scale the unit direction so it lands on the ellipse.
    let denom = ((ux / rx.max(1.0)).powi(2) + (uy / ry.max(1.0)).powi(2)).sqrt();
    if denom <= f32::EPSILON {
        return (cx, cy);
    }
    (cx + ux / denom, cy + uy / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text::measure_line;

    fn node(x: f32, y: f32, w: f32, h: f32) -> NodeLayout {
        NodeLayout {
            id: format!("n-{x}-{y}"),
            x,
            y,
            width: w,
            height: h,
            shape: NodeShape::Rect,
            label: measure_line("x", 14.0, "sans-serif"),
            paint: Paint::new("#ffffff", "#000000"),
        }
    }

    #[test]
    fn overlap_test_respects_padding() {
        let a = node(0.0, 0.0, 40.0, 20.0);
        let b = node(50.0, 0.0, 40.0, 20.0);
        assert!(!nodes_overlap(&a, &b, 0.0));
        assert!(nodes_overlap(&a, &b, 15.0));
    }

    #[test]
    fn collision_resolution_separates_stacked_nodes() {
        let mut nodes = vec![node(100.0, 100.0, 60.0, 30.0), node(102.0, 101.0, 60.0, 30.0)];
        resolve_collisions(&mut nodes, 0, 4.0);
        assert!(
            !nodes_overlap(&nodes[0], &nodes[1], 4.0),
            "nodes still overlap: {:?} {:?}",
            (nodes[0].x, nodes[0].y),
            (nodes[1].x, nodes[1].y)
        );
    }

    #[test]
    fn pinned_nodes_do_not_move() {
        let mut nodes = vec![node(100.0, 100.0, 60.0, 30.0), node(104.0, 100.0, 60.0, 30.0)];
        resolve_collisions(&mut nodes, 1, 4.0);
        assert_eq!((nodes[0].x, nodes[0].y), (100.0, 100.0));
    }

    #[test]
    fn per_kind_dimensions_override_global_default() {
        let bubble = Dimensions::for_kind(DiagramType::BubbleMap);
        assert_eq!(bubble.base_width, 800.0);
        assert_eq!(bubble.padding, 80.0);
        let flow = Dimensions::for_kind(DiagramType::FlowMap);
        assert_eq!(flow.base_width, 700.0);
        assert_eq!(flow.base_height, 500.0);
        assert_eq!(flow.padding, 40.0);
    }
}
