use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::layout::Layout;

/// Debug view of a computed layout, written as JSON next to (or instead
/// of) the rendered SVG.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub error: Option<String>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub labels: Vec<LabelDump>,
    pub path_count: usize,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub shape: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub fill: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub points: Vec<[f32; 2]>,
    pub curved: bool,
    pub arrow_end: bool,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub x: f32,
    pub y: f32,
    pub lines: Vec<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                shape: format!("{:?}", node.shape),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label_lines: node.label.lines.clone(),
                fill: node.paint.fill.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
                curved: edge.control.is_some(),
                arrow_end: edge.arrow_end,
                label: edge.label.as_ref().map(|label| label.lines.join("\n")),
            })
            .collect();

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                x: label.x,
                y: label.y,
                lines: label.text.lines.clone(),
            })
            .collect();

        LayoutDump {
            kind: layout.kind.as_str().to_string(),
            width: layout.width,
            height: layout.height,
            error: layout.error.clone(),
            nodes,
            edges,
            labels,
            path_count: layout.paths.len(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::spec::{DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    #[test]
    fn dump_reflects_layout_contents() {
        let value = json!({"topic": "Planets", "attributes": ["rocky", "gas"]});
        let spec = parse_spec(DiagramType::BubbleMap, &value).unwrap();
        let style = default_style(DiagramType::BubbleMap);
        let layout = compute_layout(&spec, &style, None);
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.kind, "bubble_map");
        assert_eq!(dump.nodes.len(), layout.nodes.len());
        assert_eq!(dump.edges.len(), layout.edges.len());
        assert!(dump.error.is_none());
    }
}
