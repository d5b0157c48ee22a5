use std::path::Path;

use anyhow::Result;

use crate::layout::{Layout, NodeShape, TextAnchor, TextBlock};
use crate::theme::{self, StyleMap};

const LINE_HEIGHT: f32 = 1.25;

/// Serializes a computed layout to an SVG document string.
pub fn render_svg(layout: &Layout, style: &StyleMap, watermark: &str) -> String {
    let width = layout.width.max(200.0);
    let height = layout.height.max(150.0);
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let background = theme::color(style, "background", "#ffffff");
    let marker_color = theme::color(style, "stroke", "#2c3e50");

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>"
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{marker_color}\"/></marker>",
    ));
    svg.push_str("</defs>");

    for path in &layout.paths {
        let fill = path.fill.as_deref().unwrap_or("none");
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            path.d, fill, path.stroke, path.stroke_width
        ));
    }

    for edge in &layout.edges {
        let d = match edge.control {
            Some((cx, cy)) if edge.points.len() >= 2 => {
                let first = edge.points[0];
                let last = edge.points[edge.points.len() - 1];
                format!(
                    "M {:.2} {:.2} Q {cx:.2} {cy:.2} {:.2} {:.2}",
                    first.0, first.1, last.0, last.1
                )
            }
            _ => points_to_path(&edge.points),
        };
        let marker = if edge.arrow_end {
            " marker-end=\"url(#arrow)\""
        } else {
            ""
        };
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"{}/>",
            d, edge.stroke, edge.stroke_width, marker
        ));

        if let Some(label) = &edge.label
            && let Some((x, y)) = edge.label_anchor
        {
            let rect_x = x - label.width / 2.0 - 5.0;
            let rect_y = y - label.height / 2.0 - 3.0;
            svg.push_str(&format!(
                "<rect x=\"{rect_x:.2}\" y=\"{rect_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{background}\" fill-opacity=\"0.85\"/>",
                label.width + 10.0,
                label.height + 6.0,
            ));
            svg.push_str(&text_block_svg(
                x,
                y,
                label,
                edge.font_size,
                &font_family,
                &edge.text_color,
                false,
                "middle",
                1.0,
            ));
        }
    }

    for node in &layout.nodes {
        let paint = &node.paint;
        let opacity = if paint.opacity < 1.0 {
            format!(" fill-opacity=\"{:.2}\"", paint.opacity)
        } else {
            String::new()
        };
        let common = format!(
            "fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"{}",
            paint.fill, paint.stroke, paint.stroke_width, opacity
        );
        match node.shape {
            NodeShape::Rect | NodeShape::RoundedRect | NodeShape::Stadium => {
                let rx = match node.shape {
                    NodeShape::Rect => 0.0,
                    NodeShape::RoundedRect => 8.0,
                    _ => node.half_height(),
                };
                svg.push_str(&format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{rx:.2}\" ry=\"{rx:.2}\" {common}/>",
                    node.x - node.half_width(),
                    node.y - node.half_height(),
                    node.width,
                    node.height,
                ));
            }
            NodeShape::Ellipse => {
                svg.push_str(&format!(
                    "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" {common}/>",
                    node.x,
                    node.y,
                    node.half_width(),
                    node.half_height(),
                ));
            }
            NodeShape::Circle => {
                svg.push_str(&format!(
                    "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {common}/>",
                    node.x,
                    node.y,
                    node.half_width(),
                ));
            }
            NodeShape::Diamond => {
                svg.push_str(&format!(
                    "<polygon points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" {common}/>",
                    node.x,
                    node.y - node.half_height(),
                    node.x + node.half_width(),
                    node.y,
                    node.x,
                    node.y + node.half_height(),
                    node.x - node.half_width(),
                    node.y,
                ));
            }
        }
        if !node.label.lines.is_empty() {
            svg.push_str(&text_block_svg(
                node.x,
                node.y,
                &node.label,
                paint.font_size,
                &font_family,
                &paint.text_color,
                paint.bold,
                "middle",
                1.0,
            ));
        }
    }

    for label in &layout.labels {
        let anchor = match label.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        // LabelLayout y is the top of the block; center the block on it.
        let cy = label.y + label.text.height / 2.0;
        svg.push_str(&text_block_svg(
            label.x,
            cy,
            &label.text,
            label.font_size,
            &font_family,
            &label.color,
            label.bold,
            anchor,
            label.opacity,
        ));
    }

    if layout.error.is_none() && !watermark.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{font_family}\" font-size=\"{}\" fill=\"{}\" opacity=\"{}\">{}</text>",
            width - 10.0,
            height - 10.0,
            theme::number(style, "watermarkFontSize", 12.0),
            theme::color(style, "watermarkColor", "#999999"),
            theme::number(style, "watermarkOpacity", 0.35),
            escape_xml(watermark)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

#[allow(clippy::too_many_arguments)]
fn text_block_svg(
    x: f32,
    cy: f32,
    block: &TextBlock,
    font_size: f32,
    font_family: &str,
    fill: &str,
    bold: bool,
    anchor: &str,
    opacity: f32,
) -> String {
    let total_height = block.lines.len() as f32 * font_size * LINE_HEIGHT;
    let start_y = cy - total_height / 2.0 + font_size;
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    let opacity_attr = if opacity < 1.0 {
        format!(" opacity=\"{opacity:.2}\"")
    } else {
        String::new()
    };

    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"{anchor}\" font-family=\"{font_family}\" font-size=\"{font_size}\" fill=\"{fill}\"{weight}{opacity_attr}>",
    );
    for (idx, line) in block.lines.iter().enumerate() {
        let dy = if idx == 0 {
            0.0
        } else {
            font_size * LINE_HEIGHT
        };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Dimensions, compute_error_layout, compute_layout};
    use crate::spec::{DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    #[test]
    fn bubble_map_svg_has_shapes_and_labels() {
        let value = json!({"topic": "Oceans", "attributes": ["deep", "salty", "vast"]});
        let spec = parse_spec(DiagramType::BubbleMap, &value).unwrap();
        let style = default_style(DiagramType::BubbleMap);
        let layout = compute_layout(&spec, &style, None);
        let svg = render_svg(&layout, &style, "MindGraph");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains("Oceans"));
        assert!(svg.contains("MindGraph"));
    }

    #[test]
    fn watermark_is_omitted_when_empty() {
        let value = json!({"topic": "Oceans", "attributes": ["deep"]});
        let spec = parse_spec(DiagramType::BubbleMap, &value).unwrap();
        let style = default_style(DiagramType::BubbleMap);
        let layout = compute_layout(&spec, &style, None);
        let svg = render_svg(&layout, &style, "");
        assert!(!svg.contains("text-anchor=\"end\""));
    }

    #[test]
    fn error_card_has_message_but_no_watermark() {
        let style = default_style(DiagramType::Mindmap);
        let layout = compute_error_layout(
            DiagramType::Mindmap,
            "missing field `topic`",
            &style,
            &Dimensions::default(),
        );
        let svg = render_svg(&layout, &style, "MindGraph");
        assert!(svg.contains("Unable to render diagram"));
        assert!(svg.contains("missing field `topic`"));
        assert!(!svg.contains(">MindGraph<"));
    }

    #[test]
    fn xml_entities_are_escaped() {
        let value = json!({"topic": "Salt & <Pepper>", "attributes": ["\"quoted\""]});
        let spec = parse_spec(DiagramType::BubbleMap, &value).unwrap();
        let style = default_style(DiagramType::BubbleMap);
        let layout = compute_layout(&spec, &style, None);
        let svg = render_svg(&layout, &style, "");
        assert!(svg.contains("Salt &amp; &lt;Pepper&gt;"));
        assert!(!svg.contains("<Pepper>"));
    }
}
