use std::collections::HashMap;
use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::f32::consts::PI;
use std::hash::{Hash, Hasher};

use crate::spec::{ConceptMapSpec, canonical_key};
use crate::theme::{self, StyleMap};

use super::text::measure_block;
use super::{
    Dimensions, EdgeLayout, Layout, NodeLayout, NodeShape, Paint, ellipse_edge, fit_canvas,
    resolve_collisions, translate,
};

const NODE_SPACING: f32 = 80.0;
const BASE_RADIUS_UNITS: f32 = 1.8;
const MAX_RADIUS_UNITS: f32 = 5.0;

/// Curvature offsets cycled across relationship edges so parallel links
/// stay visually distinct.
const CURVATURES: [f32; 5] = [0.0, 8.0, -8.0, 16.0, -16.0];

fn ring_count(concepts: usize) -> usize {
    if concepts <= 10 {
        2
    } else if concepts <= 20 {
        3
    } else {
        4
    }
}

/// Stable per-label jitter in [-1, 1] so reruns produce identical layouts.
fn jitter(label: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    label.hash(&mut hasher);
    let raw = hasher.finish() % 2001;
    (raw as f32 - 1000.0) / 1000.0
}

/// Concept map: topic at the center, concepts on distance rings chosen by
/// graph distance from the topic, labelled relationship edges between them.
pub(super) fn layout(spec: &ConceptMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "topicFontSize", 16.0);
    let concept_font = theme::number(style, "conceptFontSize", 14.0);
    let relation_font = theme::number(style, "relationshipFontSize", 12.0);
    let relation_color = theme::color(style, "relationshipColor", "#a7c7e7");
    let stroke = theme::color(style, "stroke", "#35506b");
    let stroke_width = theme::number(style, "strokeWidth", 1.5);

    let max_layer = ring_count(spec.concepts.len());
    let layers = assign_layers(spec, max_layer);

    let radius_incr = (3.5 / max_layer as f32).min(1.2);
    let ring_radius = |layer: usize| -> f32 {
        let units =
            (BASE_RADIUS_UNITS + (layer.saturating_sub(1)) as f32 * radius_incr).min(MAX_RADIUS_UNITS);
        units * NODE_SPACING
    };

    let topic_block = measure_block(&spec.topic, topic_font, &font_family, 180.0);
    let topic_rx = (topic_block.width / 2.0 + 24.0).max(55.0);
    let topic_ry = (topic_block.height / 2.0 + 14.0).max(30.0);

    let mut layout = Layout::new(crate::spec::DiagramType::ConceptMap, 0.0, 0.0);

    // Topic first so collision resolution can pin it.
    layout.nodes.push(NodeLayout {
        id: "topic".to_string(),
        x: 0.0,
        y: 0.0,
        width: topic_rx * 2.0,
        height: topic_ry * 2.0,
        shape: NodeShape::Ellipse,
        label: topic_block,
        paint: Paint::new(
            theme::color(style, "topicColor", "#4e79a7"),
            theme::color(style, "topicTextColor", "#ffffff"),
        )
        .stroke(stroke.clone(), 2.0)
        .font(topic_font)
        .bold(),
    });

    let concept_paint = Paint::new(
        theme::color(style, "conceptColor", "#e3f2fd"),
        theme::color(style, "conceptTextColor", "#2c3e50"),
    )
    .stroke(stroke.clone(), stroke_width)
    .font(concept_font);

    // Group per layer to spread angles evenly within each ring.
    let mut per_layer: Vec<Vec<usize>> = vec![Vec::new(); max_layer + 1];
    for (idx, concept) in spec.concepts.iter().enumerate() {
        let layer = layers
            .get(&canonical_key(concept))
            .copied()
            .unwrap_or(max_layer)
            .clamp(1, max_layer);
        per_layer[layer].push(idx);
    }

    for (layer, members) in per_layer.iter().enumerate().skip(1) {
        let count = members.len().max(1) as f32;
        let radius = ring_radius(layer);
        // Stagger ring start angles so layers do not line up.
        let phase = layer as f32 * 0.7;
        for (slot, &idx) in members.iter().enumerate() {
            let label = &spec.concepts[idx];
            let j = jitter(label);
            let angle = -PI / 2.0 + phase + 2.0 * PI * slot as f32 / count + j * 0.1;
            let r = radius * (1.0 + j * 0.1);
            let block = measure_block(label, concept_font, &font_family, 130.0);
            layout.nodes.push(NodeLayout {
                id: format!("concept-{idx}"),
                x: r * angle.cos(),
                y: r * angle.sin(),
                width: block.width + 22.0,
                height: block.height + 14.0,
                shape: NodeShape::Ellipse,
                label: block,
                paint: concept_paint.clone(),
            });
        }
    }

    resolve_collisions(&mut layout.nodes, 1, 12.0);

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

    // Edges only after nodes have settled.
    let position: HashMap<String, usize> = layout
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();
    let node_id = |label: &str| -> Option<usize> {
        let key = canonical_key(label);
        if key == canonical_key(&spec.topic) {
            return position.get("topic").copied();
        }
        spec.concepts
            .iter()
            .position(|c| canonical_key(c) == key)
            .and_then(|idx| position.get(&format!("concept-{idx}")).copied())
    };

    for (edge_idx, rel) in spec.relationships.iter().enumerate() {
        let (Some(a), Some(b)) = (node_id(&rel.from), node_id(&rel.to)) else {
            continue;
        };
        let (from, to) = (&layout.nodes[a], &layout.nodes[b]);
        let start = ellipse_edge(
            from.x,
            from.y,
            from.half_width(),
            from.half_height(),
            to.x - from.x,
            to.y - from.y,
        );
        let end = ellipse_edge(
            to.x,
            to.y,
            to.half_width(),
            to.half_height(),
            from.x - to.x,
            from.y - to.y,
        );
        let mut edge = EdgeLayout::arrow(start, end, relation_color.clone(), stroke_width);
        let bow = CURVATURES[edge_idx % CURVATURES.len()];
        let (mx, my) = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let len = (dx * dx + dy * dy).sqrt().max(1.0);
        let control = (mx - dy / len * bow, my + dx / len * bow);
        if bow != 0.0 {
            edge.control = Some(control);
        }
        if !rel.label.is_empty() {
            edge.label = Some(measure_block(&rel.label, relation_font, &font_family, 110.0));
            edge.label_anchor = Some((control.0, control.1 - 4.0));
            edge.font_size = relation_font;
            edge.text_color = theme::color(style, "relationshipTextColor", "#2c3e50");
        }
        layout.edges.push(edge);
    }

    fit_canvas(&mut layout, dims);
    layout
}

/// Breadth-first distance from the topic over the relationship graph.
/// Concepts the topic cannot reach land on the outermost ring.
fn assign_layers(spec: &ConceptMapSpec, max_layer: usize) -> HashMap<String, usize> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    for rel in &spec.relationships {
        let from = canonical_key(&rel.from);
        let to = canonical_key(&rel.to);
        adjacency.entry(from.clone()).or_default().push(to.clone());
        adjacency.entry(to).or_default().push(from);
    }

    let mut layers = HashMap::new();
    let topic_key = canonical_key(&spec.topic);
    let mut queue = VecDeque::from([(topic_key.clone(), 0usize)]);
    while let Some((key, depth)) = queue.pop_front() {
        for next in adjacency.get(&key).into_iter().flatten() {
            if *next == topic_key || layers.contains_key(next) {
                continue;
            }
            let layer = (depth + 1).min(max_layer);
            layers.insert(next.clone(), layer);
            queue.push_back((next.clone(), depth + 1));
        }
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DiagramSpec, DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    fn sample() -> ConceptMapSpec {
        let value = json!({
            "topic": "Water cycle",
            "concepts": ["evaporation", "condensation", "precipitation", "runoff", "clouds"],
            "relationships": [
                {"from": "Water cycle", "to": "evaporation", "label": "starts with"},
                {"from": "evaporation", "to": "condensation", "label": "leads to"},
                {"from": "condensation", "to": "clouds", "label": "forms"},
                {"from": "clouds", "to": "precipitation", "label": "releases"},
                {"from": "precipitation", "to": "runoff", "label": "becomes"}
            ]
        });
        match parse_spec(DiagramType::ConceptMap, &value).unwrap() {
            DiagramSpec::Concept(spec) => spec,
            _ => unreachable!(),
        }
    }

    #[test]
    fn direct_neighbors_sit_on_an_inner_ring() {
        let spec = sample();
        let layers = assign_layers(&spec, ring_count(spec.concepts.len()));
        assert_eq!(layers["evaporation"], 1);
        assert!(layers["runoff"] >= layers["evaporation"]);
    }

    #[test]
    fn layout_is_deterministic() {
        let spec = sample();
        let style = default_style(DiagramType::ConceptMap);
        let dims = Dimensions::for_kind(DiagramType::ConceptMap);
        let a = layout(&spec, &style, &dims);
        let b = layout(&spec, &style, &dims);
        for (na, nb) in a.nodes.iter().zip(&b.nodes) {
            assert_eq!(na.id, nb.id);
            assert!((na.x - nb.x).abs() < f32::EPSILON);
            assert!((na.y - nb.y).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn no_two_nodes_overlap_after_relaxation() {
        let spec = sample();
        let style = default_style(DiagramType::ConceptMap);
        let dims = Dimensions::for_kind(DiagramType::ConceptMap);
        let result = layout(&spec, &style, &dims);
        for i in 0..result.nodes.len() {
            for j in (i + 1)..result.nodes.len() {
                assert!(
                    !super::super::nodes_overlap(&result.nodes[i], &result.nodes[j], 0.0),
                    "{} overlaps {}",
                    result.nodes[i].id,
                    result.nodes[j].id
                );
            }
        }
    }

    #[test]
    fn every_relationship_becomes_a_labelled_edge() {
        let spec = sample();
        let style = default_style(DiagramType::ConceptMap);
        let dims = Dimensions::for_kind(DiagramType::ConceptMap);
        let result = layout(&spec, &style, &dims);
        assert_eq!(result.edges.len(), 5);
        assert!(result.edges.iter().all(|e| e.label.is_some()));
    }

    #[test]
    fn relationship_color_key_drives_edge_strokes() {
        let spec = sample();
        let mut style = default_style(DiagramType::ConceptMap);
        style.insert("relationshipColor".to_string(), "#224466".into());
        let dims = Dimensions::for_kind(DiagramType::ConceptMap);
        let result = layout(&spec, &style, &dims);
        assert!(result.edges.iter().all(|e| e.stroke == "#224466"));
    }
}
