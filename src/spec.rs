use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Longest accepted label for list items (topics, attributes, steps).
pub const MAX_ITEM_LEN: usize = 100;
/// Bubble maps cap attribute counts so the radial ring stays readable.
pub const MAX_BUBBLE_ATTRIBUTES: usize = 15;
/// Double bubble maps cap the combined similarity/difference count.
pub const MAX_DOUBLE_BUBBLE_ITEMS: usize = 20;
/// Tree maps cap fan-out per level.
pub const MAX_TREE_BRANCHES: usize = 10;
pub const MAX_TREE_LEAVES_PER_BRANCH: usize = 10;
/// Concept maps cap node count and label length.
pub const MAX_CONCEPTS: usize = 30;
pub const MAX_CONCEPT_LABEL_LEN: usize = 60;
/// Bridge maps render at most this many analogy pairs.
pub const MAX_BRIDGE_PAIRS: usize = 5;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unknown diagram type: {0}")]
    UnknownType(String),
    #[error("invalid {kind} spec: {source}")]
    Decode {
        kind: DiagramType,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl SpecError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SpecError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramType {
    BubbleMap,
    CircleMap,
    DoubleBubbleMap,
    BridgeMap,
    FlowMap,
    MultiFlowMap,
    TreeMap,
    BraceMap,
    Mindmap,
    ConceptMap,
    VennDiagram,
    Flowchart,
}

impl DiagramType {
    pub const ALL: [DiagramType; 12] = [
        DiagramType::BubbleMap,
        DiagramType::CircleMap,
        DiagramType::DoubleBubbleMap,
        DiagramType::BridgeMap,
        DiagramType::FlowMap,
        DiagramType::MultiFlowMap,
        DiagramType::TreeMap,
        DiagramType::BraceMap,
        DiagramType::Mindmap,
        DiagramType::ConceptMap,
        DiagramType::VennDiagram,
        DiagramType::Flowchart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::BubbleMap => "bubble_map",
            DiagramType::CircleMap => "circle_map",
            DiagramType::DoubleBubbleMap => "double_bubble_map",
            DiagramType::BridgeMap => "bridge_map",
            DiagramType::FlowMap => "flow_map",
            DiagramType::MultiFlowMap => "multi_flow_map",
            DiagramType::TreeMap => "tree_map",
            DiagramType::BraceMap => "brace_map",
            DiagramType::Mindmap => "mindmap",
            DiagramType::ConceptMap => "concept_map",
            DiagramType::VennDiagram => "venn_diagram",
            DiagramType::Flowchart => "flowchart",
        }
    }

    /// Parses free-form type names. Case, hyphens and spaces are ignored and
    /// a handful of historical aliases are accepted. The empty string maps to
    /// `Mindmap`, matching the loader's default.
    pub fn parse(raw: &str) -> Result<DiagramType, SpecError> {
        let normalized = normalize_type_name(raw);
        let resolved = match normalized.as_str() {
            "" | "mindmap" | "mind_map" | "mindmaps" => DiagramType::Mindmap,
            "bubble_map" | "bubblemap" | "bubble" => DiagramType::BubbleMap,
            "circle_map" | "circlemap" | "circle" => DiagramType::CircleMap,
            "double_bubble_map" | "doublebubblemap" | "double_bubble" => {
                DiagramType::DoubleBubbleMap
            }
            "bridge_map" | "bridgemap" | "bridge" => DiagramType::BridgeMap,
            "flow_map" | "flowmap" => DiagramType::FlowMap,
            "multi_flow_map" | "multiflowmap" | "multi_flow" => DiagramType::MultiFlowMap,
            "tree_map" | "treemap" | "tree" => DiagramType::TreeMap,
            "brace_map" | "bracemap" | "brace" => DiagramType::BraceMap,
            "concept_map" | "conceptmap" | "concept_maps" | "concept" => DiagramType::ConceptMap,
            "venn_diagram" | "venn" => DiagramType::VennDiagram,
            "flowchart" | "flow_chart" => DiagramType::Flowchart,
            _ => return Err(SpecError::UnknownType(raw.to_string())),
        };
        Ok(resolved)
    }
}

impl std::fmt::Display for DiagramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_type_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['-', ' '], "_")
        .replace("__", "_")
}

#[derive(Debug, Clone, Deserialize)]
pub struct BubbleMapSpec {
    pub topic: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CircleMapSpec {
    pub topic: String,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoubleBubbleMapSpec {
    pub left: String,
    pub right: String,
    pub similarities: Vec<String>,
    pub left_differences: Vec<String>,
    pub right_differences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalogyPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeMapSpec {
    pub relating_factor: String,
    pub analogies: Vec<AnalogyPair>,
    #[serde(default)]
    pub dimension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubstepGroup {
    pub step: String,
    #[serde(default)]
    pub substeps: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowMapSpec {
    pub title: String,
    pub steps: Vec<String>,
    #[serde(default)]
    pub substeps: Vec<SubstepGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiFlowMapSpec {
    pub event: String,
    pub causes: Vec<String>,
    pub effects: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    #[serde(alias = "label")]
    pub text: String,
    #[serde(default, alias = "leaves")]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeMapSpec {
    pub topic: String,
    pub children: Vec<TreeNode>,
    #[serde(default)]
    pub dimension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BracePart {
    pub name: String,
    #[serde(default)]
    pub subparts: Vec<BraceSubpart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BraceSubpart {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BraceMapSpec {
    pub topic: String,
    pub parts: Vec<BracePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MindmapSpec {
    pub topic: String,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptRelationship {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptMapSpec {
    pub topic: String,
    pub concepts: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<ConceptRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VennSet {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VennDiagramSpec {
    pub sets: Vec<VennSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowchartNodeKind {
    Start,
    End,
    Process,
    Decision,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub label: String,
    #[serde(default = "default_node_kind", alias = "type")]
    pub kind: FlowchartNodeKind,
}

fn default_node_kind() -> FlowchartNodeKind {
    FlowchartNodeKind::Process
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowchartEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowchartSpec {
    #[serde(default)]
    pub title: Option<String>,
    pub nodes: Vec<FlowchartNode>,
    pub edges: Vec<FlowchartEdge>,
}

/// A validated, typed diagram spec ready for layout.
#[derive(Debug, Clone)]
pub enum DiagramSpec {
    Bubble(BubbleMapSpec),
    Circle(CircleMapSpec),
    DoubleBubble(DoubleBubbleMapSpec),
    Bridge(BridgeMapSpec),
    Flow(FlowMapSpec),
    MultiFlow(MultiFlowMapSpec),
    Tree(TreeMapSpec),
    Brace(BraceMapSpec),
    Mindmap(MindmapSpec),
    Concept(ConceptMapSpec),
    Venn(VennDiagramSpec),
    Flowchart(FlowchartSpec),
}

impl DiagramSpec {
    pub fn kind(&self) -> DiagramType {
        match self {
            DiagramSpec::Bubble(_) => DiagramType::BubbleMap,
            DiagramSpec::Circle(_) => DiagramType::CircleMap,
            DiagramSpec::DoubleBubble(_) => DiagramType::DoubleBubbleMap,
            DiagramSpec::Bridge(_) => DiagramType::BridgeMap,
            DiagramSpec::Flow(_) => DiagramType::FlowMap,
            DiagramSpec::MultiFlow(_) => DiagramType::MultiFlowMap,
            DiagramSpec::Tree(_) => DiagramType::TreeMap,
            DiagramSpec::Brace(_) => DiagramType::BraceMap,
            DiagramSpec::Mindmap(_) => DiagramType::Mindmap,
            DiagramSpec::Concept(_) => DiagramType::ConceptMap,
            DiagramSpec::Venn(_) => DiagramType::VennDiagram,
            DiagramSpec::Flowchart(_) => DiagramType::Flowchart,
        }
    }
}

/// Decodes and validates a raw JSON value as a spec of the given type.
/// Unknown keys are ignored; validation failures carry field-level messages.
pub fn parse_spec(kind: DiagramType, value: &Value) -> Result<DiagramSpec, SpecError> {
    fn decode<T: serde::de::DeserializeOwned>(
        kind: DiagramType,
        value: &Value,
    ) -> Result<T, SpecError> {
        serde_json::from_value(value.clone()).map_err(|source| SpecError::Decode { kind, source })
    }

    let spec = match kind {
        DiagramType::BubbleMap => {
            let mut spec: BubbleMapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            validate_items("attributes", &mut spec.attributes, 1, MAX_BUBBLE_ATTRIBUTES)?;
            DiagramSpec::Bubble(spec)
        }
        DiagramType::CircleMap => {
            let mut spec: CircleMapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            validate_items("context", &mut spec.context, 1, MAX_DOUBLE_BUBBLE_ITEMS)?;
            DiagramSpec::Circle(spec)
        }
        DiagramType::DoubleBubbleMap => {
            let mut spec: DoubleBubbleMapSpec = decode(kind, value)?;
            validate_label("left", &spec.left)?;
            validate_label("right", &spec.right)?;
            validate_items("similarities", &mut spec.similarities, 1, usize::MAX)?;
            validate_items("left_differences", &mut spec.left_differences, 2, usize::MAX)?;
            validate_items(
                "right_differences",
                &mut spec.right_differences,
                2,
                usize::MAX,
            )?;
            let total = spec.similarities.len()
                + spec.left_differences.len()
                + spec.right_differences.len();
            if total > MAX_DOUBLE_BUBBLE_ITEMS {
                return Err(SpecError::invalid(
                    "similarities",
                    format!(
                        "combined item count {total} exceeds the limit of {MAX_DOUBLE_BUBBLE_ITEMS}"
                    ),
                ));
            }
            DiagramSpec::DoubleBubble(spec)
        }
        DiagramType::BridgeMap => {
            let mut spec: BridgeMapSpec = decode(kind, value)?;
            validate_label("relating_factor", &spec.relating_factor)?;
            if spec.analogies.is_empty() {
                return Err(SpecError::invalid("analogies", "must be a non-empty array"));
            }
            for pair in &spec.analogies {
                validate_label("analogies", &pair.left)?;
                validate_label("analogies", &pair.right)?;
            }
            spec.analogies.truncate(MAX_BRIDGE_PAIRS);
            DiagramSpec::Bridge(spec)
        }
        DiagramType::FlowMap => {
            let mut spec: FlowMapSpec = decode(kind, value)?;
            validate_label("title", &spec.title)?;
            validate_items("steps", &mut spec.steps, 1, usize::MAX)?;
            dedupe_in_place(&mut spec.steps);
            spec.substeps
                .retain(|group| spec.steps.iter().any(|s| s == &group.step));
            for group in &mut spec.substeps {
                group.substeps.retain(|s| !s.trim().is_empty());
            }
            DiagramSpec::Flow(spec)
        }
        DiagramType::MultiFlowMap => {
            let mut spec: MultiFlowMapSpec = decode(kind, value)?;
            validate_label("event", &spec.event)?;
            validate_items("causes", &mut spec.causes, 1, usize::MAX)?;
            validate_items("effects", &mut spec.effects, 1, usize::MAX)?;
            DiagramSpec::MultiFlow(spec)
        }
        DiagramType::TreeMap => {
            let mut spec: TreeMapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            if spec.children.is_empty() {
                return Err(SpecError::invalid("children", "must be a non-empty array"));
            }
            normalize_tree_level(&mut spec.children, MAX_TREE_BRANCHES);
            for branch in &mut spec.children {
                normalize_tree_level(&mut branch.children, MAX_TREE_LEAVES_PER_BRANCH);
                // Tree maps are two levels deep; anything further is folded away.
                for leaf in &mut branch.children {
                    leaf.children.clear();
                }
            }
            if spec.children.is_empty() {
                return Err(SpecError::invalid(
                    "children",
                    "no valid branches after normalization",
                ));
            }
            DiagramSpec::Tree(spec)
        }
        DiagramType::BraceMap => {
            let spec: BraceMapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            if spec.parts.is_empty() {
                return Err(SpecError::invalid("parts", "must be a non-empty array"));
            }
            for part in &spec.parts {
                validate_label("parts", &part.name)?;
                for sub in &part.subparts {
                    validate_label("subparts", &sub.name)?;
                }
            }
            DiagramSpec::Brace(spec)
        }
        DiagramType::Mindmap => {
            let mut spec: MindmapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            if spec.children.is_empty() {
                return Err(SpecError::invalid("children", "must be a non-empty array"));
            }
            normalize_tree_level(&mut spec.children, MAX_TREE_BRANCHES);
            for branch in &mut spec.children {
                normalize_tree_level(&mut branch.children, MAX_TREE_LEAVES_PER_BRANCH);
                for child in &mut branch.children {
                    child.children.clear();
                }
            }
            DiagramSpec::Mindmap(spec)
        }
        DiagramType::ConceptMap => {
            let mut spec: ConceptMapSpec = decode(kind, value)?;
            validate_label("topic", &spec.topic)?;
            if spec.concepts.is_empty() {
                return Err(SpecError::invalid("concepts", "must be a non-empty array"));
            }
            sanitize_concepts(&mut spec)?;
            DiagramSpec::Concept(spec)
        }
        DiagramType::VennDiagram => {
            let mut spec: VennDiagramSpec = decode(kind, value)?;
            if !(2..=4).contains(&spec.sets.len()) {
                return Err(SpecError::invalid(
                    "sets",
                    format!("expected 2 to 4 sets, got {}", spec.sets.len()),
                ));
            }
            for set in &mut spec.sets {
                validate_label("sets", &set.name)?;
                set.items.retain(|item| !item.trim().is_empty());
            }
            DiagramSpec::Venn(spec)
        }
        DiagramType::Flowchart => {
            let spec: FlowchartSpec = decode(kind, value)?;
            if spec.nodes.is_empty() {
                return Err(SpecError::invalid("nodes", "must be a non-empty array"));
            }
            let mut ids = HashSet::new();
            for node in &spec.nodes {
                validate_label("nodes", &node.label)?;
                if !ids.insert(node.id.as_str()) {
                    return Err(SpecError::invalid(
                        "nodes",
                        format!("duplicate node id `{}`", node.id),
                    ));
                }
            }
            for edge in &spec.edges {
                for endpoint in [&edge.from, &edge.to] {
                    if !ids.contains(endpoint.as_str()) {
                        return Err(SpecError::invalid(
                            "edges",
                            format!("edge references unknown node `{endpoint}`"),
                        ));
                    }
                }
            }
            DiagramSpec::Flowchart(spec)
        }
    };
    Ok(spec)
}

/// Resolves the diagram type for a raw spec document: an explicit override
/// wins, otherwise the document's own `type` field is used.
pub fn resolve_type(override_type: Option<&str>, value: &Value) -> Result<DiagramType, SpecError> {
    if let Some(raw) = override_type {
        return DiagramType::parse(raw);
    }
    let raw = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SpecError::MissingField("type"))?;
    DiagramType::parse(raw)
}

fn validate_label(field: &'static str, label: &str) -> Result<(), SpecError> {
    if label.trim().is_empty() {
        return Err(SpecError::invalid(field, "must be a non-empty string"));
    }
    if label.len() > MAX_ITEM_LEN {
        return Err(SpecError::invalid(
            field,
            format!("cannot be longer than {MAX_ITEM_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_items(
    field: &'static str,
    items: &mut Vec<String>,
    min: usize,
    max: usize,
) -> Result<(), SpecError> {
    items.retain(|item| !item.trim().is_empty());
    if items.len() < min {
        let reason = if min == 1 {
            "must be a non-empty array".to_string()
        } else {
            format!("must contain at least {min} items")
        };
        return Err(SpecError::invalid(field, reason));
    }
    if items.len() > max {
        return Err(SpecError::invalid(
            field,
            format!("cannot contain more than {max} items"),
        ));
    }
    for item in items.iter() {
        if item.len() > MAX_ITEM_LEN {
            return Err(SpecError::invalid(
                field,
                format!("items cannot be longer than {MAX_ITEM_LEN} characters"),
            ));
        }
    }
    Ok(())
}

fn dedupe_in_place(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

fn normalize_tree_level(nodes: &mut Vec<TreeNode>, cap: usize) {
    let mut seen = HashSet::new();
    nodes.retain(|node| {
        let text = node.text.trim().to_string();
        !text.is_empty() && seen.insert(text)
    });
    nodes.truncate(cap);
}

/// Canonical concept key: lowercased with all whitespace removed, so
/// "Water Cycle" and "water  cycle" address the same node.
pub fn canonical_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Relationship cleanup: labels are truncated, self-loops and duplicate
/// unordered pairs dropped, and endpoints that name missing concepts are
/// added back as concepts while room remains.
fn sanitize_concepts(spec: &mut ConceptMapSpec) -> Result<(), SpecError> {
    let mut seen = HashSet::new();
    spec.concepts.retain(|c| {
        let key = canonical_key(c);
        !key.is_empty() && seen.insert(key)
    });
    for concept in &spec.concepts {
        if concept.len() > MAX_CONCEPT_LABEL_LEN {
            return Err(SpecError::invalid(
                "concepts",
                format!("labels cannot be longer than {MAX_CONCEPT_LABEL_LEN} characters"),
            ));
        }
    }
    if spec.concepts.len() > MAX_CONCEPTS {
        spec.concepts.truncate(MAX_CONCEPTS);
    }

    let mut known: HashSet<String> = spec.concepts.iter().map(|c| canonical_key(c)).collect();
    known.insert(canonical_key(&spec.topic));

    let mut kept = Vec::new();
    let mut pairs = HashSet::new();
    for mut rel in std::mem::take(&mut spec.relationships) {
        rel.label.truncate(MAX_CONCEPT_LABEL_LEN);
        let from_key = canonical_key(&rel.from);
        let to_key = canonical_key(&rel.to);
        if from_key.is_empty() || to_key.is_empty() || from_key == to_key {
            continue;
        }
        let pair = if from_key <= to_key {
            (from_key.clone(), to_key.clone())
        } else {
            (to_key.clone(), from_key.clone())
        };
        if !pairs.insert(pair) {
            continue;
        }
        for (key, label) in [(&from_key, &rel.from), (&to_key, &rel.to)] {
            if !known.contains(key) && spec.concepts.len() < MAX_CONCEPTS {
                spec.concepts.push(label.clone());
                known.insert(key.clone());
            }
        }
        if known.contains(&from_key) && known.contains(&to_key) {
            kept.push(rel);
        }
    }
    spec.relationships = kept;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_aliased_type_names() {
        assert_eq!(
            DiagramType::parse("Bubble-Map").unwrap(),
            DiagramType::BubbleMap
        );
        assert_eq!(
            DiagramType::parse("doublebubblemap").unwrap(),
            DiagramType::DoubleBubbleMap
        );
        assert_eq!(DiagramType::parse("Mind Map").unwrap(), DiagramType::Mindmap);
        assert_eq!(DiagramType::parse("").unwrap(), DiagramType::Mindmap);
        assert!(DiagramType::parse("pie").is_err());
    }

    #[test]
    fn missing_array_field_is_an_error() {
        let err = parse_spec(DiagramType::BubbleMap, &json!({"topic": "Water"})).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bubble_map"), "unexpected message: {msg}");
    }

    #[test]
    fn bubble_attributes_are_capped() {
        let attrs: Vec<String> = (0..20).map(|i| format!("attr {i}")).collect();
        let err = parse_spec(
            DiagramType::BubbleMap,
            &json!({"topic": "Water", "attributes": attrs}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than 15"));
    }

    #[test]
    fn flow_steps_are_deduped_in_order() {
        let spec = parse_spec(
            DiagramType::FlowMap,
            &json!({
                "title": "Brewing",
                "steps": ["Grind", "Bloom", "Grind", "Pour"],
                "substeps": [{"step": "Pour", "substeps": ["Spiral", ""]}]
            }),
        )
        .unwrap();
        let DiagramSpec::Flow(flow) = spec else {
            panic!("expected flow spec")
        };
        assert_eq!(flow.steps, vec!["Grind", "Bloom", "Pour"]);
        assert_eq!(flow.substeps.len(), 1);
        assert_eq!(flow.substeps[0].substeps, vec!["Spiral"]);
    }

    #[test]
    fn concept_relationships_are_sanitized() {
        let spec = parse_spec(
            DiagramType::ConceptMap,
            &json!({
                "topic": "Water Cycle",
                "concepts": ["Evaporation", "Condensation"],
                "relationships": [
                    {"from": "Evaporation", "to": "Condensation", "label": "feeds"},
                    {"from": "condensation", "to": "EVAPORATION", "label": "reverse dup"},
                    {"from": "Evaporation", "to": "evaporation", "label": "self"},
                    {"from": "Condensation", "to": "Precipitation", "label": "becomes"}
                ]
            }),
        )
        .unwrap();
        let DiagramSpec::Concept(concept) = spec else {
            panic!("expected concept spec")
        };
        assert_eq!(concept.relationships.len(), 2);
        assert!(concept.concepts.iter().any(|c| c == "Precipitation"));
    }

    #[test]
    fn venn_requires_two_to_four_sets() {
        let err = parse_spec(
            DiagramType::VennDiagram,
            &json!({"sets": [{"name": "A"}]}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("2 to 4"));
    }

    #[test]
    fn flowchart_rejects_unknown_edge_endpoints() {
        let err = parse_spec(
            DiagramType::Flowchart,
            &json!({
                "nodes": [{"id": "a", "label": "Start", "kind": "start"}],
                "edges": [{"from": "a", "to": "missing"}]
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown node"));
    }

    #[test]
    fn tree_levels_are_capped_and_deduped() {
        let children: Vec<_> = (0..15)
            .map(|i| json!({"text": format!("branch {}", i % 12)}))
            .collect();
        let spec = parse_spec(
            DiagramType::TreeMap,
            &json!({"topic": "Animals", "children": children}),
        )
        .unwrap();
        let DiagramSpec::Tree(tree) = spec else {
            panic!("expected tree spec")
        };
        assert_eq!(tree.children.len(), MAX_TREE_BRANCHES);
    }

    #[test]
    fn resolve_type_prefers_override() {
        let value = json!({"type": "bubble_map", "topic": "x", "attributes": ["y"]});
        assert_eq!(
            resolve_type(Some("circle_map"), &value).unwrap(),
            DiagramType::CircleMap
        );
        assert_eq!(
            resolve_type(None, &value).unwrap(),
            DiagramType::BubbleMap
        );
    }
}
