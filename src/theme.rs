use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::spec::DiagramType;

/// Flat style dictionary resolved for one diagram type. Keys are the
/// camelCase names the style schemas use (`topicColor`, `rootFontSize`, ...).
pub type StyleMap = BTreeMap<String, StyleValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f32),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        StyleValue::Number(value)
    }
}

/// Looks up a color-valued style key, falling back to `default`.
pub fn color(style: &StyleMap, key: &str, default: &str) -> String {
    match style.get(key) {
        Some(StyleValue::Text(value)) => value.clone(),
        _ => default.to_string(),
    }
}

/// Looks up a numeric style key, falling back to `default`.
pub fn number(style: &StyleMap, key: &str, default: f32) -> f32 {
    match style.get(key) {
        Some(StyleValue::Number(value)) => *value,
        Some(StyleValue::Text(value)) => value.parse().unwrap_or(default),
        _ => default,
    }
}

/// Looks up a color-list style key (e.g. `setColors`, `branchColors`).
pub fn color_list(style: &StyleMap, key: &str, default: &[&str]) -> Vec<String> {
    match style.get(key) {
        Some(StyleValue::List(values)) if !values.is_empty() => values.clone(),
        _ => default.iter().map(|value| value.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Classic,
    Innovation,
}

impl FromStr for ColorTheme {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "classic" | "traditional" | "professional" => Ok(ColorTheme::Classic),
            "innovation" | "modern" | "creative" => Ok(ColorTheme::Innovation),
            other => Err(format!("unknown color theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariation {
    #[default]
    Colorful,
    Monochromatic,
    Dark,
    Light,
    Print,
    Display,
}

impl FromStr for ThemeVariation {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "colorful" | "vibrant" | "bright" => Ok(ThemeVariation::Colorful),
            "monochromatic" | "mono" => Ok(ThemeVariation::Monochromatic),
            "dark" | "night" => Ok(ThemeVariation::Dark),
            "light" | "day" => Ok(ThemeVariation::Light),
            "print" | "grayscale" => Ok(ThemeVariation::Print),
            "display" | "screen" | "digital" => Ok(ThemeVariation::Display),
            other => Err(format!("unknown theme variation: {other}")),
        }
    }
}

/// Importance level scaling lightness/saturation of the topic color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Center,
    Main,
    Sub,
    Detail,
}

impl Importance {
    fn multiplier(self) -> f32 {
        match self {
            Importance::Center => 1.0,
            Importance::Main => 0.8,
            Importance::Sub => 0.6,
            Importance::Detail => 0.4,
        }
    }
}

/// Six-slot palette: primary through senary.
type Palette = [&'static str; 6];

fn palette_for(theme: ColorTheme, variation: ThemeVariation) -> Palette {
    match (theme, variation) {
        (ColorTheme::Classic, ThemeVariation::Colorful) => [
            "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc949",
        ],
        (ColorTheme::Classic, ThemeVariation::Monochromatic) => [
            "#2c3e50", "#34495e", "#5d6d7e", "#85929e", "#aeb6bf", "#d5dbdb",
        ],
        (ColorTheme::Classic, ThemeVariation::Dark) => [
            "#1a1a1a", "#2c2c2c", "#404040", "#5a5a5a", "#737373", "#8c8c8c",
        ],
        (ColorTheme::Classic, ThemeVariation::Light) => [
            "#ffffff", "#f8f9fa", "#e9ecef", "#dee2e6", "#ced4da", "#adb5bd",
        ],
        (ColorTheme::Classic, ThemeVariation::Print) => [
            "#000000", "#333333", "#666666", "#999999", "#cccccc", "#ffffff",
        ],
        (ColorTheme::Classic, ThemeVariation::Display) => [
            "#1e3a8a", "#3b82f6", "#60a5fa", "#93c5fd", "#bfdbfe", "#dbeafe",
        ],
        (ColorTheme::Innovation, ThemeVariation::Colorful) => [
            "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3",
        ],
        (ColorTheme::Innovation, ThemeVariation::Monochromatic) => [
            "#e74c3c", "#c0392b", "#a93226", "#922b21", "#7b241c", "#641e16",
        ],
        (ColorTheme::Innovation, ThemeVariation::Dark) => [
            "#2c3e50", "#34495e", "#5d6d7e", "#85929e", "#aeb6bf", "#d5dbdb",
        ],
        (ColorTheme::Innovation, ThemeVariation::Light) => [
            "#ecf0f1", "#d5dbdb", "#bdc3c7", "#a4a4a4", "#8c8c8c", "#737373",
        ],
        (ColorTheme::Innovation, ThemeVariation::Print) => [
            "#000000", "#1a1a1a", "#333333", "#4d4d4d", "#666666", "#808080",
        ],
        (ColorTheme::Innovation, ThemeVariation::Display) => [
            "#3498db", "#5dade2", "#85c1e9", "#aed6f1", "#d6eaf8", "#ebf3fd",
        ],
    }
}

/// CSS color names accepted in user overrides.
const COLOR_NAMES: [(&str, &str); 24] = [
    ("red", "#ff0000"),
    ("blue", "#0000ff"),
    ("green", "#00ff00"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("lime", "#00ff00"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("olive", "#808000"),
    ("maroon", "#800000"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("violet", "#ee82ee"),
    ("indigo", "#4b0082"),
    ("turquoise", "#40e0d0"),
];

fn named_color(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    COLOR_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == lower)
        .map(|(_, hex)| *hex)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn to_hex(r: f32, g: f32, b: f32) -> String {
    let clamp = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// Picks black or white text for the given background, using perceptual
/// luminance with the 0.5 threshold. Color names resolve through the
/// override table; anything unparseable is treated as black.
pub fn contrast_text_color(background: &str) -> &'static str {
    let resolved = if background.starts_with('#') {
        background.to_string()
    } else {
        named_color(background).unwrap_or("#000000").to_string()
    };
    let (r, g, b) = parse_hex(&resolved).unwrap_or((0, 0, 0));
    let luminance = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0;
    if luminance > 0.5 { "#000000" } else { "#ffffff" }
}

fn rgb_to_hls(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let l = (minc + maxc) / 2.0;
    if (maxc - minc).abs() < f32::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = maxc - minc;
    let s = if l <= 0.5 {
        delta / (maxc + minc)
    } else {
        delta / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / delta;
    let gc = (maxc - g) / delta;
    let bc = (maxc - b) / delta;
    let h = if (r - maxc).abs() < f32::EPSILON {
        bc - gc
    } else if (g - maxc).abs() < f32::EPSILON {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_component(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn hls_to_rgb(h: f32, l: f32, s: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hls_component(m1, m2, h + 1.0 / 3.0),
        hls_component(m1, m2, h),
        hls_component(m1, m2, h - 1.0 / 3.0),
    )
}

/// Scales lightness and saturation of `base` by the importance multiplier.
pub fn importance_color(base: &str, importance: Importance) -> String {
    let resolved = if base.starts_with('#') {
        base.to_string()
    } else {
        named_color(base).unwrap_or("#000000").to_string()
    };
    let Some((r, g, b)) = parse_hex(&resolved) else {
        return resolved;
    };
    let (h, l, s) = rgb_to_hls(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let m = importance.multiplier();
    let (nr, ng, nb) = hls_to_rgb(h, l * m, s * m);
    to_hex(nr, ng, nb)
}

fn set(style: &mut StyleMap, key: &str, value: impl Into<StyleValue>) {
    style.insert(key.to_string(), value.into());
}

fn set_list(style: &mut StyleMap, key: &str, values: &[&str]) {
    style.insert(
        key.to_string(),
        StyleValue::List(values.iter().map(|value| value.to_string()).collect()),
    );
}

fn global_defaults() -> StyleMap {
    let mut style = StyleMap::new();
    set(&mut style, "fontFamily", "Inter, Segoe UI, sans-serif");
    set(&mut style, "background", "#ffffff");
    set(&mut style, "strokeWidth", 2.0);
    set(&mut style, "borderRadius", 4.0);
    set(&mut style, "watermarkColor", "#999999");
    set(&mut style, "watermarkOpacity", 0.35);
    set(&mut style, "watermarkFontSize", 12.0);
    style
}

fn diagram_defaults(kind: DiagramType) -> StyleMap {
    let mut style = StyleMap::new();
    match kind {
        DiagramType::BubbleMap => {
            set(&mut style, "topicColor", "#1976d2");
            set(&mut style, "topicTextColor", "#ffffff");
            set(&mut style, "topicFontSize", 18.0);
            set(&mut style, "charColor", "#e3f2fd");
            set(&mut style, "charTextColor", "#333333");
            set(&mut style, "charFontSize", 14.0);
            set(&mut style, "stroke", "#000000");
            set(&mut style, "strokeWidth", 3.0);
        }
        DiagramType::CircleMap => {
            set(&mut style, "topicColor", "#1976d2");
            set(&mut style, "topicTextColor", "#ffffff");
            set(&mut style, "topicFontSize", 18.0);
            set(&mut style, "contextColor", "#e3f2fd");
            set(&mut style, "contextTextColor", "#333333");
            set(&mut style, "contextFontSize", 14.0);
            set(&mut style, "boundaryColor", "#f5f5f5");
            set(&mut style, "stroke", "#000000");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::DoubleBubbleMap => {
            set(&mut style, "leftTopicColor", "#1976d2");
            set(&mut style, "rightTopicColor", "#1976d2");
            set(&mut style, "topicTextColor", "#ffffff");
            set(&mut style, "topicFontSize", 18.0);
            set(&mut style, "similarityColor", "#a7c7e7");
            set(&mut style, "similarityTextColor", "#2c3e50");
            set(&mut style, "similarityFontSize", 14.0);
            set(&mut style, "leftDiffColor", "#f4f6fb");
            set(&mut style, "rightDiffColor", "#f4f6fb");
            set(&mut style, "diffTextColor", "#2c3e50");
            set(&mut style, "diffFontSize", 13.0);
            set(&mut style, "stroke", "#000000");
            set(&mut style, "strokeWidth", 3.0);
        }
        DiagramType::BridgeMap => {
            set(&mut style, "lineColor", "#2c3e50");
            set(&mut style, "analogyTextColor", "#2c3e50");
            set(&mut style, "analogyFontSize", 14.0);
            set(&mut style, "relatingFontSize", 12.0);
            set(&mut style, "separatorColor", "#4e79a7");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::FlowMap => {
            set(&mut style, "titleFontSize", 18.0);
            set(&mut style, "titleColor", "#2c3e50");
            set(&mut style, "stepColor", "#a7c7e7");
            set(&mut style, "stepTextColor", "#2c3e50");
            set(&mut style, "stepFontSize", 14.0);
            set(&mut style, "substepColor", "#f4f6fb");
            set(&mut style, "substepTextColor", "#2c3e50");
            set(&mut style, "substepFontSize", 12.0);
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::MultiFlowMap => {
            set(&mut style, "eventColor", "#1976d2");
            set(&mut style, "eventTextColor", "#ffffff");
            set(&mut style, "eventFontSize", 16.0);
            set(&mut style, "causeColor", "#a7c7e7");
            set(&mut style, "causeTextColor", "#2c3e50");
            set(&mut style, "effectColor", "#a7c7e7");
            set(&mut style, "effectTextColor", "#2c3e50");
            set(&mut style, "nodeFontSize", 13.0);
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::TreeMap => {
            set(&mut style, "rootColor", "#4e79a7");
            set(&mut style, "rootTextColor", "#ffffff");
            set(&mut style, "rootFontSize", 18.0);
            set(&mut style, "branchColor", "#a7c7e7");
            set(&mut style, "branchTextColor", "#2c3e50");
            set(&mut style, "branchFontSize", 14.0);
            set(&mut style, "leafColor", "#f4f6fb");
            set(&mut style, "leafTextColor", "#2c3e50");
            set(&mut style, "leafFontSize", 12.0);
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 1.0);
        }
        DiagramType::BraceMap => {
            set(&mut style, "topicColor", "#ffd700");
            set(&mut style, "topicFontSize", 24.0);
            set(&mut style, "partColor", "#87cefa");
            set(&mut style, "partFontSize", 18.0);
            set(&mut style, "subpartColor", "#98fb98");
            set(&mut style, "subpartFontSize", 14.0);
            set(&mut style, "stroke", "#333333");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::Mindmap => {
            set(&mut style, "centralTopicColor", "#4e79a7");
            set(&mut style, "centralTopicTextColor", "#ffffff");
            set(&mut style, "centralTopicFontSize", 20.0);
            set(&mut style, "mainBranchColor", "#a7c7e7");
            set(&mut style, "mainBranchTextColor", "#2c3e50");
            set(&mut style, "mainBranchFontSize", 16.0);
            set(&mut style, "subBranchColor", "#f4f6fb");
            set(&mut style, "subBranchTextColor", "#2c3e50");
            set(&mut style, "subBranchFontSize", 14.0);
            set_list(
                &mut style,
                "branchColors",
                &[
                    "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
                    "#9c755f",
                ],
            );
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::ConceptMap => {
            set(&mut style, "topicColor", "#4e79a7");
            set(&mut style, "topicTextColor", "#ffffff");
            set(&mut style, "topicFontSize", 16.0);
            set(&mut style, "conceptColor", "#e3f2fd");
            set(&mut style, "conceptTextColor", "#2c3e50");
            set(&mut style, "conceptFontSize", 14.0);
            set(&mut style, "relationshipColor", "#a7c7e7");
            set(&mut style, "relationshipTextColor", "#2c3e50");
            set(&mut style, "relationshipFontSize", 12.0);
            set(&mut style, "stroke", "#35506b");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::VennDiagram => {
            set_list(
                &mut style,
                "setColors",
                &["#4e79a7", "#f28e2b", "#e15759", "#76b7b2"],
            );
            set(&mut style, "setOpacity", 0.55);
            set(&mut style, "setTextColor", "#2c3e50");
            set(&mut style, "setFontSize", 16.0);
            set(&mut style, "itemTextColor", "#2c3e50");
            set(&mut style, "itemFontSize", 12.0);
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 2.0);
        }
        DiagramType::Flowchart => {
            set(&mut style, "startEndColor", "#4caf50");
            set(&mut style, "startEndFontSize", 14.0);
            set(&mut style, "processColor", "#2196f3");
            set(&mut style, "processFontSize", 14.0);
            set(&mut style, "decisionColor", "#ff9800");
            set(&mut style, "decisionFontSize", 14.0);
            set(&mut style, "edgeFontSize", 12.0);
            set(&mut style, "stroke", "#2c3e50");
            set(&mut style, "strokeWidth", 2.0);
        }
    }
    style
}

/// Built-in style for a diagram type: global defaults overlaid with the
/// per-diagram schema, with text colors filled in for contrast.
pub fn default_style(kind: DiagramType) -> StyleMap {
    let mut style = global_defaults();
    style.extend(diagram_defaults(kind));
    fill_in_text_colors(&mut style);
    style
}

fn apply_palette(style: &mut StyleMap, kind: DiagramType, palette: Palette) {
    let [primary, secondary, tertiary, quaternary, ..] = palette;
    match kind {
        DiagramType::BubbleMap => {
            set(style, "topicColor", primary);
            set(style, "charColor", secondary);
        }
        DiagramType::CircleMap => {
            set(style, "topicColor", primary);
            set(style, "contextColor", secondary);
        }
        DiagramType::DoubleBubbleMap => {
            set(style, "leftTopicColor", primary);
            set(style, "rightTopicColor", primary);
            set(style, "similarityColor", secondary);
            set(style, "leftDiffColor", tertiary);
            set(style, "rightDiffColor", tertiary);
        }
        DiagramType::BridgeMap => {
            set(style, "lineColor", primary);
            set(style, "separatorColor", secondary);
        }
        DiagramType::FlowMap => {
            set(style, "stepColor", primary);
            set(style, "substepColor", secondary);
        }
        DiagramType::MultiFlowMap => {
            set(style, "eventColor", primary);
            set(style, "causeColor", secondary);
            set(style, "effectColor", tertiary);
        }
        DiagramType::TreeMap => {
            set(style, "rootColor", primary);
            set(style, "branchColor", secondary);
            set(style, "leafColor", tertiary);
        }
        DiagramType::BraceMap => {
            set(style, "topicColor", primary);
            set(style, "partColor", secondary);
            set(style, "subpartColor", tertiary);
        }
        DiagramType::Mindmap => {
            set(style, "centralTopicColor", primary);
            set(style, "mainBranchColor", secondary);
            set(style, "subBranchColor", tertiary);
        }
        DiagramType::ConceptMap => {
            set(style, "topicColor", primary);
            set(style, "conceptColor", secondary);
            set(style, "relationshipColor", tertiary);
        }
        DiagramType::VennDiagram => {
            set_list(style, "setColors", &[primary, secondary, tertiary, quaternary]);
        }
        DiagramType::Flowchart => {
            set(style, "startEndColor", primary);
            set(style, "processColor", secondary);
            set(style, "decisionColor", tertiary);
        }
    }
}

/// Converts CSS color names in override values to hex before merging. Only
/// keys that name a color are translated.
fn translate_override(key: &str, value: &StyleValue) -> StyleValue {
    if let StyleValue::Text(text) = value
        && key.contains("Color")
        && !text.starts_with('#')
        && let Some(hex) = named_color(text)
    {
        return StyleValue::Text(hex.to_string());
    }
    value.clone()
}

/// For every color key without an explicit paired text color, fills in the
/// contrast-derived one. Stroke and watermark keys are not backgrounds.
fn fill_in_text_colors(style: &mut StyleMap) {
    let mut additions = Vec::new();
    for (key, value) in style.iter() {
        let StyleValue::Text(background) = value else {
            continue;
        };
        if !key.contains("Color")
            || key.contains("Text")
            || key.contains("Stroke")
            || key.starts_with("watermark")
        {
            continue;
        }
        let text_key = key.replace("Color", "TextColor");
        if !style.contains_key(&text_key) {
            additions.push((text_key, contrast_text_color(background).to_string()));
        }
    }
    for (key, value) in additions {
        style.insert(key, StyleValue::Text(value));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StyleRequest<'a> {
    pub color_theme: Option<ColorTheme>,
    pub variation: ThemeVariation,
    pub importance: Option<Importance>,
    pub overrides: Option<&'a StyleMap>,
}

/// Resolves the effective style for one diagram: global defaults, then
/// per-diagram defaults, then the palette selection, then user overrides,
/// then importance intensity, and finally contrast fill-in.
pub fn resolve_style(kind: DiagramType, request: &StyleRequest) -> StyleMap {
    let mut style = global_defaults();
    style.extend(diagram_defaults(kind));

    if let Some(theme) = request.color_theme {
        apply_palette(&mut style, kind, palette_for(theme, request.variation));
    }

    if let Some(overrides) = request.overrides {
        for (key, value) in overrides {
            style.insert(key.clone(), translate_override(key, value));
        }
    }

    if let Some(importance) = request.importance {
        for key in ["topicColor", "centralTopicColor"] {
            if let Some(StyleValue::Text(base)) = style.get(key) {
                let adjusted = importance_color(base, importance);
                style.insert(key.to_string(), StyleValue::Text(adjusted));
            }
        }
    }

    fill_in_text_colors(&mut style);
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_returns_builtin_defaults() {
        for kind in DiagramType::ALL {
            let resolved = resolve_style(kind, &StyleRequest::default());
            assert_eq!(resolved, default_style(kind), "defaults differ for {kind}");
        }
    }

    #[test]
    fn contrast_flips_at_half_luminance() {
        assert_eq!(contrast_text_color("#ffffff"), "#000000");
        assert_eq!(contrast_text_color("#000000"), "#ffffff");
        // 0x81 gray sits just above the threshold, 0x7f just below.
        assert_eq!(contrast_text_color("#818181"), "#000000");
        assert_eq!(contrast_text_color("#7f7f7f"), "#ffffff");
        assert_eq!(contrast_text_color("navy"), "#ffffff");
    }

    #[test]
    fn user_override_color_names_translate_to_hex() {
        let mut overrides = StyleMap::new();
        overrides.insert("topicColor".to_string(), StyleValue::Text("gold".into()));
        let request = StyleRequest {
            overrides: Some(&overrides),
            ..Default::default()
        };
        let style = resolve_style(DiagramType::BubbleMap, &request);
        assert_eq!(color(&style, "topicColor", ""), "#ffd700");
        // The paired text color from the defaults is kept as-is.
        assert_eq!(color(&style, "topicTextColor", ""), "#ffffff");
    }

    #[test]
    fn palette_selection_maps_primary_to_topic() {
        let request = StyleRequest {
            color_theme: Some(ColorTheme::Classic),
            ..Default::default()
        };
        let style = resolve_style(DiagramType::Mindmap, &request);
        assert_eq!(color(&style, "centralTopicColor", ""), "#4e79a7");
        assert_eq!(color(&style, "mainBranchColor", ""), "#f28e2b");
    }

    #[test]
    fn override_without_paired_text_color_gets_contrast_fill_in() {
        let mut overrides = StyleMap::new();
        overrides.insert("bannerColor".to_string(), StyleValue::Text("#1a1a1a".into()));
        let request = StyleRequest {
            overrides: Some(&overrides),
            ..Default::default()
        };
        let style = resolve_style(DiagramType::TreeMap, &request);
        assert_eq!(color(&style, "bannerTextColor", ""), "#ffffff");
    }

    #[test]
    fn importance_scales_lightness() {
        let full = importance_color("#4e79a7", Importance::Center);
        let dimmed = importance_color("#4e79a7", Importance::Detail);
        assert_eq!(full, "#4e79a7");
        assert_ne!(dimmed, full);
        let (r, g, b) = parse_hex(&dimmed).unwrap();
        let (fr, fg, fb) = parse_hex(&full).unwrap();
        assert!(r <= fr && g <= fg && b <= fb, "detail should be darker");
    }

    #[test]
    fn hls_round_trip_is_stable() {
        for hex in ["#4e79a7", "#ffd700", "#1a1a1a", "#e3f2fd"] {
            let (r, g, b) = parse_hex(hex).unwrap();
            let (h, l, s) = rgb_to_hls(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            let (nr, ng, nb) = hls_to_rgb(h, l, s);
            assert_eq!(to_hex(nr, ng, nb), hex);
        }
    }
}
