use crate::spec::DiagramType;

/// Measured, possibly wrapped label text.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    RoundedRect,
    Stadium,
    Ellipse,
    Circle,
    Diamond,
}

/// Fill/stroke/text styling resolved for one node.
#[derive(Debug, Clone)]
pub struct Paint {
    pub fill: String,
    pub text_color: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub font_size: f32,
    pub bold: bool,
    pub opacity: f32,
}

impl Paint {
    pub fn new(fill: impl Into<String>, text_color: impl Into<String>) -> Self {
        Paint {
            fill: fill.into(),
            text_color: text_color.into(),
            stroke: "#2c3e50".to_string(),
            stroke_width: 2.0,
            font_size: 14.0,
            bold: false,
            opacity: 1.0,
        }
    }

    pub fn stroke(mut self, stroke: impl Into<String>, width: f32) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = width;
        self
    }

    pub fn font(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// One placed shape. `x`/`y` are the shape center; `width`/`height` the
/// full extent (diameter for circles).
#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub shape: NodeShape,
    pub label: TextBlock,
    pub paint: Paint,
}

impl NodeLayout {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// A connector. Straight polyline through `points`, or a quadratic curve
/// when `control` is set (then `points` holds start and end only).
#[derive(Debug, Clone)]
pub struct EdgeLayout {
    pub points: Vec<(f32, f32)>,
    pub control: Option<(f32, f32)>,
    pub arrow_end: bool,
    pub label: Option<TextBlock>,
    pub label_anchor: Option<(f32, f32)>,
    pub stroke: String,
    pub stroke_width: f32,
    pub font_size: f32,
    pub text_color: String,
}

impl EdgeLayout {
    pub fn line(from: (f32, f32), to: (f32, f32), stroke: impl Into<String>, width: f32) -> Self {
        EdgeLayout {
            points: vec![from, to],
            control: None,
            arrow_end: false,
            label: None,
            label_anchor: None,
            stroke: stroke.into(),
            stroke_width: width,
            font_size: 12.0,
            text_color: "#2c3e50".to_string(),
        }
    }

    pub fn arrow(from: (f32, f32), to: (f32, f32), stroke: impl Into<String>, width: f32) -> Self {
        let mut edge = EdgeLayout::line(from, to, stroke, width);
        edge.arrow_end = true;
        edge
    }
}

/// Raw SVG path fragment (braces, bridge separators, error card frames).
#[derive(Debug, Clone)]
pub struct PathLayout {
    pub d: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Free-standing text (titles, bridge analogies, venn items).
#[derive(Debug, Clone)]
pub struct LabelLayout {
    pub x: f32,
    pub y: f32,
    pub text: TextBlock,
    pub font_size: f32,
    pub color: String,
    pub bold: bool,
    pub anchor: TextAnchor,
    pub opacity: f32,
}

impl LabelLayout {
    pub fn new(x: f32, y: f32, text: TextBlock, font_size: f32, color: impl Into<String>) -> Self {
        LabelLayout {
            x,
            y,
            text,
            font_size,
            color: color.into(),
            bold: false,
            anchor: TextAnchor::Middle,
            opacity: 1.0,
        }
    }
}

/// Finished geometry for one diagram, ready for SVG emission.
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: DiagramType,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub paths: Vec<PathLayout>,
    pub labels: Vec<LabelLayout>,
    /// Set when the layout is an inline error card instead of a diagram.
    pub error: Option<String>,
}

impl Layout {
    pub fn new(kind: DiagramType, width: f32, height: f32) -> Self {
        Layout {
            kind,
            width,
            height,
            nodes: Vec::new(),
            edges: Vec::new(),
            paths: Vec::new(),
            labels: Vec::new(),
            error: None,
        }
    }
}
