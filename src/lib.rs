//! SVG renderer for MindGraph thinking maps: bubble, circle, double
//! bubble, bridge, flow, multi-flow, tree, brace, mindmap, concept map,
//! venn and flowchart diagrams rendered from JSON specs.

pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod live;
pub mod registry;
pub mod render;
pub mod session;
pub mod spec;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub use cli::run;

use serde_json::Value;

use crate::config::DEFAULT_WATERMARK;
use crate::layout::{Dimensions, compute_error_layout, compute_layout};
use crate::registry::RendererRegistry;
use crate::render::render_svg;
use crate::spec::{DiagramType, SpecError, parse_spec, resolve_type};
use crate::theme::{ColorTheme, StyleMap, StyleRequest, ThemeVariation, default_style};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("invalid spec document: {0}")]
    Document(String),
}

/// What to do when the spec fails validation: draw an error card into the
/// SVG, or return a hard error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    #[default]
    Inline,
    Strict,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub type_override: Option<String>,
    pub color_theme: Option<ColorTheme>,
    pub variation: ThemeVariation,
    pub overrides: Option<StyleMap>,
    pub dimensions: Option<Dimensions>,
    pub watermark: String,
    pub error_mode: ErrorMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            type_override: None,
            color_theme: None,
            variation: ThemeVariation::default(),
            overrides: None,
            dimensions: None,
            watermark: DEFAULT_WATERMARK.to_string(),
            error_mode: ErrorMode::default(),
        }
    }
}

/// A finished render: the SVG document plus its final canvas size and the
/// diagram type that was drawn.
#[derive(Debug, Clone)]
pub struct RenderArtifact {
    pub svg: String,
    pub width: f32,
    pub height: f32,
    pub kind: DiagramType,
}

/// Renders a diagram from its type name and JSON spec value. Unknown type
/// names are an error; an invalid spec renders as an inline error card.
pub fn render_graph(
    diagram_type: &str,
    spec_value: &Value,
    theme: Option<&StyleMap>,
    dimensions: Option<Dimensions>,
) -> Result<String, RenderError> {
    let kind = DiagramType::parse(diagram_type)?;
    let style = theme::resolve_style(
        kind,
        &StyleRequest {
            overrides: theme,
            ..StyleRequest::default()
        },
    );
    RendererRegistry::global().get_for_kind(kind);

    let layout = match parse_spec(kind, spec_value) {
        Ok(spec) => compute_layout(&spec, &style, dimensions),
        Err(err) => compute_error_layout(
            kind,
            &err.to_string(),
            &style,
            &dimensions.unwrap_or_else(|| Dimensions::for_kind(kind)),
        ),
    };
    Ok(render_svg(&layout, &style, DEFAULT_WATERMARK))
}

/// Renders from raw spec source (JSON, or JSON5 for hand-written specs).
/// The type override in `options` wins over the document's `type` field.
pub fn render_with_options(
    source: &str,
    options: &RenderOptions,
) -> Result<RenderArtifact, RenderError> {
    let value: Value = match serde_json::from_str(source) {
        Ok(value) => value,
        Err(_) => match json5::from_str(source) {
            Ok(value) => value,
            Err(err) => {
                return fail(
                    options,
                    DiagramType::Mindmap,
                    RenderError::Document(err.to_string()),
                );
            }
        },
    };

    let kind = match resolve_type(options.type_override.as_deref(), &value) {
        Ok(kind) => kind,
        Err(err) => return fail(options, DiagramType::Mindmap, err.into()),
    };
    RendererRegistry::global().get_for_kind(kind);

    let style = theme::resolve_style(
        kind,
        &StyleRequest {
            color_theme: options.color_theme,
            variation: options.variation,
            importance: None,
            overrides: options.overrides.as_ref(),
        },
    );

    let spec = match parse_spec(kind, &value) {
        Ok(spec) => spec,
        Err(err) => return fail(options, kind, err.into()),
    };

    let layout = compute_layout(&spec, &style, options.dimensions);
    Ok(RenderArtifact {
        svg: render_svg(&layout, &style, &options.watermark),
        width: layout.width,
        height: layout.height,
        kind,
    })
}

/// Strict mode propagates the error; inline mode renders it as a card.
fn fail(
    options: &RenderOptions,
    kind: DiagramType,
    err: RenderError,
) -> Result<RenderArtifact, RenderError> {
    if options.error_mode == ErrorMode::Strict {
        return Err(err);
    }
    let style = default_style(kind);
    let dims = options
        .dimensions
        .unwrap_or_else(|| Dimensions::for_kind(kind));
    let layout = compute_error_layout(kind, &err.to_string(), &style, &dims);
    Ok(RenderArtifact {
        svg: render_svg(&layout, &style, &options.watermark),
        width: layout.width,
        height: layout.height,
        kind,
    })
}
