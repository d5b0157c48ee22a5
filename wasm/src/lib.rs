use std::str::FromStr;

use mindgraph_renderer::layout::Dimensions;
use mindgraph_renderer::theme::{ColorTheme, ThemeVariation};
use mindgraph_renderer::{ErrorMode, RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindGraphRenderOptions {
    diagram_type: Option<String>,
    color_theme: Option<String>,
    variation: Option<String>,
    watermark: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    strict: Option<bool>,
}

fn build_render_options(options: MindGraphRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = RenderOptions::default();

    render_options.type_override = options.diagram_type;
    if let Some(raw) = options.color_theme {
        render_options.color_theme = Some(ColorTheme::from_str(&raw)?);
    }
    if let Some(raw) = options.variation {
        render_options.variation = ThemeVariation::from_str(&raw)?;
    }
    if let Some(watermark) = options.watermark {
        render_options.watermark = watermark;
    }
    if options.width.is_some() || options.height.is_some() || options.padding.is_some() {
        let mut dims = Dimensions::default();
        if let Some(width) = options.width {
            dims.base_width = width;
        }
        if let Some(height) = options.height {
            dims.base_height = height;
        }
        if let Some(padding) = options.padding {
            dims.padding = padding;
        }
        render_options.dimensions = Some(dims);
    }
    if options.strict == Some(true) {
        render_options.error_mode = ErrorMode::Strict;
    }

    Ok(render_options)
}

#[wasm_bindgen]
pub fn render_mindgraph_svg(spec: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<MindGraphRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        MindGraphRenderOptions::default()
    };

    let render_options =
        build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    render_with_options(spec, &render_options)
        .map(|artifact| artifact.svg)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use mindgraph_renderer::render_with_options;

    use crate::{MindGraphRenderOptions, build_render_options};

    #[test]
    fn renders_bubble_map_from_camel_case_options() {
        let options: MindGraphRenderOptions = serde_json::from_str(
            r#"{"diagramType": "bubble_map", "colorTheme": "innovation",
                "variation": "dark", "watermark": ""}"#,
        )
        .expect("options should parse");
        let render_options = build_render_options(options).expect("options should resolve");

        let spec = r#"{"topic": "Oceans", "attributes": ["deep", "salty", "vast"]}"#;
        let artifact =
            render_with_options(spec, &render_options).expect("bubble map should render");

        assert!(artifact.svg.contains("<svg"));
        assert!(artifact.svg.contains("Oceans"));
        assert!(!artifact.svg.contains("MindGraph"));
    }

    #[test]
    fn rejects_unknown_color_theme() {
        let options = MindGraphRenderOptions {
            color_theme: Some("neon".to_string()),
            ..MindGraphRenderOptions::default()
        };
        assert!(build_render_options(options).is_err());
    }
}
