use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::load_config;
use crate::layout_dump::write_layout_dump;
use crate::layout::compute_layout;
use crate::render::write_output_svg;
use crate::spec::{DiagramType, parse_spec, resolve_type};
use crate::theme::{ColorTheme, StyleRequest, ThemeVariation, resolve_style};
use crate::{ErrorMode, RenderOptions, render_with_options};

#[derive(Parser, Debug)]
#[command(name = "mgdr", version, about = "MindGraph diagram renderer")]
pub struct Args {
    /// Input spec file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Diagram type; wins over the spec's own "type" field
    #[arg(short = 't', long = "type")]
    pub diagram_type: Option<String>,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Color theme (classic, innovation)
    #[arg(long = "color-theme", value_parser = ColorTheme::from_str)]
    pub color_theme: Option<ColorTheme>,

    /// Theme variation (colorful, monochromatic, dark, light, print, display)
    #[arg(long = "variation", value_parser = ThemeVariation::from_str)]
    pub variation: Option<ThemeVariation>,

    /// Output file. Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "svg")]
    pub format: OutputFormat,

    /// Base canvas width
    #[arg(long = "width")]
    pub width: Option<f32>,

    /// Base canvas height
    #[arg(long = "height")]
    pub height: Option<f32>,

    /// Canvas padding
    #[arg(long = "padding")]
    pub padding: Option<f32>,

    /// Watermark text; pass an empty string to disable
    #[arg(long = "watermark")]
    pub watermark: Option<String>,

    /// Write the computed layout as JSON to this path instead of rendering
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// List supported diagram types and exit
    #[arg(long = "list-types")]
    pub list_types: bool,

    /// Fail on invalid specs instead of rendering an inline error card
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    if args.list_types {
        for kind in DiagramType::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;

    let mut dimensions = config.dimensions;
    if args.width.is_some() || args.height.is_some() || args.padding.is_some() {
        let mut dims = dimensions.unwrap_or_default();
        if let Some(width) = args.width {
            dims.base_width = width;
        }
        if let Some(height) = args.height {
            dims.base_height = height;
        }
        if let Some(padding) = args.padding {
            dims.padding = padding;
        }
        dimensions = Some(dims);
    }

    let options = RenderOptions {
        type_override: args.diagram_type.clone(),
        color_theme: args.color_theme.or(config.color_theme),
        variation: args.variation.unwrap_or(config.variation),
        overrides: if config.theme.is_empty() {
            None
        } else {
            Some(config.theme.clone())
        },
        dimensions,
        watermark: args.watermark.clone().unwrap_or(config.watermark),
        error_mode: if args.strict || config.strict_errors {
            ErrorMode::Strict
        } else {
            ErrorMode::Inline
        },
    };

    let input = read_input(args.input.as_deref())?;

    if let Some(dump_path) = &args.dump_layout {
        return dump_layout(&input, &options, dump_path);
    }

    // A top-level JSON array renders one file per element.
    let documents = split_documents(&input);
    if documents.len() == 1 {
        let artifact = render_with_options(&documents[0], &options)?;
        return write_artifact(&artifact.svg, args.output.as_deref(), args.format);
    }

    let outputs = resolve_multi_outputs(args.output.as_deref(), args.format, documents.len())?;
    for (document, output) in documents.iter().zip(&outputs) {
        let artifact = render_with_options(document, &options)?;
        write_artifact(&artifact.svg, Some(output), args.format)?;
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Splits a top-level JSON array into one source string per element;
/// anything else stays a single document.
fn split_documents(input: &str) -> Vec<String> {
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(input) {
        return items
            .iter()
            .map(|item| item.to_string())
            .collect();
    }
    vec![input.to_string()]
}

/// Layout dumps always run strict; an error card layout is not useful
/// for debugging geometry.
fn dump_layout(input: &str, options: &RenderOptions, path: &Path) -> Result<()> {
    let value: serde_json::Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(_) => json5::from_str(input)?,
    };
    let kind = resolve_type(options.type_override.as_deref(), &value)?;
    let spec = parse_spec(kind, &value)?;
    let style = resolve_style(
        kind,
        &StyleRequest {
            color_theme: options.color_theme,
            variation: options.variation,
            importance: None,
            overrides: options.overrides.as_ref(),
        },
    );
    let layout = compute_layout(&spec, &style, options.dimensions);
    write_layout_dump(path, &layout)?;
    Ok(())
}

fn write_artifact(svg: &str, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Svg => write_output_svg(svg, output),
        OutputFormat::Png => {
            let output = output
                .ok_or_else(|| anyhow::anyhow!("output path required for png output"))?;
            write_png(svg, output)
        }
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path) -> Result<()> {
    crate::render::write_output_png(svg, output)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path) -> Result<()> {
    Err(anyhow::anyhow!(
        "png output requires building with the `png` feature"
    ))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
    };
    let base =
        output.ok_or_else(|| anyhow::anyhow!("output path required for multi-spec input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("diagram-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}
