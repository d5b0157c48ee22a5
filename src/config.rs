use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::layout::Dimensions;
use crate::theme::{ColorTheme, StyleMap, ThemeVariation};

pub const DEFAULT_WATERMARK: &str = "MindGraph";

/// Resolved renderer configuration: theme selection, canvas dimensions,
/// watermark text and the error mode. `color_theme` stays `None` unless a
/// config file or flag picks a palette, so renders keep the per-diagram
/// built-in defaults otherwise.
#[derive(Debug, Clone)]
pub struct Config {
    pub color_theme: Option<ColorTheme>,
    pub variation: ThemeVariation,
    pub dimensions: Option<Dimensions>,
    pub watermark: String,
    pub strict_errors: bool,
    /// Free-form style overrides merged on top of the resolved theme.
    pub theme: StyleMap,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            color_theme: None,
            variation: ThemeVariation::Colorful,
            dimensions: None,
            watermark: DEFAULT_WATERMARK.to_string(),
            strict_errors: false,
            theme: StyleMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    color_theme: Option<ColorTheme>,
    variation: Option<ThemeVariation>,
    dimensions: Option<Dimensions>,
    watermark: Option<String>,
    strict_errors: Option<bool>,
    theme: Option<StyleMap>,
}

/// Loads configuration from an optional JSON/JSON5 file, then applies
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(path) = path {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let parsed: ConfigFile = match serde_json::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(_) => json5::from_str(&contents)
                .with_context(|| format!("parsing config {}", path.display()))?,
        };
        if parsed.color_theme.is_some() {
            config.color_theme = parsed.color_theme;
        }
        if let Some(variation) = parsed.variation {
            config.variation = variation;
        }
        if let Some(dimensions) = parsed.dimensions {
            config.dimensions = Some(dimensions);
        }
        if let Some(watermark) = parsed.watermark {
            config.watermark = watermark;
        }
        if let Some(strict) = parsed.strict_errors {
            config.strict_errors = strict;
        }
        if let Some(theme) = parsed.theme {
            config.theme = theme;
        }
    }

    apply_env_overrides(&mut config);
    Ok(config)
}

fn env_dimension(var: &str) -> Option<f32> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => {
            eprintln!("warning: ignoring invalid {var}={raw}");
            None
        }
    }
}

fn apply_env_overrides(config: &mut Config) {
    let mut dims = config.dimensions.unwrap_or_default();
    let mut touched = false;
    if let Some(value) = env_dimension("MG_BASE_WIDTH") {
        dims.base_width = value;
        touched = true;
    }
    if let Some(value) = env_dimension("MG_BASE_HEIGHT") {
        dims.base_height = value;
        touched = true;
    }
    if let Some(value) = env_dimension("MG_PADDING") {
        dims.padding = value;
        touched = true;
    }
    if touched {
        config.dimensions = Some(dims);
    }

    if let Ok(text) = std::env::var("MG_WATERMARK_TEXT") {
        config.watermark = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("mgdr-config-{name}-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.watermark, DEFAULT_WATERMARK);
        assert!(!config.strict_errors);
        // No palette unless one is asked for.
        assert_eq!(config.color_theme, None);
    }

    #[test]
    fn json_file_overrides_defaults() {
        let path = write_temp(
            "json",
            r#"{"colorTheme": "innovation", "variation": "dark",
                "dimensions": {"baseWidth": 1024, "baseHeight": 768, "padding": 50},
                "watermark": "", "strictErrors": true}"#,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.color_theme, Some(ColorTheme::Innovation));
        assert_eq!(config.variation, ThemeVariation::Dark);
        assert_eq!(config.dimensions.unwrap().base_width, 1024.0);
        assert!(config.watermark.is_empty());
        assert!(config.strict_errors);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json5_with_comments_parses() {
        let path = write_temp(
            "json5",
            "{\n  // site default\n  watermark: 'Classroom',\n}",
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.watermark, "Classroom");
        let _ = std::fs::remove_file(&path);
    }
}
