use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default figure size in inches, `(width, height)`.
pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (6.4, 4.8);
pub const DEFAULT_DPI: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure size in inches used when the renderer creates its own canvas.
    /// The smaller side becomes the side of the square canvas.
    pub figure_size: (f64, f64),
    pub dpi: f64,
}

impl RenderConfig {
    pub fn square_side(&self) -> f64 {
        self.figure_size.0.min(self.figure_size.1)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_size: DEFAULT_FIGURE_SIZE,
            dpi: DEFAULT_DPI,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    figure_size: Option<[f64; 2]>,
    dpi: Option<f64>,
    theme: Option<String>,
    background: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) -> anyhow::Result<()> {
    if let Some(name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme `{name}`"))?;
    }
    if let Some([width, height]) = parsed.figure_size {
        if !(width > 0.0 && height > 0.0) {
            return Err(anyhow::anyhow!("figureSize must be positive, got [{width}, {height}]"));
        }
        config.render.figure_size = (width, height);
    }
    if let Some(dpi) = parsed.dpi {
        if !(dpi > 0.0) {
            return Err(anyhow::anyhow!("dpi must be positive, got {dpi}"));
        }
        config.render.dpi = dpi;
    }
    if let Some(v) = parsed.background {
        config.theme.background = v;
    }
    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(v) = parsed.text_color {
        config.theme.text_color = v;
    }
    Ok(())
}
