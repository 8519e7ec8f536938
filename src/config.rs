use crate::layout::FontSpec;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

pub const DEFAULT_ELLIPSIS: &str = "\u{2026}";
/// Upper bound for `PlacementConfig::angular_steps` (a full turn at 5° steps).
pub const MAX_ANGULAR_STEPS: usize = 36;
/// Upper bound for `PlacementConfig::radius_steps`.
pub const MAX_RADIUS_STEPS: usize = 16;

/// How font sizes relate across labels laid out together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizingPolicy {
    /// Each label gets the largest size that fits its own region.
    #[default]
    PerLabel,
    /// Every label uses the smallest of the per-label sizes.
    Uniform,
}

/// Candidate positions for labels in box-shaped regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxAnchor {
    Start,
    End,
    Center,
    Above,
    Below,
}

impl BoxAnchor {
    pub fn is_inside(self) -> bool {
        matches!(self, BoxAnchor::Start | BoxAnchor::End | BoxAnchor::Center)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Angular offsets tried on each side of the preferred angle.
    pub angular_steps: usize,
    pub angular_step_deg: f32,
    /// Radii sampled across the band, in addition to the preferred radius.
    pub radius_steps: usize,
    /// Cost of a full preferred-radius of radial drift, in radians. The
    /// default makes a rotation of a few steps cheaper than leaving the
    /// preferred radius.
    pub radius_weight: f32,
    pub obstacle_padding: f32,
    pub box_order: Vec<BoxAnchor>,
    pub box_gap: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            angular_steps: 5,
            angular_step_deg: 10.0,
            radius_steps: 3,
            radius_weight: PI,
            obstacle_padding: 0.0,
            box_order: vec![
                BoxAnchor::Start,
                BoxAnchor::End,
                BoxAnchor::Center,
                BoxAnchor::Above,
                BoxAnchor::Below,
            ],
            box_gap: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastConfig {
    pub threshold: f32,
    pub midpoint: f32,
    pub dark_color: String,
    pub light_color: String,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            midpoint: 128.0,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
        }
    }
}

/// Fully resolved label style. Every engine call takes one of these; the
/// engine has no defaults of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub font: FontSpec,
    pub min_font_size: f32,
    pub ellipsis: String,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    pub max_lines: usize,
    /// Inset applied to the region's width budget on each side.
    pub padding: f32,
    pub text_color: String,
    pub background: String,
    pub sizing: SizingPolicy,
    pub placement: PlacementConfig,
    pub contrast: ContrastConfig,
}

impl StyleConfig {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            font: FontSpec::new(theme.font_family.clone(), theme.font_size, theme.font_weight),
            min_font_size: (theme.font_size * 0.5).max(6.0).min(theme.font_size),
            text_color: theme.text_color.clone(),
            background: theme.background.clone(),
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            font: FontSpec::default(),
            min_font_size: 8.0,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            line_height: 1.2,
            max_lines: 1,
            padding: 2.0,
            text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            sizing: SizingPolicy::PerLabel,
            placement: PlacementConfig::default(),
            contrast: ContrastConfig::default(),
        }
    }

    /// Space left for text inside a region of the given width.
    pub fn width_budget(&self, region_width: f32) -> f32 {
        (region_width - self.padding.max(0.0) * 2.0).max(0.0)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_theme(&Theme::mermaid_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<u16>,
    text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementConfigFile {
    angular_steps: Option<usize>,
    angular_step_deg: Option<f32>,
    radius_steps: Option<usize>,
    radius_weight: Option<f32>,
    obstacle_padding: Option<f32>,
    box_order: Option<Vec<BoxAnchor>>,
    box_gap: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContrastConfigFile {
    threshold: Option<f32>,
    midpoint: Option<f32>,
    dark_color: Option<String>,
    light_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    min_font_size: Option<f32>,
    ellipsis: Option<String>,
    line_height: Option<f32>,
    max_lines: Option<usize>,
    padding: Option<f32>,
    sizing: Option<SizingPolicy>,
    placement: Option<PlacementConfigFile>,
    contrast: Option<ContrastConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    label: Option<LabelConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<StyleConfig> {
    let Some(path) = path else {
        return Ok(StyleConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config_str(&contents)
}

/// Resolve a JSON/JSON5 config document on top of the defaults.
pub fn parse_config_str(contents: &str) -> anyhow::Result<StyleConfig> {
    let parsed: ConfigFile = json5::from_str(contents)?;

    let mut theme = Theme::mermaid_default();
    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(named) => theme = named,
            None => tracing::debug!(theme_name, "unknown theme name, keeping default"),
        }
    }
    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.font_weight {
            theme.font_weight = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
    }

    let mut config = StyleConfig::from_theme(&theme);
    let Some(label) = parsed.label else {
        return Ok(config);
    };
    if let Some(v) = label.min_font_size {
        config.min_font_size = v;
    }
    if let Some(v) = label.ellipsis {
        config.ellipsis = v;
    }
    if let Some(v) = label.line_height {
        config.line_height = v;
    }
    if let Some(v) = label.max_lines {
        config.max_lines = v.max(1);
    }
    if let Some(v) = label.padding {
        config.padding = v;
    }
    if let Some(v) = label.sizing {
        config.sizing = v;
    }
    if let Some(p) = label.placement {
        let placement = &mut config.placement;
        if let Some(v) = p.angular_steps {
            placement.angular_steps = v.min(MAX_ANGULAR_STEPS);
        }
        if let Some(v) = p.angular_step_deg {
            placement.angular_step_deg = v;
        }
        if let Some(v) = p.radius_steps {
            placement.radius_steps = v.min(MAX_RADIUS_STEPS);
        }
        if let Some(v) = p.radius_weight {
            placement.radius_weight = v;
        }
        if let Some(v) = p.obstacle_padding {
            placement.obstacle_padding = v;
        }
        if let Some(v) = p.box_order
            && !v.is_empty()
        {
            placement.box_order = v;
        }
        if let Some(v) = p.box_gap {
            placement.box_gap = v;
        }
    }
    if let Some(c) = label.contrast {
        let contrast = &mut config.contrast;
        if let Some(v) = c.threshold {
            contrast.threshold = v;
        }
        if let Some(v) = c.midpoint {
            contrast.midpoint = v;
        }
        if let Some(v) = c.dark_color {
            contrast.dark_color = v;
        }
        if let Some(v) = c.light_color {
            contrast.light_color = v;
        }
    }
    Ok(config)
}
