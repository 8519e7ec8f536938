use crate::config::{ContrastConfig, StyleConfig};
use crate::error::ColorError;
use crate::layout::LabelResult;
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex color regex")
});
static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[0-9.]+\s*)?\)$")
        .expect("rgb color regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            _ => {}
        }
        if let Some(caps) = HEX_RE.captures(trimmed) {
            let digits = &caps[1];
            let channel = |s: &str| {
                u8::from_str_radix(s, 16).map_err(|_| ColorError::Unrecognized(input.to_string()))
            };
            if digits.len() == 3 {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                return Ok(Self::new(expand(0)?, expand(1)?, expand(2)?));
            }
            // alpha, if present, is ignored
            return Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ));
        }
        if let Some(caps) = RGB_RE.captures(trimmed) {
            let channel = |i: usize| {
                caps[i]
                    .parse::<u16>()
                    .ok()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| ColorError::OutOfRange(input.to_string()))
            };
            return Ok(Self::new(channel(1)?, channel(2)?, channel(3)?));
        }
        Err(ColorError::Unrecognized(input.to_string()))
    }

    /// Perceived brightness on a 0–255 scale.
    pub fn brightness(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

/// Which text color to use over `background`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColorChoice {
    Configured,
    Dark,
    Light,
}

pub fn pick_text_color(background: Rgb, configured: Rgb, cfg: &ContrastConfig) -> TextColorChoice {
    let bg = background.brightness();
    if (configured.brightness() - bg).abs() > cfg.threshold {
        TextColorChoice::Configured
    } else if bg > cfg.midpoint {
        TextColorChoice::Dark
    } else {
        TextColorChoice::Light
    }
}

/// String-level form of [`pick_text_color`]. Unparseable colors keep the
/// configured color.
pub fn contrast_text_color(background: &str, configured: &str, cfg: &ContrastConfig) -> String {
    let (bg, fg) = match (Rgb::parse(background), Rgb::parse(configured)) {
        (Ok(bg), Ok(fg)) => (bg, fg),
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!(%err, "cannot compare colors, keeping configured text color");
            return configured.to_string();
        }
    };
    match pick_text_color(bg, fg, cfg) {
        TextColorChoice::Configured => configured.to_string(),
        TextColorChoice::Dark => cfg.dark_color.clone(),
        TextColorChoice::Light => cfg.light_color.clone(),
    }
}

/// Text color for a placed label: contrasted against `region_fill` when the
/// label sits inside its region, against the chart background otherwise.
pub fn label_text_color(result: &LabelResult, region_fill: &str, style: &StyleConfig) -> String {
    let background = if result.inside_region {
        region_fill
    } else {
        style.background.as_str()
    };
    contrast_text_color(background, &style.text_color, &style.contrast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlacementStrategy;

    #[test]
    fn outside_labels_contrast_with_chart_background() {
        let style = StyleConfig::default();
        let mut result = LabelResult {
            lines: vec!["x".to_string()],
            font_size_px: 12.0,
            x: 0.0,
            y: 0.0,
            fits: true,
            width: 6.0,
            height: 14.0,
            line_height: 14.0,
            strategy: PlacementStrategy::Searched,
            inside_region: true,
        };
        assert_eq!(label_text_color(&result, "#1f1f3a", &style), "#FFFFFF");
        result.inside_region = false;
        assert_eq!(label_text_color(&result, "#1f1f3a", &style), style.text_color);
    }

    #[test]
    fn parses_supported_notations() {
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse("#1C2430").unwrap(), Rgb::new(0x1c, 0x24, 0x30));
        assert_eq!(Rgb::parse("#00000080").unwrap(), Rgb::BLACK);
        assert_eq!(Rgb::parse("rgb(10, 20, 30)").unwrap(), Rgb::new(10, 20, 30));
        assert_eq!(
            Rgb::parse("rgba(232,232,232, 0.8)").unwrap(),
            Rgb::new(232, 232, 232)
        );
        assert_eq!(Rgb::parse(" Black ").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn rejects_bad_colors() {
        assert!(matches!(
            Rgb::parse("rgb(300, 0, 0)"),
            Err(ColorError::OutOfRange(_))
        ));
        assert!(matches!(
            Rgb::parse("hsl(0, 100%, 50%)"),
            Err(ColorError::Unrecognized(_))
        ));
        assert!(Rgb::parse("#12").is_err());
    }

    #[test]
    fn brightness_extremes() {
        assert_eq!(Rgb::BLACK.brightness(), 0.0);
        assert!((Rgb::WHITE.brightness() - 255.0).abs() < 1e-3);
    }

    #[test]
    fn keeps_configured_color_with_enough_contrast() {
        let cfg = ContrastConfig::default();
        let choice = pick_text_color(Rgb::WHITE, Rgb::new(0x33, 0x33, 0x33), &cfg);
        assert_eq!(choice, TextColorChoice::Configured);
    }

    #[test]
    fn overrides_low_contrast_colors() {
        let cfg = ContrastConfig::default();
        // dark grey text on a dark bar
        let dark_bar = Rgb::new(40, 40, 60);
        assert_eq!(
            pick_text_color(dark_bar, Rgb::new(0x33, 0x33, 0x33), &cfg),
            TextColorChoice::Light
        );
        // light text on a pale fill
        let pale = Rgb::new(230, 230, 200);
        assert_eq!(
            pick_text_color(pale, Rgb::new(250, 250, 250), &cfg),
            TextColorChoice::Dark
        );
    }

    #[test]
    fn string_helper_falls_back_on_parse_failure() {
        let cfg = ContrastConfig::default();
        assert_eq!(contrast_text_color("var(--bg)", "#333", &cfg), "#333");
        assert_eq!(contrast_text_color("#28283c", "#333", &cfg), "#FFFFFF");
    }
}
