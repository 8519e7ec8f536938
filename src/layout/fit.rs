use crate::text_metrics::{TextMetricsProvider, text_width};

use super::FontSpec;
use super::text::wrap;

/// Size decrement per fitting step.
pub const FONT_STEP_PX: f32 = 1.0;
/// Upper bound on fitting steps; very wide size ranges use coarser steps.
const MAX_FIT_STEPS: f32 = 128.0;

/// Largest size in `[min_size_px, base.size_px]` at which `text` fits
/// `max_width`, stepping down from the base size.
///
/// Stops at the floor even when the text still overflows; truncation deals
/// with that case.
pub fn fit_font<P: TextMetricsProvider + ?Sized>(
    text: &str,
    base: &FontSpec,
    max_width: f32,
    min_size_px: f32,
    metrics: &P,
) -> FontSpec {
    if !(max_width > 0.0) {
        return base.with_size(size_range(base, min_size_px).0);
    }
    shrink_to_fit(base, min_size_px, |font| {
        text_width(metrics, text, font) <= max_width
    })
}

/// Room for a wrapped label block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLimits {
    pub max_width: f32,
    pub max_height: f32,
    pub max_lines: usize,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl BlockLimits {
    /// Lines allowed at `size_px`: `max_lines`, further limited by how many
    /// lines stack within `max_height`. Never below one.
    pub fn line_cap(&self, size_px: f32) -> usize {
        let line_height = self.line_height * size_px;
        let height_cap = if line_height > 0.0 && self.max_height > 0.0 {
            (self.max_height / line_height).floor() as usize
        } else {
            self.max_lines
        };
        self.max_lines.min(height_cap).max(1)
    }
}

/// Largest size at which `text` wraps into at most `limits.line_cap(size)`
/// lines that each fit `limits.max_width`.
///
/// Like [`fit_font`] this stops at the floor; the caller caps and truncates
/// whatever still overflows there.
pub fn fit_block<P: TextMetricsProvider + ?Sized>(
    text: &str,
    base: &FontSpec,
    limits: &BlockLimits,
    min_size_px: f32,
    metrics: &P,
) -> FontSpec {
    if !(limits.max_width > 0.0) {
        return base.with_size(size_range(base, min_size_px).0);
    }
    shrink_to_fit(base, min_size_px, |font| {
        let lines = wrap(text, font, limits.max_width, metrics);
        let count = lines.iter().filter(|line| !line.is_empty()).count();
        count <= limits.line_cap(font.size_px)
            && lines
                .iter()
                .all(|line| text_width(metrics, line, font) <= limits.max_width)
    })
}

/// Sanitized `(min, base)` sizes; a base below the floor is raised to it.
fn size_range(base: &FontSpec, min_size_px: f32) -> (f32, f32) {
    let min_size = if min_size_px.is_finite() {
        min_size_px.max(0.0)
    } else {
        0.0
    };
    let base_size = if base.size_px.is_finite() {
        base.size_px.max(min_size)
    } else {
        min_size
    };
    (min_size, base_size)
}

fn shrink_to_fit(base: &FontSpec, min_size_px: f32, fits: impl Fn(&FontSpec) -> bool) -> FontSpec {
    let (min_size, base_size) = size_range(base, min_size_px);
    let step = FONT_STEP_PX.max((base_size - min_size) / MAX_FIT_STEPS);
    let mut size = base_size;
    while size > min_size && !fits(&base.with_size(size)) {
        size = (size - step).max(min_size);
    }
    base.with_size(size)
}

/// One size for a group of labels: the smallest of their individual fits.
///
/// Labels with no text or no room are ignored, since they are not drawn.
/// Returns the base size (clamped to the floor) for an empty group.
pub fn fit_uniform<'a, P, I>(labels: I, base: &FontSpec, min_size_px: f32, metrics: &P) -> FontSpec
where
    P: TextMetricsProvider + ?Sized,
    I: IntoIterator<Item = (&'a str, f32)>,
{
    let floor = base.size_px.max(min_size_px);
    let mut size = floor;
    for (text, max_width) in labels {
        if text.trim().is_empty() || !(max_width > 0.0) {
            continue;
        }
        let fitted = fit_font(text, base, max_width, min_size_px, metrics);
        size = size.min(fitted.size_px);
    }
    base.with_size(size)
}
