//! Per-label fitting pipeline: size, then wrap or truncate, then place.

pub mod fit;
pub mod label_placement;
pub mod text;
pub mod truncate;
mod types;

pub use fit::{BlockLimits, fit_block, fit_font, fit_uniform};
pub use label_placement::place;
pub use text::{line_offsets, split_lines, wrap};
pub use truncate::truncate;
pub use types::*;

use crate::config::{SizingPolicy, StyleConfig};
use crate::text_metrics::{TextMetricsProvider, text_width};

/// Fit and place one label. Never fails: labels that cannot be drawn come
/// back with `fits == false`.
pub fn layout_label<P: TextMetricsProvider + ?Sized>(
    request: &LabelRequest,
    style: &StyleConfig,
    metrics: &P,
) -> LabelResult {
    let font = fit_request(request, style, metrics);
    layout_label_at(request, style, &font, metrics)
}

/// Size for one request: single-line fit, or block fit when wrapping is
/// allowed.
fn fit_request<P: TextMetricsProvider + ?Sized>(
    request: &LabelRequest,
    style: &StyleConfig,
    metrics: &P,
) -> FontSpec {
    let limits = block_limits(&request.region, style);
    if style.max_lines > 1 {
        fit_block(&request.text, &style.font, &limits, style.min_font_size, metrics)
    } else {
        let text = single_line(&request.text);
        fit_font(&text, &style.font, limits.max_width, style.min_font_size, metrics)
    }
}

fn block_limits(region: &Region, style: &StyleConfig) -> BlockLimits {
    BlockLimits {
        max_width: style.width_budget(region.max_width()),
        max_height: region.max_height(),
        max_lines: style.max_lines.max(1),
        line_height: style.line_height,
    }
}

/// Lay out a group of labels according to `style.sizing`.
pub fn layout_labels<P: TextMetricsProvider + ?Sized>(
    requests: &[LabelRequest],
    style: &StyleConfig,
    metrics: &P,
) -> Vec<LabelResult> {
    match style.sizing {
        SizingPolicy::PerLabel => requests
            .iter()
            .map(|request| layout_label(request, style, metrics))
            .collect(),
        SizingPolicy::Uniform => {
            let font = if style.max_lines > 1 {
                let floor = style.font.size_px.max(style.min_font_size);
                let size = requests
                    .iter()
                    .filter(|r| {
                        !r.text.trim().is_empty() && style.width_budget(r.region.max_width()) > 0.0
                    })
                    .map(|r| fit_request(r, style, metrics).size_px)
                    .fold(floor, f32::min);
                style.font.with_size(size)
            } else {
                let texts: Vec<(String, f32)> = requests
                    .iter()
                    .map(|r| {
                        (
                            single_line(&r.text),
                            style.width_budget(r.region.max_width()),
                        )
                    })
                    .collect();
                fit_uniform(
                    texts.iter().map(|(text, budget)| (text.as_str(), *budget)),
                    &style.font,
                    style.min_font_size,
                    metrics,
                )
            };
            tracing::debug!(size = font.size_px, labels = requests.len(), "uniform label size");
            requests
                .iter()
                .map(|request| layout_label_at(request, style, &font, metrics))
                .collect()
        }
    }
}

/// Wrap/truncate and place at an already chosen font.
fn layout_label_at<P: TextMetricsProvider + ?Sized>(
    request: &LabelRequest,
    style: &StyleConfig,
    font: &FontSpec,
    metrics: &P,
) -> LabelResult {
    let region = &request.region;
    let preferred = region.preferred_anchor();
    let anchor = preferred.to_point();
    let line_height = style.line_height * font.size_px;
    let suppressed = |font_size_px: f32| LabelResult {
        lines: Vec::new(),
        font_size_px,
        x: anchor.x,
        y: anchor.y,
        fits: false,
        width: 0.0,
        height: 0.0,
        line_height,
        strategy: PlacementStrategy::Preferred,
        inside_region: true,
    };

    if request.text.trim().is_empty() {
        return suppressed(font.size_px);
    }
    let max_width = style.width_budget(region.max_width());
    if !region.is_valid() || max_width <= 0.0 {
        tracing::debug!(?region, "label region has no room");
        return suppressed(font.size_px.min(style.min_font_size.max(0.0)).max(0.0));
    }

    let lines = fit_lines(&request.text, font, &block_limits(region, style), style, metrics);
    if lines.is_empty() {
        tracing::debug!(text = %request.text, max_width, "label does not fit, suppressing");
        return suppressed(font.size_px);
    }

    let width = lines
        .iter()
        .map(|line| text_width(metrics, line, font))
        .fold(0.0, f32::max);
    let height = text::block_height(lines.len(), line_height);
    let placement = place(
        preferred,
        (width, height),
        request.obstacle.as_ref(),
        region,
        &style.placement,
    );

    LabelResult {
        lines,
        font_size_px: font.size_px,
        x: placement.candidate.x,
        y: placement.candidate.y,
        fits: true,
        width,
        height,
        line_height,
        strategy: placement.strategy,
        inside_region: placement.inside_region,
    }
}

/// Lines for `text` at `font`, each within `limits.max_width`. Empty when
/// nothing, not even an ellipsis, fits.
fn fit_lines<P: TextMetricsProvider + ?Sized>(
    text: &str,
    font: &FontSpec,
    limits: &BlockLimits,
    style: &StyleConfig,
    metrics: &P,
) -> Vec<String> {
    let max_width = limits.max_width;
    if style.max_lines <= 1 {
        let line = truncate(&single_line(text), font, max_width, &style.ellipsis, metrics);
        return if line.is_empty() { Vec::new() } else { vec![line] };
    }

    let cap = limits.line_cap(font.size_px);
    let mut lines = wrap(text, font, max_width, metrics);
    lines.retain(|line| !line.is_empty());
    if lines.len() > cap {
        lines.truncate(cap - 1);
        lines.push(remaining_text(text, &lines));
    }
    for line in &mut lines {
        if text_width(metrics, line, font) > max_width {
            *line = truncate(line, font, max_width, &style.ellipsis, metrics);
            if line.is_empty() {
                return Vec::new();
            }
        }
    }
    lines
}

/// The part of `text` not covered by `kept`, taken from the source so that
/// words split across wrapped lines stay whole.
fn remaining_text(text: &str, kept: &[String]) -> String {
    let consumed: usize = kept
        .iter()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).count())
        .sum();
    let source = single_line(text);
    let mut seen = 0;
    for (idx, ch) in source.char_indices() {
        if seen == consumed {
            return source[idx..].split_whitespace().collect::<Vec<_>>().join(" ");
        }
        if !ch.is_whitespace() {
            seen += 1;
        }
    }
    String::new()
}

fn single_line(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
