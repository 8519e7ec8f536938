use std::f32::consts::PI;

use label_fit::layout::label_placement::place_polar;
use label_fit::layout::{fit_font, truncate, wrap};
use label_fit::{
    AnnularSector, FontSpec, GlyphTableMetrics, Obstacle, PlacementStrategy, Region, StyleConfig,
    TextMetricsProvider,
};
use proptest::prelude::*;

const ELLIPSIS: &str = "\u{2026}";

fn width(text: &str, font: &FontSpec) -> f32 {
    GlyphTableMetrics
        .measure(text, font)
        .map(|m| m.width)
        .unwrap_or(f32::INFINITY)
}

fn label_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{0,40}"
}

proptest! {
    #[test]
    fn fitted_size_stays_in_range(
        text in label_text(),
        base in 8.0f32..40.0,
        min in 1.0f32..8.0,
        max_width in 1.0f32..300.0,
    ) {
        let font = fit_font(
            &text,
            &FontSpec::new("sans-serif", base, 400),
            max_width,
            min,
            &GlyphTableMetrics,
        );
        prop_assert!(font.size_px >= min && font.size_px <= base);
        prop_assert!(font.size_px == min || width(&text, &font) <= max_width);
    }

    #[test]
    fn truncated_text_fits_or_is_dropped(
        text in label_text(),
        size in 6.0f32..24.0,
        max_width in 0.0f32..200.0,
    ) {
        let font = FontSpec::new("sans-serif", size, 400);
        let out = truncate(&text, &font, max_width, ELLIPSIS, &GlyphTableMetrics);
        if out == text {
            prop_assert!(width(&text, &font) <= max_width);
        } else if !out.is_empty() {
            prop_assert!(out.ends_with(ELLIPSIS));
            prop_assert!(width(&out, &font) <= max_width);
            let prefix = out.trim_end_matches(ELLIPSIS);
            prop_assert!(text.starts_with(prefix));
        }
    }

    #[test]
    fn wrapped_lines_respect_width(
        text in label_text(),
        size in 6.0f32..20.0,
        max_width in 10.0f32..200.0,
    ) {
        let font = FontSpec::new("sans-serif", size, 400);
        for line in wrap(&text, &font, max_width, &GlyphTableMetrics) {
            prop_assert!(
                line.chars().count() <= 1 || width(&line, &font) <= max_width,
                "{:?} overflows {}", line, max_width
            );
        }
    }

    #[test]
    fn wrapping_keeps_every_word(text in "[a-z]{1,12}( [a-z]{1,12}){0,6}", max_width in 40.0f32..200.0) {
        let font = FontSpec::new("sans-serif", 10.0, 400);
        let lines = wrap(&text, &font, max_width, &GlyphTableMetrics);
        let rejoined: String = lines.concat().split_whitespace().collect();
        let original: String = text.split_whitespace().collect();
        prop_assert_eq!(rejoined, original);
    }

    #[test]
    fn searched_placement_clears_the_obstacle(
        start in 0.0f32..(2.0 * PI),
        span in 0.5f32..(2.0 * PI),
        inner in 20.0f32..80.0,
        band in 20.0f32..80.0,
        dx in -15.0f32..15.0,
        dy in -15.0f32..15.0,
        r in 1.0f32..20.0,
        label_w in 5.0f32..60.0,
        label_h in 5.0f32..20.0,
    ) {
        let sector = AnnularSector {
            cx: 0.0,
            cy: 0.0,
            inner_radius: inner,
            outer_radius: inner + band,
            start_angle: start,
            end_angle: start + span,
        };
        let preferred = Region::Sector(sector).preferred_anchor();
        let anchor = preferred.to_point();
        let obstacle = Obstacle::Circle { cx: anchor.x + dx, cy: anchor.y + dy, r };
        let placed = place_polar(
            preferred,
            (label_w, label_h),
            Some(&obstacle),
            &sector,
            &StyleConfig::default().placement,
        );
        prop_assert!(placed.candidate.deviation_cost >= 0.0);
        if placed.strategy != PlacementStrategy::PushOut {
            let (ox, oy, ow, oh) = obstacle.bounds();
            let (lx, ly) = (placed.candidate.x - label_w / 2.0, placed.candidate.y - label_h / 2.0);
            let overlap_x = (lx + label_w).min(ox + ow) - lx.max(ox);
            let overlap_y = (ly + label_h).min(oy + oh) - ly.max(oy);
            prop_assert!(overlap_x <= 0.0 || overlap_y <= 0.0);
        }
        if placed.strategy == PlacementStrategy::Preferred {
            prop_assert_eq!(placed.candidate.deviation_cost, 0.0);
        }
    }
}
