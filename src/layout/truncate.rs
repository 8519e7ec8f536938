use crate::text_metrics::{TextMetricsProvider, text_width};

use super::FontSpec;

/// Shorten `text` to the longest prefix that fits `max_width` together with
/// `ellipsis`.
///
/// Text that already fits comes back unchanged. The result is empty when
/// not even the ellipsis fits, which means the label should not be drawn.
pub fn truncate<P: TextMetricsProvider + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    ellipsis: &str,
    metrics: &P,
) -> String {
    if text_width(metrics, text, font) <= max_width {
        return text.to_string();
    }
    if !(text_width(metrics, ellipsis, font) <= max_width) {
        return String::new();
    }

    // prefix_ends[k] is the byte offset after the first k chars
    let prefix_ends: Vec<usize> = std::iter::once(0)
        .chain(text.char_indices().skip(1).map(|(idx, _)| idx))
        .chain(std::iter::once(text.len()))
        .collect();
    let with_ellipsis = |chars: usize| format!("{}{}", text[..prefix_ends[chars]].trim_end(), ellipsis);
    let fits = |chars: usize| text_width(metrics, &with_ellipsis(chars), font) <= max_width;

    let mut lo = 0usize;
    let mut hi = prefix_ends.len() - 1;
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    with_ellipsis(lo)
}
