use crate::error::MeasureError;
use crate::layout::{FontSpec, TextMeasurement};

/// Width factor of the last-resort estimate, in ems per character.
pub const FALLBACK_WIDTH_FACTOR: f32 = 0.6;
/// Height factor of the last-resort estimate, in ems.
pub const FALLBACK_HEIGHT_FACTOR: f32 = 1.2;

/// Measures rendered text for the host surface.
///
/// Implementations must be deterministic for a given surface and cheap
/// enough to be called repeatedly while fitting a single label. The engine
/// never caches results on their behalf.
pub trait TextMetricsProvider {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError>;
}

impl<T: TextMetricsProvider + ?Sized> TextMetricsProvider for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
        (**self).measure(text, font)
    }
}

impl<T: TextMetricsProvider + ?Sized> TextMetricsProvider for Box<T> {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
        (**self).measure(text, font)
    }
}

pub fn heuristic_measurement(text: &str, font_size: f32) -> TextMeasurement {
    let size = font_size.max(0.0);
    TextMeasurement {
        width: text.chars().count() as f32 * size * FALLBACK_WIDTH_FACTOR,
        height: size * FALLBACK_HEIGHT_FACTOR,
    }
}

/// Measure through `metrics`, substituting the fixed estimate when the
/// provider fails or reports a width that is not a usable number.
pub fn measure_or_estimate<P: TextMetricsProvider + ?Sized>(
    metrics: &P,
    text: &str,
    font: &FontSpec,
) -> TextMeasurement {
    match metrics.measure(text, font) {
        Ok(m) if m.width.is_finite() && m.width >= 0.0 => TextMeasurement {
            width: m.width,
            height: if m.height.is_finite() && m.height > 0.0 {
                m.height
            } else {
                font.size_px.max(0.0) * FALLBACK_HEIGHT_FACTOR
            },
        },
        Ok(m) => {
            tracing::trace!(width = m.width, "provider returned unusable width, estimating");
            heuristic_measurement(text, font.size_px)
        }
        Err(err) => {
            tracing::trace!(%err, "text measurement unavailable, estimating");
            heuristic_measurement(text, font.size_px)
        }
    }
}

pub fn text_width<P: TextMetricsProvider + ?Sized>(
    metrics: &P,
    text: &str,
    font: &FontSpec,
) -> f32 {
    measure_or_estimate(metrics, text, font).width
}

/// The fixed `chars × size × 0.6` estimate as a provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl TextMetricsProvider for HeuristicMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
        Ok(heuristic_measurement(text, font.size_px))
    }
}

/// Precomputed per-character advance table for a sans-serif stack.
///
/// Close enough to browser output for sizing decisions on targets that have
/// no font files available.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphTableMetrics;

impl TextMetricsProvider for GlyphTableMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
        let size = font.size_px.max(0.0);
        let mut width = 0.0f32;
        for ch in text.chars() {
            width += match ch {
                '\n' => 0.0,
                '\t' => char_width_factor(' ') * 4.0,
                _ => char_width_factor(ch),
            };
        }
        if font.weight >= 600 {
            width *= BOLD_WIDTH_SCALE;
        }
        Ok(TextMeasurement {
            width: width * size,
            height: size * FALLBACK_HEIGHT_FACTOR,
        })
    }
}

const BOLD_WIDTH_SCALE: f32 = 1.06;

pub fn char_width_factor(ch: char) -> f32 {
    // Widths in ems, measured from the default browser sans-serif stack at 16px.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        '\u{2026}' => 0.820,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0' => 0.613,
        '1' => 0.396,
        '2' => 0.609,
        '3' => 0.597,
        '4' => 0.614,
        '5' => 0.586,
        '6' => 0.608,
        '7' => 0.559,
        '8' => 0.611,
        '9' => 0.595,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}

#[cfg(feature = "system-fonts")]
pub use fontdb_backend::FontDbMetrics;

#[cfg(feature = "system-fonts")]
mod fontdb_backend {
    use super::{FontSpec, MeasureError, TextMeasurement, TextMetricsProvider};
    use fontdb::{Database, Family, Query, Stretch, Style, Weight};
    use once_cell::sync::Lazy;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use ttf_parser::Face;

    static SYSTEM_FONTS: Lazy<Database> = Lazy::new(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        db
    });

    enum FontSource {
        System,
        Owned(Database),
    }

    /// Glyph-advance measurement backed by real font files.
    pub struct FontDbMetrics {
        source: FontSource,
        faces: Mutex<HashMap<(String, u16), Result<FontFace, MeasureError>>>,
    }

    impl FontDbMetrics {
        /// Measure with the fonts installed on this machine.
        pub fn system() -> Self {
            Self {
                source: FontSource::System,
                faces: Mutex::new(HashMap::new()),
            }
        }

        /// Measure with a caller-assembled font database.
        pub fn with_database(db: Database) -> Self {
            Self {
                source: FontSource::Owned(db),
                faces: Mutex::new(HashMap::new()),
            }
        }

        fn db(&self) -> &Database {
            match &self.source {
                FontSource::System => Lazy::force(&SYSTEM_FONTS),
                FontSource::Owned(db) => db,
            }
        }

        fn load_face(&self, font_family: &str, weight: u16) -> Result<FontFace, MeasureError> {
            #[derive(Clone, Copy)]
            enum FamilyToken {
                Generic(Family<'static>),
                Name(usize),
            }

            let mut names: Vec<String> = Vec::new();
            let mut order: Vec<FamilyToken> = Vec::new();
            for part in font_family.split(',') {
                let raw = part.trim().trim_matches('"').trim_matches('\'');
                if raw.is_empty() {
                    continue;
                }
                let lower = raw.to_ascii_lowercase();
                match lower.as_str() {
                    "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                    "sans-serif" => order.push(FamilyToken::Generic(Family::SansSerif)),
                    "monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                    "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
                    "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
                    "system-ui" | "-apple-system" | "ui-sans-serif" => {
                        order.push(FamilyToken::Generic(Family::SansSerif))
                    }
                    "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                    _ => {
                        let idx = names.len();
                        names.push(raw.to_string());
                        order.push(FamilyToken::Name(idx));
                    }
                }
            }
            if order.is_empty() {
                order.push(FamilyToken::Generic(Family::SansSerif));
            }

            let families: Vec<Family<'_>> = order
                .iter()
                .map(|token| match *token {
                    FamilyToken::Generic(family) => family,
                    FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
                })
                .collect();

            let query = Query {
                families: &families,
                weight: Weight(weight),
                stretch: Stretch::Normal,
                style: Style::Normal,
            };
            let unavailable = || MeasureError::FontUnavailable {
                family: font_family.to_string(),
            };
            let id = self.db().query(&query).ok_or_else(unavailable)?;
            self.db()
                .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
                .ok_or_else(unavailable)?
                .ok_or_else(|| MeasureError::InvalidFont {
                    family: font_family.to_string(),
                })
        }
    }

    impl TextMetricsProvider for FontDbMetrics {
        fn measure(&self, text: &str, font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
            let mut faces = self
                .faces
                .lock()
                .map_err(|err| MeasureError::Backend(format!("face cache poisoned: {err}")))?;
            let family = normalize_family_key(&font.family);
            let face = faces
                .entry((family.clone(), font.weight))
                .or_insert_with(|| {
                    let loaded = self.load_face(&family, font.weight);
                    if let Err(err) = &loaded {
                        tracing::debug!(%err, "font face lookup failed");
                    }
                    loaded
                });
            let face = face.as_mut().map_err(|err| err.clone())?;
            Ok(face.measure(text, font.size_px.max(0.0)))
        }
    }

    struct FontFace {
        data: Vec<u8>,
        index: u32,
        units_per_em: f32,
        ascender: f32,
        descender: f32,
        ascii_advances: [u16; 128],
        advance_cache: HashMap<char, Option<u16>>,
    }

    impl FontFace {
        fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
            let face = Face::parse(&data, index).ok()?;
            let mut ascii_advances = [0u16; 128];
            for byte in 0u8..=127 {
                if let Some(glyph_id) = face.glyph_index(byte as char) {
                    ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                }
            }
            let units_per_em = face.units_per_em().max(1) as f32;
            let ascender = face.ascender() as f32;
            let descender = face.descender() as f32;
            Some(Self {
                data,
                index,
                units_per_em,
                ascender,
                descender,
                ascii_advances,
                advance_cache: HashMap::new(),
            })
        }

        fn advance(&mut self, ch: char) -> Option<u16> {
            if ch.is_ascii() {
                let advance = self.ascii_advances[ch as usize];
                return (advance != 0).then_some(advance);
            }
            if let Some(cached) = self.advance_cache.get(&ch) {
                return *cached;
            }
            let advance = Face::parse(&self.data, self.index).ok().and_then(|face| {
                let glyph = face.glyph_index(ch)?;
                face.glyph_hor_advance(glyph)
            });
            self.advance_cache.insert(ch, advance);
            advance
        }

        fn measure(&mut self, text: &str, font_size: f32) -> TextMeasurement {
            let scale = font_size / self.units_per_em;
            let missing = font_size * 0.56;
            let mut width = 0.0f32;
            for ch in text.chars() {
                let (ch, repeat) = match ch {
                    '\n' => continue,
                    '\t' => (' ', 4.0),
                    other => (other, 1.0),
                };
                width += match self.advance(ch) {
                    Some(advance) => advance as f32 * scale * repeat,
                    None => missing * repeat,
                };
            }
            TextMeasurement {
                width: width.max(0.0),
                height: ((self.ascender - self.descender) * scale).max(0.0),
            }
        }
    }

    fn normalize_family_key(font_family: &str) -> String {
        let trimmed = font_family.trim();
        if trimmed.is_empty() {
            "sans-serif".to_string()
        } else {
            trimmed.to_string()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn empty_database_reports_unavailable_font() {
            let metrics = FontDbMetrics::with_database(Database::new());
            let font = FontSpec::new("Nonexistent Sans", 12.0, 400);
            let err = metrics.measure("abc", &font).unwrap_err();
            assert!(matches!(err, MeasureError::FontUnavailable { .. }));
            // second call is served from the cache with the same answer
            assert_eq!(metrics.measure("abc", &font).unwrap_err(), err);
        }

        #[test]
        fn normalize_family_key_defaults_to_sans() {
            assert_eq!(normalize_family_key("   "), "sans-serif");
            assert_eq!(normalize_family_key(" Inter "), "Inter");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl TextMetricsProvider for Broken {
        fn measure(&self, _text: &str, _font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
            Err(MeasureError::Backend("offscreen canvas missing".to_string()))
        }
    }

    struct NanWidth;

    impl TextMetricsProvider for NanWidth {
        fn measure(&self, _text: &str, _font: &FontSpec) -> Result<TextMeasurement, MeasureError> {
            Ok(TextMeasurement {
                width: f32::NAN,
                height: 10.0,
            })
        }
    }

    #[test]
    fn failed_measurement_uses_heuristic() {
        let font = FontSpec::new("sans-serif", 10.0, 400);
        let m = measure_or_estimate(&Broken, "abcd", &font);
        assert!((m.width - 24.0).abs() < 1e-4);
        assert!((m.height - 12.0).abs() < 1e-4);
    }

    #[test]
    fn unusable_width_uses_heuristic() {
        let font = FontSpec::new("sans-serif", 10.0, 400);
        let m = measure_or_estimate(&NanWidth, "ab", &font);
        assert!((m.width - 12.0).abs() < 1e-4);
    }

    #[test]
    fn heuristic_never_reports_zero_for_text() {
        let m = heuristic_measurement("x", 8.0);
        assert!(m.width > 0.0);
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}', '\u{2026}'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn glyph_table_scales_with_font_size() {
        let w16 = text_width(&GlyphTableMetrics, "Hello", &FontSpec::new("x", 16.0, 400));
        let w32 = text_width(&GlyphTableMetrics, "Hello", &FontSpec::new("x", 32.0, 400));
        assert!((w32 - w16 * 2.0).abs() < 0.01, "width should double with font size");
    }

    #[test]
    fn glyph_table_bold_is_wider() {
        let regular = text_width(&GlyphTableMetrics, "Revenue", &FontSpec::new("x", 12.0, 400));
        let bold = text_width(&GlyphTableMetrics, "Revenue", &FontSpec::new("x", 12.0, 700));
        assert!(bold > regular);
    }

    #[test]
    fn glyph_table_ignores_newlines() {
        let font = FontSpec::new("x", 10.0, 400);
        assert_eq!(
            text_width(&GlyphTableMetrics, "a\nb", &font),
            text_width(&GlyphTableMetrics, "ab", &font)
        );
    }
}
