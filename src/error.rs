use thiserror::Error;

/// Why a [`TextMetricsProvider`](crate::text_metrics::TextMetricsProvider)
/// could not measure a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("no font face available for family `{family}`")]
    FontUnavailable { family: String },
    #[error("font data for `{family}` could not be parsed")]
    InvalidFont { family: String },
    #[error("font metrics backend unavailable: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("unrecognized color `{0}`")]
    Unrecognized(String),
    #[error("color component out of range in `{0}`")]
    OutOfRange(String),
}
