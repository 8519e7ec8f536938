pub mod color;
pub mod config;
pub mod error;
pub mod label_dump;
pub mod layout;
pub mod text_metrics;
pub mod theme;

pub use color::{Rgb, contrast_text_color, label_text_color, pick_text_color};
pub use config::{StyleConfig, load_config, parse_config_str};
pub use error::{ColorError, MeasureError};
pub use layout::{
    Anchor, AnnularSector, AxisAlignedBox, FontSpec, LabelRequest, LabelResult, Obstacle,
    PlacementCandidate, PlacementStrategy, Point, Region, TextMeasurement, layout_label,
    layout_labels,
};
pub use text_metrics::{GlyphTableMetrics, HeuristicMetrics, TextMetricsProvider};
#[cfg(feature = "system-fonts")]
pub use text_metrics::FontDbMetrics;
pub use theme::Theme;
