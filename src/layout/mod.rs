//! Row geometry: text measurement seam, fixed metrics, and the layout engine.

pub mod engine;
pub mod geometry;
pub mod metrics;
pub mod text_measure;

pub use engine::{
    BadgeSlot, LayoutEngine, LayoutKey, LayoutResult, LinkRegion, Pill, TextBox, TitleBadge,
    DEFAULT_DRAFT_LABEL,
};
pub use geometry::{Point, Rect};
pub use metrics::RowMetrics;
pub use text_measure::{
    MeasureError, MonospaceMeasurer, TextMeasurer, TextRun, TextStyle, ELLIPSIS,
};
