//! Turning a laid-out, animated row into draw primitives.

pub mod canvas;
pub mod primitives;
pub mod renderer;
pub mod theme;

pub use canvas::{Canvas, RecordingCanvas};
pub use primitives::{Color, DrawOp, IconKind, TextAlign};
pub use renderer::{render_row, RenderInput};
pub use theme::{SwipeColors, Theme};
