//! Drawing surface seam.

use super::primitives::DrawOp;

/// Host surface that rasterizes draw primitives.
pub trait Canvas {
    /// Draws one primitive, already in canvas coordinates.
    fn draw(&mut self, op: &DrawOp);
}

/// Canvas that keeps every primitive it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    /// Creates an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives drawn so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything drawn.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw(&mut self, op: &DrawOp) {
        self.ops.push(op.clone());
    }
}
