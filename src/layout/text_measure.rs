//! Text measurement seam.
//!
//! Text shaping is owned by the host. The layout engine only needs widths
//! and ellipsized runs, so it talks to a [`TextMeasurer`]. The bundled
//! [`MonospaceMeasurer`] measures by Unicode display width and is what the
//! terminal preview uses.

use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Ellipsis appended to truncated runs.
pub const ELLIPSIS: char = '…';

/// Typographic role of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Conversation title.
    Title,
    /// Last message preview.
    Preview,
    /// Sender name or draft label before the preview.
    SenderPrefix,
    /// Timestamp on the title line.
    Timestamp,
    /// Digits inside a pill.
    Counter,
    /// Label under the swipe action icon.
    SwipeLabel,
}

/// A measured, possibly ellipsized run of text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    /// Text to draw, including the ellipsis if truncated.
    pub text: String,
    /// Drawn width in pixels.
    pub width: f32,
    /// `true` if the source text did not fit.
    pub truncated: bool,
    /// Number of lines the run occupies (at least 1 for non-empty text).
    pub lines: u8,
}

impl TextRun {
    /// A run with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Reasons a measurement can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The width constraint is negative or not finite.
    #[error("Invalid width constraint: {0}")]
    InvalidWidth(f32),

    /// The text cannot be shaped with the requested style.
    #[error("Cannot measure {len} characters as {style:?}: {reason}")]
    Unmeasurable {
        /// Length of the text in characters.
        len: usize,
        /// Requested style.
        style: TextStyle,
        /// Backend message.
        reason: String,
    },
}

/// Measures and ellipsizes styled text.
pub trait TextMeasurer {
    /// Width of `text` drawn on one line in `style`.
    fn measure(&self, text: &str, style: TextStyle) -> Result<f32, MeasureError>;

    /// Fits `text` into `max_lines` lines of `max_width`, truncating with an
    /// ellipsis when it does not fit.
    fn ellipsize(
        &self,
        text: &str,
        style: TextStyle,
        max_width: f32,
        max_lines: u8,
    ) -> Result<TextRun, MeasureError>;
}

/// Measures text by terminal display width times a fixed advance.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceMeasurer {
    advance: f32,
}

impl MonospaceMeasurer {
    /// Creates a measurer where one display column is `advance` pixels wide.
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }

    /// Pixels per display column.
    pub fn advance(&self) -> f32 {
        self.advance
    }

    fn char_width(&self, c: char) -> f32 {
        c.width().unwrap_or(0) as f32 * self.advance
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, _style: TextStyle) -> Result<f32, MeasureError> {
        Ok(text.chars().map(|c| self.char_width(c)).sum())
    }

    fn ellipsize(
        &self,
        text: &str,
        style: TextStyle,
        max_width: f32,
        max_lines: u8,
    ) -> Result<TextRun, MeasureError> {
        if !max_width.is_finite() || max_width < 0.0 {
            return Err(MeasureError::InvalidWidth(max_width));
        }
        let lines = max_lines.max(1);
        let capacity = max_width * f32::from(lines);
        let full = self.measure(text, style)?;

        if text.is_empty() {
            return Ok(TextRun::empty());
        }

        if full <= capacity {
            let used_lines = if max_width > 0.0 {
                ((full / max_width).ceil() as u8).clamp(1, lines)
            } else {
                1
            };
            return Ok(TextRun {
                text: text.to_string(),
                width: full.min(max_width),
                truncated: false,
                lines: used_lines,
            });
        }

        let ellipsis_width = self.char_width(ELLIPSIS);
        if capacity < ellipsis_width {
            return Ok(TextRun {
                text: String::new(),
                width: 0.0,
                truncated: true,
                lines: 1,
            });
        }

        let budget = capacity - ellipsis_width;
        let mut kept = String::new();
        let mut used = 0.0;
        for c in text.chars() {
            let w = self.char_width(c);
            if used + w > budget {
                break;
            }
            used += w;
            kept.push(c);
        }
        kept.push(ELLIPSIS);
        let width = used + ellipsis_width;

        Ok(TextRun {
            text: kept,
            width: width.min(max_width),
            truncated: true,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_by_display_width() {
        let m = MonospaceMeasurer::new(8.0);
        assert_eq!(m.measure("abc", TextStyle::Title), Ok(24.0));
        // CJK characters take two columns.
        assert_eq!(m.measure("日本", TextStyle::Title), Ok(32.0));
    }

    #[test]
    fn fitting_text_is_returned_unchanged() {
        let m = MonospaceMeasurer::new(8.0);
        let run = m.ellipsize("hello", TextStyle::Preview, 100.0, 1).expect("valid");
        assert_eq!(run.text, "hello");
        assert_eq!(run.width, 40.0);
        assert!(!run.truncated);
        assert_eq!(run.lines, 1);
    }

    #[test]
    fn overflowing_text_is_ellipsized() {
        let m = MonospaceMeasurer::new(8.0);
        let run = m
            .ellipsize("hello world", TextStyle::Preview, 48.0, 1)
            .expect("valid");
        assert_eq!(run.text, "hello…");
        assert_eq!(run.width, 48.0);
        assert!(run.truncated);
    }

    #[test]
    fn zero_width_yields_empty_run() {
        let m = MonospaceMeasurer::new(8.0);
        let run = m.ellipsize("hello", TextStyle::Title, 0.0, 1).expect("valid");
        assert_eq!(run.text, "");
        assert_eq!(run.width, 0.0);
        assert!(run.truncated);
    }

    #[test]
    fn multi_line_capacity_is_used() {
        let m = MonospaceMeasurer::new(8.0);
        let run = m
            .ellipsize("abcdefgh", TextStyle::Preview, 40.0, 2)
            .expect("valid");
        assert_eq!(run.text, "abcdefgh");
        assert_eq!(run.lines, 2);
        assert!(!run.truncated);
    }

    #[test]
    fn invalid_width_is_rejected() {
        let m = MonospaceMeasurer::default();
        assert_eq!(
            m.ellipsize("x", TextStyle::Title, f32::NAN, 1).map(|_| ()).unwrap_err().to_string(),
            "Invalid width constraint: NaN"
        );
        assert!(m.ellipsize("x", TextStyle::Title, -1.0, 1).is_err());
    }
}
