//! Draw primitives produced by the row renderer.
//!
//! Primitives carry absolute row-local geometry. The host canvas decides how
//! to rasterize them; nothing here knows about pixels on a screen.

use crate::animation::Interpolate;
use crate::layout::{Point, Rect, TextStyle};
use crate::model::SwipeActionKind;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 opaque.
    pub a: u8,
}

impl Color {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiplies the alpha by `factor` clamped to `[0, 1]`.
    pub fn faded(self, factor: f32) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        Self {
            a: (f32::from(self.a) * factor).round() as u8,
            ..self
        }
    }
}

impl Interpolate for Color {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self {
            r: mix(self.r, to.r),
            g: mix(self.g, to.g),
            b: mix(self.b, to.b),
            a: mix(self.a, to.a),
        }
    }
}

/// Vector icons the host must be able to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Lock before encrypted titles.
    Lock,
    /// Verified account check.
    Verified,
    /// Premium star.
    Premium,
    /// Scam warning label.
    Scam,
    /// Muted speaker after the title.
    Mute,
    /// Pin on the preview line.
    Pin,
    /// Pending send clock.
    Clock,
    /// First delivery check.
    Check,
    /// Second delivery check.
    SecondCheck,
    /// Exclamation mark inside the failed-send badge.
    Error,
    /// `@` inside the mention pill.
    Mention,
    /// Heart inside the reaction pill.
    Reaction,
    /// Call indicator bars at one stage of their loop.
    CallWave(u8),
    /// Action revealed by a swipe.
    SwipeAction(SwipeActionKind),
}

/// Horizontal placement of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    /// Flush with the box's left edge.
    #[default]
    Left,
    /// Centered in the box.
    Center,
    /// Flush with the box's right edge.
    Right,
}

/// One drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Filled, optionally rounded rectangle.
    FillRect {
        /// Bounds.
        rect: Rect,
        /// Fill color.
        color: Color,
        /// Corner radius; 0 for square corners.
        corner_radius: f32,
        /// Only the part inside the clip is painted.
        clip: Option<Rect>,
    },
    /// Filled circle.
    FillCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
        /// Only the part inside the clip is painted.
        clip: Option<Rect>,
    },
    /// Single line of already ellipsized text.
    Text {
        /// Box the text is placed in.
        rect: Rect,
        /// Text to draw.
        text: String,
        /// Typographic role.
        style: TextStyle,
        /// Text color.
        color: Color,
        /// Extra opacity in `[0, 1]`.
        alpha: f32,
        /// Scale around the box center.
        scale: f32,
        /// Placement inside the box.
        align: TextAlign,
        /// Only the part inside the clip is painted.
        clip: Option<Rect>,
    },
    /// Vector icon.
    Icon {
        /// Which icon.
        kind: IconKind,
        /// Bounds before scaling.
        rect: Rect,
        /// Tint.
        color: Color,
        /// Extra opacity in `[0, 1]`.
        alpha: f32,
        /// Scale around the bounds center.
        scale: f32,
        /// Only the part inside the clip is painted.
        clip: Option<Rect>,
    },
    /// Host-provided image (the avatar).
    Image {
        /// Image-provider key.
        key: String,
        /// Bounds.
        rect: Rect,
    },
}

impl DrawOp {
    /// Moves the primitive by `(dx, dy)`, including its clip.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let shift = |r: &Rect| Rect::new(r.x + dx, r.y + dy, r.width, r.height);
        let shift_clip = |c: &Option<Rect>| c.as_ref().map(shift);
        match self {
            Self::FillRect { rect, color, corner_radius, clip } => Self::FillRect {
                rect: shift(rect),
                color: *color,
                corner_radius: *corner_radius,
                clip: shift_clip(clip),
            },
            Self::FillCircle { center, radius, color, clip } => Self::FillCircle {
                center: Point::new(center.x + dx, center.y + dy),
                radius: *radius,
                color: *color,
                clip: shift_clip(clip),
            },
            Self::Text { rect, text, style, color, alpha, scale, align, clip } => Self::Text {
                rect: shift(rect),
                text: text.clone(),
                style: *style,
                color: *color,
                alpha: *alpha,
                scale: *scale,
                align: *align,
                clip: shift_clip(clip),
            },
            Self::Icon { kind, rect, color, alpha, scale, clip } => Self::Icon {
                kind: *kind,
                rect: shift(rect),
                color: *color,
                alpha: *alpha,
                scale: *scale,
                clip: shift_clip(clip),
            },
            Self::Image { key, rect } => Self::Image {
                key: key.clone(),
                rect: shift(rect),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_interpolate_per_channel() {
        let black = Color::rgb(0, 0, 0);
        let white = Color::rgb(255, 255, 255);
        assert_eq!(black.interpolate(&white, 0.5), Color::rgb(128, 128, 128));
        assert_eq!(black.interpolate(&white, 2.0), white);
    }

    #[test]
    fn fading_scales_alpha() {
        assert_eq!(Color::rgb(1, 2, 3).faded(0.5).a, 128);
        assert_eq!(Color::rgb(1, 2, 3).faded(f32::NAN).a, 0);
    }

    #[test]
    fn translation_moves_clip_too() {
        let op = DrawOp::FillCircle {
            center: Point::new(10.0, 10.0),
            radius: 4.0,
            color: Color::default(),
            clip: Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
        };
        let moved = op.translated(5.0, 100.0);
        assert_eq!(
            moved,
            DrawOp::FillCircle {
                center: Point::new(15.0, 110.0),
                radius: 4.0,
                color: Color::default(),
                clip: Some(Rect::new(5.0, 100.0, 20.0, 20.0)),
            }
        );
    }
}
