//! Row rendering.
//!
//! [`render_row`] turns a layout, one frame of animated values and the swipe
//! state into an ordered list of [`DrawOp`]s. It keeps no state and never
//! measures text: everything it needs was decided by the layout engine.
//!
//! Order, back to front:
//!
//! 1. the revealed swipe layer, clipped to the area the foreground uncovers
//!    (background, circular color wipe, action icon, label);
//! 2. the foreground translated by the swipe offset: background with
//!    animated corners, pinned/archive tint, selection overlay, divider,
//!    then avatar, title line and preview line content.

use super::primitives::{Color, DrawOp, IconKind, TextAlign};
use super::theme::Theme;
use crate::animation::{Easing, FrameSample, Interpolate, StatusGlyph, StatusLayer, CALL_WAVE_STAGES};
use crate::gesture::{reveal_radius, SwipeState};
use crate::layout::{LayoutResult, Rect, RowMetrics, TextBox, TextStyle, TitleBadge};
use crate::model::{LayoutDirection, RowContent, RowState, SwipeActionKind};

/// Smallest scale of the swipe action icon, right after the reveal starts.
const SWIPE_ICON_MIN_SCALE: f32 = 0.6;

/// Ring of background color drawn around presence indicators.
const PRESENCE_RING_PX: f32 = 2.0;

/// Everything one row frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Bound snapshot.
    pub state: &'a RowState,
    /// Geometry for the snapshot.
    pub layout: &'a LayoutResult,
    /// Animated values at the frame time.
    pub frame: &'a FrameSample,
    /// Swipe gesture state.
    pub swipe: &'a SwipeState,
    /// Fixed geometry the layout was computed with.
    pub metrics: &'a RowMetrics,
    /// Colors.
    pub theme: &'a Theme,
    /// Draw the selection overlay.
    pub selected: bool,
    /// The avatar image is loaded and can be drawn.
    pub avatar_ready: bool,
}

/// Produces the draw primitives of one row frame.
pub fn render_row(input: &RenderInput<'_>) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(40);
    let bounds = input.layout.bounds();

    if input.swipe.is_active() {
        if let Some(kind) = input.swipe.action {
            revealed_layer(input, kind, &bounds, &mut ops);
        }
    }

    let mut fg = Foreground {
        input,
        dx: input.swipe.offset_px,
        ops,
    };
    fg.backdrop(&bounds);
    fg.avatar();
    fg.title_line();
    fg.status_icon();
    fg.preview_line();
    fg.ops
}

fn revealed_layer(input: &RenderInput<'_>, kind: SwipeActionKind, bounds: &Rect, ops: &mut Vec<DrawOp>) {
    let area = input.swipe.revealed_area(bounds);
    if area.is_empty() {
        return;
    }
    let colors = input.theme.swipe(kind);
    let clip = Some(area);
    let icon = input.layout.swipe_icon;
    let progress = input.swipe.progress();

    ops.push(DrawOp::FillRect {
        rect: area,
        color: colors.background,
        corner_radius: 0.0,
        clip: None,
    });

    let radius = reveal_radius(icon.center(), bounds, progress);
    if radius > 0.0 {
        ops.push(DrawOp::FillCircle {
            center: icon.center(),
            radius,
            color: colors.reveal,
            clip,
        });
    }

    // The icon grows until the threshold and bounces as it gets there.
    let threshold = if input.swipe.row_width > 0.0 {
        input.swipe.commit_threshold_px / input.swipe.row_width
    } else {
        0.0
    };
    let arm = if threshold > 0.0 { (progress / threshold).min(1.0) } else { 1.0 };
    let scale = SWIPE_ICON_MIN_SCALE + (1.0 - SWIPE_ICON_MIN_SCALE) * Easing::Overshoot.apply(arm);
    ops.push(DrawOp::Icon {
        kind: IconKind::SwipeAction(kind),
        rect: icon,
        color: colors.foreground,
        alpha: 1.0,
        scale,
        clip,
    });
    ops.push(DrawOp::Text {
        rect: input.layout.swipe_label,
        text: kind.label().to_string(),
        style: TextStyle::SwipeLabel,
        color: colors.foreground,
        alpha: 1.0,
        scale: 1.0,
        align: TextAlign::Center,
        clip,
    });
}

struct Foreground<'i, 'a> {
    input: &'i RenderInput<'a>,
    dx: f32,
    ops: Vec<DrawOp>,
}

impl Foreground<'_, '_> {
    fn at(&self, rect: &Rect) -> Rect {
        rect.offset_x(self.dx)
    }

    fn fill(&mut self, rect: Rect, color: Color, corner_radius: f32) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color,
            corner_radius,
            clip: None,
        });
    }

    fn circle(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center: rect.center(),
            radius: rect.width.min(rect.height) / 2.0,
            color,
            clip: None,
        });
    }

    fn icon(&mut self, kind: IconKind, rect: Rect, color: Color, alpha: f32, scale: f32) {
        self.ops.push(DrawOp::Icon {
            kind,
            rect,
            color,
            alpha,
            scale,
            clip: None,
        });
    }

    fn text_box(&mut self, text: &TextBox, color: Color) {
        if text.run.text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            rect: self.at(&text.rect),
            text: text.run.text.clone(),
            style: text.style,
            color,
            alpha: 1.0,
            scale: 1.0,
            align: TextAlign::Left,
            clip: None,
        });
    }

    fn backdrop(&mut self, bounds: &Rect) {
        let RenderInput {
            state,
            layout,
            frame,
            metrics,
            theme,
            ..
        } = *self.input;
        let row = self.at(bounds);
        let radius = metrics.swipe_corner_radius * frame.corners.clamp(0.0, 1.0);
        self.fill(row, theme.background, radius);
        if state.pinned {
            self.fill(row, theme.pinned_tint, radius);
        } else if state.in_archive || matches!(state.content, RowContent::Promo) {
            self.fill(row, theme.archive_tint, radius);
        }
        if self.input.selected {
            self.fill(row, theme.selection, radius);
        }
        let divider = self.at(&layout.divider);
        self.fill(divider, theme.divider, 0.0);
    }

    fn avatar(&mut self) {
        let RenderInput {
            state,
            layout,
            frame,
            theme,
            ..
        } = *self.input;
        let avatar = self.at(&layout.avatar);
        match state.avatar_key.as_ref() {
            Some(key) if self.input.avatar_ready => self.ops.push(DrawOp::Image {
                key: key.clone(),
                rect: avatar,
            }),
            _ => {
                self.circle(avatar, theme.avatar_placeholder);
                let initial: String = state.title.chars().take(1).flat_map(char::to_uppercase).collect();
                if !initial.is_empty() {
                    self.ops.push(DrawOp::Text {
                        rect: avatar,
                        text: initial,
                        style: TextStyle::Title,
                        color: theme.avatar_initials,
                        alpha: 1.0,
                        scale: 1.0,
                        align: TextAlign::Center,
                        clip: None,
                    });
                }
            }
        }

        let call = frame.call.max(0.0);
        let online = frame.online.max(0.0) * (1.0 - call.min(1.0));
        if online > 0.0 {
            let dot = self.at(&layout.online_dot).scaled(online);
            self.circle(dot, theme.background);
            self.circle(shrink(dot, PRESENCE_RING_PX), theme.presence);
        }
        if call > 0.0 {
            let badge = self.at(&layout.call_indicator).scaled(call);
            self.circle(badge, theme.background);
            self.circle(shrink(badge, PRESENCE_RING_PX), theme.presence);
            let stage = ((frame.call_wave * CALL_WAVE_STAGES as f32) as u8).min(CALL_WAVE_STAGES as u8 - 1);
            self.icon(IconKind::CallWave(stage), badge, theme.pill_content, 1.0, 1.0);
        }
    }

    fn title_line(&mut self) {
        let RenderInput {
            state,
            layout,
            frame,
            theme,
            ..
        } = *self.input;
        let encrypted = matches!(state.content, RowContent::Encrypted);
        if let Some(lock) = layout.title_lock {
            self.icon(IconKind::Lock, self.at(&lock), theme.encrypted_title, 1.0, 1.0);
        }
        let title_color = if encrypted { theme.encrypted_title } else { theme.title };
        self.text_box(&layout.title, title_color);
        if let Some(slot) = layout.title_badge {
            let (kind, color) = match slot.badge {
                TitleBadge::Scam => (IconKind::Scam, theme.scam),
                TitleBadge::Verified => (IconKind::Verified, theme.icon),
                TitleBadge::Premium => (IconKind::Premium, theme.icon),
            };
            self.icon(kind, self.at(&slot.rect), color, 1.0, 1.0);
        }
        if frame.mute > 0.0 {
            self.icon(IconKind::Mute, self.at(&layout.mute_icon), theme.icon, frame.mute.min(1.0), 1.0);
        }
        if let Some(timestamp) = layout.timestamp.as_ref() {
            self.text_box(timestamp, theme.timestamp);
        }
    }

    fn status_icon(&mut self) {
        let RenderInput {
            layout,
            frame,
            metrics,
            theme,
            ..
        } = *self.input;
        let layers = frame.status.layers();
        if layers.is_empty() {
            return;
        }
        let slot = layout.status_icon;
        let glyph_w = metrics.status_icon_width;
        let offset = metrics.double_check_offset;
        let has_second = layers.iter().any(|l| l.glyph == StatusGlyph::SecondCheck);

        for StatusLayer {
            glyph,
            alpha,
            scale,
            slide,
        } in layers
        {
            if alpha <= 0.0 {
                continue;
            }
            // Distance of the glyph's trailing edge from the slot's trailing edge.
            let back = match glyph {
                StatusGlyph::Check if has_second => offset,
                StatusGlyph::SecondCheck => offset * slide.clamp(0.0, 1.0),
                _ => 0.0,
            };
            let rect = from_trailing(layout.direction, &slot, back, glyph_w);
            let kind = match glyph {
                StatusGlyph::Clock => IconKind::Clock,
                StatusGlyph::Check => IconKind::Check,
                StatusGlyph::SecondCheck => IconKind::SecondCheck,
            };
            self.icon(kind, self.at(&rect), theme.status, alpha.min(1.0), scale);
        }
    }

    fn preview_line(&mut self) {
        let RenderInput {
            state,
            layout,
            frame,
            metrics,
            theme,
            ..
        } = *self.input;

        if let Some(prefix) = layout.sender_prefix.as_ref() {
            let color = if state.draft { theme.draft } else { theme.sender };
            self.text_box(prefix, color);
        }
        self.text_box(&layout.preview, theme.preview);

        if let Some(badge) = layout.error_badge {
            let rect = self.at(&badge);
            self.circle(rect, theme.error);
            self.icon(IconKind::Error, rect, theme.pill_content, 1.0, 1.0);
        }

        self.counter_pill();

        // A collapsing counter still holds its slot; the other pills slide
        // toward the trailing edge as it shrinks.
        let collapsing = if layout.counter.is_none() {
            let presence = frame.counter.presence.clamp(0.0, 1.0);
            (self.collapsing_counter_width() + metrics.pill_gap) * presence
        } else {
            0.0
        };
        let dx = -layout.trailing_sign() * collapsing;

        let pill_color = |base: Color| base.interpolate(&theme.counter_muted, frame.mute);
        for (scale, pill, icon, color) in [
            (frame.mention, layout.mention.as_ref(), IconKind::Mention, pill_color(theme.mention)),
            (frame.reaction, layout.reaction.as_ref(), IconKind::Reaction, theme.reaction),
        ] {
            if scale <= 0.0 {
                continue;
            }
            let base = pill.map_or(layout.counter_anchor, |p| p.rect).offset_x(dx);
            let rect = self.at(&base).scaled(scale);
            self.fill(rect, color, rect.height / 2.0);
            let glyph = Rect::centered(rect.center(), metrics.icon_size * scale, metrics.icon_size * scale);
            self.icon(icon, glyph, theme.pill_content, 1.0, 1.0);
        }

        // The pin makes room for any badge popping in and comes back when
        // the last one leaves.
        let error = if layout.error_badge.is_some() { 1.0 } else { 0.0 };
        let occupied = [frame.counter.presence, frame.mention, frame.reaction, error]
            .into_iter()
            .fold(0.0f32, f32::max)
            .clamp(0.0, 1.0);
        let pin = frame.pin * (1.0 - occupied);
        if pin > 0.0 {
            self.icon(IconKind::Pin, self.at(&layout.pin_icon), theme.icon, 1.0, pin);
        }
    }

    /// Width of a counter pill that is leaving the layout.
    fn collapsing_counter_width(&self) -> f32 {
        let RenderInput {
            layout,
            frame,
            metrics,
            ..
        } = *self.input;
        frame
            .counter
            .from_text_width
            .map_or(layout.counter_anchor.width, |w| metrics.pill_width(w))
    }

    fn counter_pill(&mut self) {
        let RenderInput {
            layout,
            frame,
            metrics,
            theme,
            ..
        } = *self.input;
        let counter = &frame.counter;
        if counter.presence <= 0.0 {
            return;
        }

        let base = layout.counter.as_ref().map_or(layout.counter_anchor, |p| p.rect);
        let mut rect = base;
        let mut scale = counter.presence;
        match (counter.roll.as_ref(), counter.from_text_width) {
            (Some((_, roll)), from_text) => {
                if let Some(from_text) = from_text {
                    let from = metrics.pill_width(from_text);
                    let width = from + (base.width - from) * roll.width_t;
                    rect = layout.trailing_aligned(&base, width);
                }
                scale *= roll.scale;
            }
            // Collapsing keeps the width the pill had before it started.
            (None, Some(_)) if layout.counter.is_none() => {
                rect = layout.trailing_aligned(&base, self.collapsing_counter_width());
            }
            _ => {}
        }
        let placed = self.at(&rect);
        let mut pill = placed.scaled(scale);
        if layout.counter.is_none() {
            // Shrink toward the trailing edge so the pills sliding in behind
            // never cover it.
            pill.x = layout.trailing_aligned(&placed, pill.width).x;
        }
        let color = theme.counter.interpolate(&theme.counter_muted, frame.mute);
        self.fill(pill, color, pill.height / 2.0);

        let text = |text: &str, dy: f32, alpha: f32, clip: Option<Rect>| DrawOp::Text {
            rect: Rect::new(pill.x, pill.y + dy, pill.width, pill.height),
            text: text.to_string(),
            style: TextStyle::Counter,
            color: theme.pill_content,
            alpha,
            scale,
            align: TextAlign::Center,
            clip,
        };
        match counter.roll.as_ref() {
            Some((digits, roll)) => {
                let clip = Some(pill);
                let layers = [
                    (digits.stable.as_str(), 0.0, 1.0),
                    (digits.outgoing.as_str(), roll.outgoing_dy, roll.outgoing_alpha),
                    (digits.incoming.as_str(), roll.incoming_dy, roll.incoming_alpha),
                ];
                for (glyphs, dy, alpha) in layers {
                    if glyphs.trim().is_empty() || alpha <= 0.0 {
                        continue;
                    }
                    self.ops.push(text(glyphs, dy, alpha, clip));
                }
            }
            None if !counter.text.is_empty() => self.ops.push(text(&counter.text, 0.0, 1.0, None)),
            None => {}
        }
    }
}

fn shrink(rect: Rect, by: f32) -> Rect {
    Rect::centered(rect.center(), rect.width - 2.0 * by, rect.height - 2.0 * by)
}

/// A glyph of `width` whose trailing edge sits `back` pixels inside the
/// trailing edge of `slot`.
fn from_trailing(direction: LayoutDirection, slot: &Rect, back: f32, width: f32) -> Rect {
    let x = match direction {
        LayoutDirection::Ltr => slot.right() - back - width,
        LayoutDirection::Rtl => slot.x + back,
    };
    Rect::new(x, slot.y, width, slot.height)
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
