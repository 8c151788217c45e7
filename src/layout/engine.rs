//! Row layout.
//!
//! Space is allocated in a fixed priority order:
//!
//! 1. the leading avatar (fixed size),
//! 2. trailing badges on the preview line (error badge, or counter, mention
//!    and reaction pills, then the pin icon), sized to their content,
//! 3. the timestamp and delivery icon on the title line,
//! 4. whatever remains goes to the title and the preview, ellipsized.
//!
//! Everything is computed with `x = 0` at the leading edge and mirrored to
//! absolute coordinates at the very end, so left-to-right and right-to-left
//! rows share one code path.
//!
//! Layout is a pure function of its inputs: the same state, width and
//! direction always produce an identical [`LayoutResult`].

use super::geometry::{non_negative, Point, Rect};
use super::metrics::RowMetrics;
use super::text_measure::{MeasureError, TextMeasurer, TextRun, TextStyle};
use crate::model::{LayoutDirection, RowContent, RowState, StatusIcon};
use std::rc::Rc;
use tracing::warn;

/// Draft label used when none is configured.
pub const DEFAULT_DRAFT_LABEL: &str = "Draft";

/// A positioned, measured piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    /// Box the text is drawn into. Width equals the run width.
    pub rect: Rect,
    /// Text after ellipsizing.
    pub run: TextRun,
    /// Style used for measuring and drawing.
    pub style: TextStyle,
    /// `true` when measurement failed and the run is a plain-text fallback.
    pub fallback: bool,
}

/// A rounded badge with optional text.
#[derive(Debug, Clone, PartialEq)]
pub struct Pill {
    /// Outer bounds.
    pub rect: Rect,
    /// Text drawn centered in the pill.
    pub text: String,
    /// Measured width of `text`.
    pub text_width: f32,
}

/// Account badge drawn right after the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleBadge {
    /// Scam warning; wins over every other badge.
    Scam,
    /// Verified checkmark.
    Verified,
    /// Premium star.
    Premium,
}

impl TitleBadge {
    /// Picks the badge shown for `state`, if any.
    pub fn for_state(state: &RowState) -> Option<Self> {
        if state.scam {
            Some(Self::Scam)
        } else if state.verified {
            Some(Self::Verified)
        } else if state.premium {
            Some(Self::Premium)
        } else {
            None
        }
    }
}

/// A title badge and where it goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeSlot {
    /// Which badge.
    pub badge: TitleBadge,
    /// Icon bounds.
    pub rect: Rect,
}

/// Tappable area covering a link inside the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRegion {
    /// Hit area.
    pub rect: Rect,
    /// Target handed to the action delegate.
    pub target: String,
}

/// Immutable geometry of one row.
///
/// Optional elements that animate in and out (mute icon, pin icon, counter,
/// delivery icon) always get an anchor, even when absent from the state,
/// so that a fading element can be drawn where it used to be.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Row width the layout was computed for.
    pub width: f32,
    /// Row height including the divider.
    pub height: f32,
    /// Direction the layout was mirrored for.
    pub direction: LayoutDirection,
    /// Avatar circle bounds.
    pub avatar: Rect,
    /// Online dot bounds, at the avatar's bottom trailing corner.
    pub online_dot: Rect,
    /// Call indicator bounds, at the same corner.
    pub call_indicator: Rect,
    /// Lock icon before the title of encrypted conversations.
    pub title_lock: Option<Rect>,
    /// Title text.
    pub title: TextBox,
    /// Account badge after the title.
    pub title_badge: Option<BadgeSlot>,
    /// Mute icon anchor after the title (and badge).
    pub mute_icon: Rect,
    /// Whether space for the mute icon was reserved.
    pub mute_reserved: bool,
    /// Timestamp text; absent for folders and empty labels.
    pub timestamp: Option<TextBox>,
    /// Delivery icon slot; zero-width when no icon is shown.
    pub status_icon: Rect,
    /// Sender or draft prefix before the preview.
    pub sender_prefix: Option<TextBox>,
    /// Preview text.
    pub preview: TextBox,
    /// Link hit areas inside the visible part of the preview.
    pub links: Vec<LinkRegion>,
    /// Unread counter pill.
    pub counter: Option<Pill>,
    /// Minimum-width counter pill at the counter's trailing edge.
    pub counter_anchor: Rect,
    /// Mention pill.
    pub mention: Option<Pill>,
    /// Reaction pill.
    pub reaction: Option<Pill>,
    /// Failed-send badge.
    pub error_badge: Option<Rect>,
    /// Pin icon anchor.
    pub pin_icon: Rect,
    /// Whether space for the pin icon was reserved.
    pub pin_reserved: bool,
    /// Swipe action icon bounds in the revealed layer.
    pub swipe_icon: Rect,
    /// Swipe label bounds under the icon.
    pub swipe_label: Rect,
    /// Divider line under the content.
    pub divider: Rect,
}

impl LayoutResult {
    /// Full row bounds without the divider.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height - self.divider.height)
    }

    /// A rectangle of `width` sharing `anchor`'s trailing edge.
    ///
    /// Used by the renderer to draw a pill whose width animates while its
    /// trailing edge stays put.
    pub fn trailing_aligned(&self, anchor: &Rect, width: f32) -> Rect {
        match self.direction {
            LayoutDirection::Ltr => Rect::new(anchor.right() - width, anchor.y, width, anchor.height),
            LayoutDirection::Rtl => Rect::new(anchor.x, anchor.y, width, anchor.height),
        }
    }

    /// Sign of a horizontal step from leading toward trailing.
    pub fn trailing_sign(&self) -> f32 {
        match self.direction {
            LayoutDirection::Ltr => 1.0,
            LayoutDirection::Rtl => -1.0,
        }
    }

    fn mirror(mut self) -> Self {
        let w = self.width;
        let flip = |r: &mut Rect| *r = r.mirrored(w);
        flip(&mut self.avatar);
        flip(&mut self.online_dot);
        flip(&mut self.call_indicator);
        if let Some(lock) = self.title_lock.as_mut() {
            flip(lock);
        }
        flip(&mut self.title.rect);
        if let Some(slot) = self.title_badge.as_mut() {
            flip(&mut slot.rect);
        }
        flip(&mut self.mute_icon);
        if let Some(ts) = self.timestamp.as_mut() {
            flip(&mut ts.rect);
        }
        flip(&mut self.status_icon);
        if let Some(prefix) = self.sender_prefix.as_mut() {
            flip(&mut prefix.rect);
        }
        flip(&mut self.preview.rect);
        for link in &mut self.links {
            flip(&mut link.rect);
        }
        for pill in [&mut self.counter, &mut self.mention, &mut self.reaction]
            .into_iter()
            .flatten()
        {
            flip(&mut pill.rect);
        }
        flip(&mut self.counter_anchor);
        if let Some(err) = self.error_badge.as_mut() {
            flip(err);
        }
        flip(&mut self.pin_icon);
        flip(&mut self.swipe_icon);
        flip(&mut self.swipe_label);
        flip(&mut self.divider);
        self.direction = LayoutDirection::Rtl;
        self
    }
}

/// Inputs that affect [`LayoutEngine::layout`].
///
/// Two binds with equal keys share one layout; presence state and the avatar
/// image never force a relayout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutKey {
    width_bits: u32,
    direction: LayoutDirection,
    state: RowState,
}

impl LayoutKey {
    /// Builds the key for a layout request.
    pub fn new(state: &RowState, max_width: f32, direction: LayoutDirection) -> Self {
        let mut structural = state.clone();
        structural.id = Default::default();
        structural.online = false;
        structural.call_active = false;
        structural.avatar_key = None;
        structural.direction = direction;
        Self {
            width_bits: sanitize_width(max_width).to_bits(),
            direction,
            state: structural,
        }
    }
}

/// Computes [`LayoutResult`]s through a host-provided [`TextMeasurer`].
#[derive(Clone)]
pub struct LayoutEngine {
    measurer: Rc<dyn TextMeasurer>,
    metrics: RowMetrics,
    draft_label: String,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("metrics", &self.metrics)
            .field("draft_label", &self.draft_label)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Creates an engine.
    pub fn new(measurer: Rc<dyn TextMeasurer>, metrics: RowMetrics) -> Self {
        Self {
            measurer,
            metrics,
            draft_label: DEFAULT_DRAFT_LABEL.to_string(),
        }
    }

    /// Replaces the label used as the prefix of draft previews.
    pub fn with_draft_label(mut self, label: impl Into<String>) -> Self {
        self.draft_label = label.into();
        self
    }

    /// Fixed geometry.
    pub fn metrics(&self) -> &RowMetrics {
        &self.metrics
    }

    /// The measurer used for every text element.
    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Row height for any width.
    pub fn height(&self) -> f32 {
        self.metrics.total_height()
    }

    /// Lays out `state` in a row of `max_width` pixels.
    ///
    /// Never fails: a negative or non-finite width is treated as zero, and a
    /// text element whose measurement fails falls back to unstyled plain text.
    pub fn layout(
        &self,
        state: &RowState,
        max_width: f32,
        direction: LayoutDirection,
    ) -> LayoutResult {
        let m = &self.metrics;
        let width = sanitize_width(max_width);

        let avatar = Rect::new(m.avatar_start, m.avatar_top, m.avatar_size, m.avatar_size);
        let presence_center = Point::new(
            avatar.right() - m.presence_inset,
            avatar.bottom() - m.presence_inset,
        );

        // Preview line, trailing badges first.
        let mut trailing = width - m.pill_end_inset;
        let min_pill = m.pill_width(0.0);
        let counter_anchor = Rect::new(trailing - min_pill, m.pill_top, min_pill, m.pill_height);
        let mut counter = None;
        let mut mention = None;
        let mut reaction = None;
        let mut error_badge = None;

        if state.shows_error() {
            error_badge = Some(Rect::new(
                trailing - m.pill_height,
                m.pill_top,
                m.pill_height,
                m.pill_height,
            ));
            trailing -= m.pill_height + m.pill_gap;
        } else {
            if state.counter_visible() {
                let pill = self.pill(state.counter_text(), trailing);
                trailing = pill.rect.x - m.pill_gap;
                counter = Some(pill);
            }
            if state.mention_visible() {
                let pill = self.pill("@".to_string(), trailing);
                trailing = pill.rect.x - m.pill_gap;
                mention = Some(pill);
            }
            if state.reaction_mention {
                let pill = self.pill(String::new(), trailing);
                trailing = pill.rect.x - m.pill_gap;
                reaction = Some(pill);
            }
        }

        let any_badge = error_badge.is_some() || counter.is_some() || mention.is_some() || reaction.is_some();
        let pin_icon = Rect::new(
            trailing - m.icon_size,
            m.pill_top + (m.pill_height - m.icon_size) / 2.0,
            m.icon_size,
            m.icon_size,
        );
        let pin_reserved = state.pinned && !any_badge;
        if pin_reserved {
            trailing = pin_icon.x - m.pill_gap;
        }
        let preview_end = trailing.min(width - m.end_padding);

        // Title line: timestamp and delivery icon.
        let time_end = width - m.timestamp_end_inset;
        let timestamp = if state.content.is_folder() || state.timestamp_label.is_empty() {
            None
        } else {
            let (run, fallback) =
                self.fit(&state.timestamp_label, TextStyle::Timestamp, non_negative(time_end - m.content_start), 1);
            Some(TextBox {
                rect: Rect::new(time_end - run.width, m.timestamp_top, run.width, m.line_height),
                run,
                style: TextStyle::Timestamp,
                fallback,
            })
        };
        let cursor = timestamp.as_ref().map_or(time_end, |ts| ts.rect.x);
        let status_width = match state.status_icon() {
            StatusIcon::None => 0.0,
            StatusIcon::Clock | StatusIcon::SingleCheck => m.status_icon_width,
            StatusIcon::DoubleCheck => m.status_icon_width + m.double_check_offset,
        };
        let status_icon = Rect::new(
            cursor - m.status_gap - status_width,
            m.title_top + (m.line_height - m.icon_size) / 2.0,
            status_width,
            m.icon_size,
        );
        let title_end = if status_width > 0.0 {
            status_icon.x - m.status_gap
        } else {
            cursor - m.status_gap
        }
        .min(width - m.end_padding);

        // Title with lock, badge, and mute icon.
        let icon_top = m.title_top + (m.line_height - m.icon_size) / 2.0;
        let mut title_x = m.content_start;
        let title_lock = if matches!(state.content, RowContent::Encrypted) {
            let lock = Rect::new(title_x, icon_top, m.icon_size, m.icon_size);
            title_x = lock.right() + m.icon_gap;
            Some(lock)
        } else {
            None
        };
        let badge = TitleBadge::for_state(state);
        let icon_step = m.icon_gap + m.icon_size;
        let mut reserved = 0.0;
        if badge.is_some() {
            reserved += icon_step;
        }
        if state.muted {
            reserved += icon_step;
        }
        let title_budget = non_negative(title_end - title_x - reserved);
        let (title_run, title_fallback) = self.fit(&state.title, TextStyle::Title, title_budget, 1);
        let title = TextBox {
            rect: Rect::new(title_x, m.title_top, title_run.width, m.line_height),
            run: title_run,
            style: TextStyle::Title,
            fallback: title_fallback,
        };
        let mut after_title = title.rect.right();
        let title_badge = badge.map(|badge| {
            let rect = Rect::new(after_title + m.icon_gap, icon_top, m.icon_size, m.icon_size);
            after_title = rect.right();
            BadgeSlot { badge, rect }
        });
        let mute_icon = Rect::new(after_title + m.icon_gap, icon_top, m.icon_size, m.icon_size);

        // Preview with sender or draft prefix.
        let mut preview_x = m.content_start;
        let preview_budget = non_negative(preview_end - preview_x);
        let prefix_text = if state.draft {
            Some(format!("{}: ", self.draft_label))
        } else {
            state
                .sender_prefix
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| format!("{p}: "))
        };
        let sender_prefix = prefix_text.map(|text| {
            let (run, fallback) = self.fit(&text, TextStyle::SenderPrefix, preview_budget / 2.0, 1);
            let rect = Rect::new(preview_x, m.preview_top, run.width, m.line_height);
            preview_x = rect.right();
            TextBox {
                rect,
                run,
                style: TextStyle::SenderPrefix,
                fallback,
            }
        });
        let preview_text = single_line(&state.preview);
        let (preview_run, preview_fallback) = self.fit(
            &preview_text,
            TextStyle::Preview,
            non_negative(preview_end - preview_x),
            1,
        );
        let preview = TextBox {
            rect: Rect::new(preview_x, m.preview_top, preview_run.width, m.line_height),
            run: preview_run,
            style: TextStyle::Preview,
            fallback: preview_fallback,
        };
        let links = self.link_regions(state, &preview_text, &preview);

        // Revealed layer.
        let swipe_center = Point::new(
            width - m.swipe_icon_end_inset,
            m.swipe_icon_top + m.swipe_icon_size / 2.0,
        );
        let swipe_icon = Rect::centered(swipe_center, m.swipe_icon_size, m.swipe_icon_size);
        let swipe_label = Rect::new(
            swipe_center.x - m.swipe_label_max_width / 2.0,
            m.swipe_label_top,
            m.swipe_label_max_width,
            m.line_height,
        );

        let result = LayoutResult {
            width,
            height: m.total_height(),
            direction: LayoutDirection::Ltr,
            avatar,
            online_dot: Rect::centered(presence_center, m.online_dot_size, m.online_dot_size),
            call_indicator: Rect::centered(presence_center, m.call_indicator_size, m.call_indicator_size),
            title_lock,
            title,
            title_badge,
            mute_icon,
            mute_reserved: state.muted,
            timestamp,
            status_icon,
            sender_prefix,
            preview,
            links,
            counter,
            counter_anchor,
            mention,
            reaction,
            error_badge,
            pin_icon,
            pin_reserved,
            swipe_icon,
            swipe_label,
            divider: Rect::new(
                m.content_start,
                m.row_height,
                non_negative(width - m.content_start),
                m.divider_height,
            ),
        };

        match direction {
            LayoutDirection::Ltr => result,
            LayoutDirection::Rtl => result.mirror(),
        }
    }

    /// Width of `text`, falling back to a fixed advance per character.
    pub fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        match self.measurer.measure(text, style).and_then(check_width) {
            Ok(w) => w,
            Err(err) => {
                warn!(%err, ?style, "text measurement failed, using fallback width");
                text.chars().count() as f32 * self.metrics.fallback_char_width
            }
        }
    }

    fn pill(&self, text: String, trailing: f32) -> Pill {
        let text_width = if text.is_empty() {
            0.0
        } else {
            self.text_width(&text, TextStyle::Counter)
        };
        let width = self.metrics.pill_width(text_width);
        Pill {
            rect: Rect::new(trailing - width, self.metrics.pill_top, width, self.metrics.pill_height),
            text,
            text_width,
        }
    }

    fn fit(&self, text: &str, style: TextStyle, max_width: f32, max_lines: u8) -> (TextRun, bool) {
        let result = self
            .measurer
            .ellipsize(text, style, max_width, max_lines)
            .and_then(|run| check_width(run.width).map(|_| run));
        match result {
            Ok(mut run) => {
                run.width = run.width.min(max_width);
                (run, false)
            }
            Err(err) => {
                warn!(%err, ?style, "ellipsize failed, drawing plain-text fallback");
                (fallback_run(text, max_width, self.metrics.fallback_char_width), true)
            }
        }
    }

    fn link_regions(&self, state: &RowState, text: &str, preview: &TextBox) -> Vec<LinkRegion> {
        if state.links.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = text.chars().collect();
        let mut visible = preview.run.text.chars().count();
        if preview.run.truncated && visible > 0 {
            visible -= 1;
        }
        let visible = visible.min(chars.len());

        state
            .links
            .iter()
            .filter(|link| link.start < link.end && link.start < visible)
            .map(|link| {
                let end = link.end.min(visible);
                let before: String = chars[..link.start].iter().collect();
                let inside: String = chars[link.start..end].iter().collect();
                let x = preview.rect.x + self.text_width(&before, TextStyle::Preview);
                let w = self.text_width(&inside, TextStyle::Preview);
                let right = (x + w).min(preview.rect.right());
                LinkRegion {
                    rect: Rect::new(x, preview.rect.y, right - x, preview.rect.height),
                    target: link.target.clone(),
                }
            })
            .collect()
    }
}

fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

fn check_width(width: f32) -> Result<f32, MeasureError> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(MeasureError::InvalidWidth(width))
    }
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect()
}

/// Plain-text run cut at a fixed advance per character, without an ellipsis.
fn fallback_run(text: &str, max_width: f32, advance: f32) -> TextRun {
    let max_width = non_negative(max_width);
    let capacity = if advance > 0.0 {
        (max_width / advance).floor() as usize
    } else {
        0
    };
    let total = text.chars().count();
    let kept: String = text.chars().take(capacity).collect();
    let count = kept.chars().count();
    TextRun {
        width: (count as f32 * advance).min(max_width),
        truncated: count < total,
        lines: u8::from(count > 0),
        text: kept,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
