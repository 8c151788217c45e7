//! Decides which animated values start when a bound row changes.
//!
//! Each animated aspect of a row owns one named channel. A channel is
//! created the first time its fields change and is retargeted, never
//! recreated, for as long as the row keeps its identity. Rebinding to a
//! different identity clears the table so the next frame draws the new row
//! at rest.

use super::digit_roll::{DigitRoll, RollCarry, RollFrame};
use super::easing::Easing;
use super::status_icon::{StatusFrame, StatusIconMachine};
use super::value::{AnimatedValue, DigitText};
use crate::model::RowState;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of bar stages in the active-call indicator loop.
pub const CALL_WAVE_STAGES: u64 = 8;

/// Duration of one call indicator stage.
pub const CALL_WAVE_STAGE_MS: u64 = 400;

/// Named animated aspect of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Unread counter pill (presence, digits).
    Counter,
    /// Mention pill.
    Mention,
    /// Reaction pill.
    Reaction,
    /// Mute icon after the title.
    Mute,
    /// Pin icon.
    Pin,
    /// Online dot on the avatar.
    Online,
    /// Call indicator on the avatar.
    Call,
    /// Delivery icon.
    Status,
    /// Rounded corners of the swiped foreground.
    Corners,
}

impl Channel {
    /// Channels driven by row fields, in drawing order.
    pub const FIELD_DRIVEN: [Channel; 8] = [
        Channel::Counter,
        Channel::Mention,
        Channel::Reaction,
        Channel::Mute,
        Channel::Pin,
        Channel::Online,
        Channel::Call,
        Channel::Status,
    ];

    /// Returns `true` when a field this channel animates differs.
    pub fn fields_differ(self, old: &RowState, new: &RowState) -> bool {
        match self {
            Self::Counter => {
                old.unread_count != new.unread_count || old.marked_unread != new.marked_unread
            }
            Self::Mention => old.mention_count != new.mention_count,
            Self::Reaction => old.reaction_mention != new.reaction_mention,
            Self::Mute => old.muted != new.muted,
            Self::Pin => old.pinned != new.pinned,
            Self::Online => old.online != new.online,
            Self::Call => old.call_active != new.call_active,
            Self::Status => {
                old.send_state != new.send_state
                    || old.read_by_peer != new.read_by_peer
                    || old.status_icon() != new.status_icon()
            }
            Self::Corners => false,
        }
    }
}

/// What a started transition looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Element appears with overshoot.
    PopIn,
    /// Element collapses.
    Shrink,
    /// Counter digits roll.
    Roll,
    /// Element fades in.
    FadeIn,
    /// Element fades out.
    FadeOut,
    /// Delivery icon morph or cross-fade.
    Morph,
    /// A field changed without a visible effect; the channel keeps its
    /// current value.
    Refresh,
}

/// A channel (re)started by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartedTransition {
    /// Which channel.
    pub channel: Channel,
    /// Kind of motion.
    pub kind: TransitionKind,
    /// Duration of the new segment.
    pub duration_ms: u64,
    /// Curve of the new segment.
    pub easing: Easing,
}

/// Durations of every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Counter, mention and reaction pop-in.
    pub pop_ms: u64,
    /// Counter, mention and reaction collapse.
    pub shrink_ms: u64,
    /// Counter digit roll.
    pub roll_ms: u64,
    /// Pin icon appearing.
    pub toggle_in_ms: u64,
    /// Pin icon disappearing.
    pub toggle_out_ms: u64,
    /// Mute icon, online dot and call indicator fades.
    pub fade_ms: u64,
    /// Delivery icon morph.
    pub status_ms: u64,
    /// Rounded-corner progress of the swiped foreground.
    pub corner_ms: u64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            pop_ms: 220,
            shrink_ms: 150,
            roll_ms: 430,
            toggle_in_ms: 220,
            toggle_out_ms: 150,
            fade_ms: 150,
            status_ms: 220,
            corner_ms: 150,
        }
    }
}

/// Counter pill at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSample {
    /// Scale/visibility of the pill; 0 hidden, 1 shown, above 1 overshooting.
    pub presence: f32,
    /// Text drawn when not rolling.
    pub text: String,
    /// Glyph layers and their placement while digits roll.
    pub roll: Option<(DigitRoll, RollFrame)>,
    /// Pill text width before the roll started.
    pub from_text_width: Option<f32>,
}

/// Every animated value of a row sampled at one frame time.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    /// Frame time.
    pub now_ms: u64,
    /// Counter pill.
    pub counter: CounterSample,
    /// Mention pill scale.
    pub mention: f32,
    /// Reaction pill scale.
    pub reaction: f32,
    /// Mute icon alpha.
    pub mute: f32,
    /// Pin icon scale.
    pub pin: f32,
    /// Online dot scale.
    pub online: f32,
    /// Call indicator scale.
    pub call: f32,
    /// Position in the call indicator loop, `[0, 1)`.
    pub call_wave: f32,
    /// Rounded-corner progress of the swiped foreground.
    pub corners: f32,
    /// Delivery icon.
    pub status: StatusFrame,
}

impl FrameSample {
    /// Every value at rest for `state`.
    pub fn settled(state: &RowState, now_ms: u64) -> Self {
        Self {
            now_ms,
            counter: CounterSample {
                presence: flag(state.counter_visible()),
                text: state.counter_text(),
                roll: None,
                from_text_width: None,
            },
            mention: flag(state.mention_visible()),
            reaction: flag(state.reaction_mention),
            mute: flag(state.muted),
            pin: flag(state.pinned),
            online: flag(state.online),
            call: flag(state.call_active),
            call_wave: call_wave_phase(now_ms),
            corners: 0.0,
            status: StatusFrame::Static(state.status_icon()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CounterChannel {
    presence: AnimatedValue<f32>,
    text: AnimatedValue<DigitText>,
    roll: Option<(DigitRoll, AnimatedValue<f32>)>,
    carry: Option<RollCarry>,
    from_text_width: Option<f32>,
}

impl CounterChannel {
    /// Layer placement of the running roll at `now`.
    fn roll_frame(&self, now_ms: u64) -> Option<(&DigitRoll, RollFrame)> {
        let (roll, progress) = self.roll.as_ref()?;
        if progress.is_idle(now_ms) {
            return None;
        }
        let p = progress.progress(now_ms);
        let frame = roll.frame(p);
        Some((roll, self.carry.map_or(frame, |carry| frame.continuing(carry, p))))
    }
}

/// Owns the channel table of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCoordinator {
    timings: TransitionTimings,
    scalars: BTreeMap<Channel, AnimatedValue<f32>>,
    counter: Option<CounterChannel>,
    status: Option<StatusIconMachine>,
}

impl TransitionCoordinator {
    /// Creates an empty coordinator.
    pub fn new(timings: TransitionTimings) -> Self {
        Self {
            timings,
            scalars: BTreeMap::new(),
            counter: None,
            status: None,
        }
    }

    /// Durations in use.
    pub fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    /// Starts or retargets the channels whose fields differ between `old`
    /// and `new`.
    ///
    /// Snapshots of different identities are not animated: the table is
    /// cleared and nothing is returned.
    pub fn on_state_changed(
        &mut self,
        old: &RowState,
        new: &RowState,
        now_ms: u64,
    ) -> Vec<StartedTransition> {
        if old.id != new.id {
            self.reset();
            return Vec::new();
        }

        let mut started = Vec::new();
        for channel in Channel::FIELD_DRIVEN {
            if !channel.fields_differ(old, new) {
                continue;
            }
            let transition = match channel {
                Channel::Counter => self.start_counter(old, new, now_ms),
                Channel::Status => self.start_status(old, new, now_ms),
                _ => self.start_scalar(channel, old, new, now_ms),
            };
            debug!(
                row = %new.id,
                ?channel,
                kind = ?transition.kind,
                duration_ms = transition.duration_ms,
                "transition started"
            );
            started.push(transition);
        }
        started
    }

    /// Animates the foreground corners toward rounded (`active`) or square.
    pub fn on_swipe_activity(&mut self, active: bool, now_ms: u64) -> Option<StartedTransition> {
        let target = flag(active);
        let value = self
            .scalars
            .entry(Channel::Corners)
            .or_insert_with(|| AnimatedValue::settled(0.0));
        if *value.to() == target {
            return None;
        }
        let duration_ms = self.timings.corner_ms;
        value.retarget(target, now_ms, duration_ms, Easing::Linear);
        Some(StartedTransition {
            channel: Channel::Corners,
            kind: if active { TransitionKind::FadeIn } else { TransitionKind::FadeOut },
            duration_ms,
            easing: Easing::Linear,
        })
    }

    /// Records the counter text width the running roll or collapse started
    /// from.
    pub fn set_counter_origin_width(&mut self, width: f32) {
        if let Some(counter) = self.counter.as_mut() {
            counter.from_text_width = Some(width);
        }
    }

    /// Cancels everything; the next sample is at rest.
    pub fn reset(&mut self) {
        self.scalars.clear();
        self.counter = None;
        self.status = None;
    }

    /// Advances every value to `now`.
    pub fn tick(&mut self, now_ms: u64) {
        for value in self.scalars.values_mut() {
            value.tick(now_ms);
        }
        if let Some(counter) = self.counter.as_mut() {
            counter.presence.tick(now_ms);
            counter.text.tick(now_ms);
            if counter.roll.as_ref().is_some_and(|(_, p)| p.is_idle(now_ms)) {
                counter.roll = None;
                counter.carry = None;
                counter.from_text_width = None;
            }
        }
        if let Some(status) = self.status.as_mut() {
            status.advance(now_ms);
        }
    }

    /// Returns `true` while any value is moving at `now`.
    pub fn is_animating(&self, state: &RowState, now_ms: u64) -> bool {
        state.call_active
            || self.scalars.values().any(|v| !v.is_idle(now_ms))
            || self.counter.as_ref().is_some_and(|c| {
                !c.presence.is_idle(now_ms)
                    || c.roll.as_ref().is_some_and(|(_, p)| !p.is_idle(now_ms))
            })
            || self.status.as_ref().is_some_and(|s| s.is_animating(now_ms))
    }

    /// Number of channels created so far.
    pub fn channel_count(&self) -> usize {
        self.scalars.len()
            + usize::from(self.counter.is_some())
            + usize::from(self.status.is_some())
    }

    /// Samples every channel at `now`, using `state` for channels that
    /// never started.
    pub fn sample(&self, state: &RowState, now_ms: u64) -> FrameSample {
        let mut frame = FrameSample::settled(state, now_ms);
        let scalar = |channel: Channel, fallback: f32| {
            self.scalars
                .get(&channel)
                .map_or(fallback, |v| v.value_at(now_ms))
        };
        frame.mention = scalar(Channel::Mention, frame.mention);
        frame.reaction = scalar(Channel::Reaction, frame.reaction);
        frame.mute = scalar(Channel::Mute, frame.mute);
        frame.pin = scalar(Channel::Pin, frame.pin);
        frame.online = scalar(Channel::Online, frame.online);
        frame.call = scalar(Channel::Call, frame.call);
        frame.corners = scalar(Channel::Corners, frame.corners);

        if let Some(counter) = self.counter.as_ref() {
            frame.counter.presence = counter.presence.value_at(now_ms);
            frame.counter.text = counter.text.to().0.clone();
            if counter.presence.to() <= &0.0 {
                // Collapsing: keep the text and width that were shown.
                frame.counter.text = counter.text.value_at(now_ms).0;
                if !counter.presence.is_idle(now_ms) {
                    frame.counter.from_text_width = counter.from_text_width;
                }
            }
            if let Some((roll, placement)) = counter.roll_frame(now_ms) {
                frame.counter.roll = Some((roll.clone(), placement));
                frame.counter.from_text_width = counter.from_text_width;
            }
        }

        if let Some(status) = self.status.as_ref() {
            frame.status = status.frame(now_ms);
        }
        frame
    }

    fn start_counter(&mut self, old: &RowState, new: &RowState, now_ms: u64) -> StartedTransition {
        let timings = &self.timings;
        let counter = self.counter.get_or_insert_with(|| CounterChannel {
            presence: AnimatedValue::settled(flag(old.counter_visible())),
            text: AnimatedValue::settled(DigitText(old.counter_text())),
            roll: None,
            carry: None,
            from_text_width: None,
        });

        let old_text = counter.text.value_at(now_ms);
        let new_text = DigitText(new.counter_text());

        let (kind, duration_ms, easing) = if !new.counter_visible() {
            // Text stays on the old value while the pill collapses.
            counter.presence.retarget(0.0, now_ms, timings.shrink_ms, Easing::EaseOut);
            counter.roll = None;
            counter.carry = None;
            counter.from_text_width = None;
            (TransitionKind::Shrink, timings.shrink_ms, Easing::EaseOut)
        } else if !old.counter_visible() || old.unread_count == 0 {
            counter.text.snap_to(new_text);
            counter.roll = None;
            counter.carry = None;
            counter.presence.retarget(1.0, now_ms, timings.pop_ms, Easing::Overshoot);
            (TransitionKind::PopIn, timings.pop_ms, Easing::Overshoot)
        } else if old.unread_count == new.unread_count {
            // Only the manual unread mark changed under a visible count.
            (TransitionKind::Refresh, 0, Easing::Linear)
        } else {
            // An interrupted roll hands its visible glyphs to the new
            // outgoing layer instead of snapping them to rest.
            let carry = counter.roll_frame(now_ms).map(|(_, frame)| {
                if old_text == *counter.text.to() {
                    RollCarry {
                        dy: frame.incoming_dy,
                        alpha: frame.incoming_alpha,
                    }
                } else {
                    RollCarry {
                        dy: frame.outgoing_dy,
                        alpha: frame.outgoing_alpha,
                    }
                }
            });
            let roll = DigitRoll::split(old_text.as_str(), new_text.as_str());
            let mut progress = AnimatedValue::settled(0.0);
            progress.retarget(1.0, now_ms, timings.roll_ms, Easing::EaseInOut);
            counter.text.retarget(new_text, now_ms, timings.roll_ms, Easing::EaseInOut);
            counter.presence.retarget(1.0, now_ms, timings.roll_ms, Easing::EaseInOut);
            counter.roll = Some((roll, progress));
            counter.carry = carry;
            counter.from_text_width = None;
            (TransitionKind::Roll, timings.roll_ms, Easing::EaseInOut)
        };

        StartedTransition {
            channel: Channel::Counter,
            kind,
            duration_ms,
            easing,
        }
    }

    fn start_status(&mut self, old: &RowState, new: &RowState, now_ms: u64) -> StartedTransition {
        let duration_ms = self.timings.status_ms;
        let machine = self
            .status
            .get_or_insert_with(|| StatusIconMachine::new(old.status_icon(), duration_ms, Easing::Standard));
        machine.set_target(new.status_icon(), now_ms);
        StartedTransition {
            channel: Channel::Status,
            kind: TransitionKind::Morph,
            duration_ms,
            easing: Easing::Standard,
        }
    }

    fn start_scalar(
        &mut self,
        channel: Channel,
        old: &RowState,
        new: &RowState,
        now_ms: u64,
    ) -> StartedTransition {
        let (before, after) = match channel {
            Channel::Mention => (old.mention_visible(), new.mention_visible()),
            Channel::Reaction => (old.reaction_mention, new.reaction_mention),
            Channel::Mute => (old.muted, new.muted),
            Channel::Pin => (old.pinned, new.pinned),
            Channel::Online => (old.online, new.online),
            Channel::Call => (old.call_active, new.call_active),
            Channel::Counter | Channel::Status | Channel::Corners => (false, false),
        };
        let t = &self.timings;
        if before == after {
            // Mention count changed while the pill stays visible.
            return StartedTransition {
                channel,
                kind: TransitionKind::Refresh,
                duration_ms: 0,
                easing: Easing::Linear,
            };
        }
        let (kind, duration_ms, easing) = match channel {
            Channel::Mention | Channel::Reaction if after => (TransitionKind::PopIn, t.pop_ms, Easing::Overshoot),
            Channel::Mention | Channel::Reaction => (TransitionKind::Shrink, t.shrink_ms, Easing::EaseOut),
            Channel::Pin if after => (TransitionKind::PopIn, t.toggle_in_ms, Easing::Overshoot),
            Channel::Pin => (TransitionKind::Shrink, t.toggle_out_ms, Easing::EaseOut),
            _ if after => (TransitionKind::FadeIn, t.fade_ms, Easing::Linear),
            _ => (TransitionKind::FadeOut, t.fade_ms, Easing::Linear),
        };

        let value = self
            .scalars
            .entry(channel)
            .or_insert_with(|| AnimatedValue::settled(flag(before)));
        value.retarget(flag(after), now_ms, duration_ms, easing);

        StartedTransition {
            channel,
            kind,
            duration_ms,
            easing,
        }
    }
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::new(TransitionTimings::default())
    }
}

/// Position in the looping call indicator animation.
pub fn call_wave_phase(now_ms: u64) -> f32 {
    let period = CALL_WAVE_STAGES * CALL_WAVE_STAGE_MS;
    (now_ms % period) as f32 / period as f32
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
