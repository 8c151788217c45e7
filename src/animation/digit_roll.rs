//! Per-glyph composition of a counter changing from one number to another.
//!
//! When both strings have the same length, positions whose digit is
//! unchanged go to the `stable` layer and never move; only differing
//! positions roll, the old glyph leaving through `outgoing` and the new one
//! arriving through `incoming`. Every layer keeps full string width, with
//! spaces at the positions it does not own, so the three layers can be drawn
//! at the same origin. Strings of different length cannot be aligned and
//! roll as a whole.

use super::easing::Easing;

/// Vertical distance a rolling glyph travels.
pub const ROLL_SLIDE_PX: f32 = 13.0;

/// Extra scale of the pill at the peak of an increment.
const INCREMENT_SCALE_BUMP: f32 = 0.1;

/// The three glyph layers of a counter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitRoll {
    /// Unchanged glyphs.
    pub stable: String,
    /// Old glyphs that leave.
    pub outgoing: String,
    /// New glyphs that arrive.
    pub incoming: String,
    /// The count went up.
    pub increment: bool,
    /// `false` when the strings had different lengths and roll as a whole.
    pub aligned: bool,
}

/// Offsets and alphas of the layers at one moment of the roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollFrame {
    /// Vertical offset of the outgoing layer.
    pub outgoing_dy: f32,
    /// Alpha of the outgoing layer.
    pub outgoing_alpha: f32,
    /// Vertical offset of the incoming layer.
    pub incoming_dy: f32,
    /// Alpha of the incoming layer.
    pub incoming_alpha: f32,
    /// Progress of the pill width from old to new, finished at the midpoint.
    pub width_t: f32,
    /// Scale applied to the pill.
    pub scale: f32,
}

/// Where an interrupted roll left the glyphs that are now leaving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollCarry {
    /// Vertical offset the glyphs had.
    pub dy: f32,
    /// Alpha the glyphs had.
    pub alpha: f32,
}

impl RollFrame {
    /// Starts the outgoing layer from `carry` instead of from rest.
    ///
    /// `progress` must be the value this frame was computed at.
    pub fn continuing(self, carry: RollCarry, progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        Self {
            outgoing_dy: carry.dy * (1.0 - p) + self.outgoing_dy,
            outgoing_alpha: carry.alpha * self.outgoing_alpha,
            ..self
        }
    }
}

impl DigitRoll {
    /// Splits a change from `old` to `new` into layers.
    pub fn split(old: &str, new: &str) -> Self {
        let increment = match (old.parse::<u64>(), new.parse::<u64>()) {
            (Ok(a), Ok(b)) => b > a,
            _ => new.chars().count() > old.chars().count(),
        };

        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        if old_chars.len() != new_chars.len() {
            return Self {
                stable: String::new(),
                outgoing: old.to_string(),
                incoming: new.to_string(),
                increment,
                aligned: false,
            };
        }

        let mut stable = String::with_capacity(new.len());
        let mut outgoing = String::with_capacity(old.len());
        let mut incoming = String::with_capacity(new.len());
        for (&o, &n) in old_chars.iter().zip(&new_chars) {
            if o == n {
                stable.push(n);
                outgoing.push(' ');
                incoming.push(' ');
            } else {
                stable.push(' ');
                outgoing.push(o);
                incoming.push(n);
            }
        }

        Self {
            stable,
            outgoing,
            incoming,
            increment,
            aligned: true,
        }
    }

    /// Character positions that animate.
    pub fn changed_positions(&self) -> Vec<usize> {
        if !self.aligned {
            return (0..self.incoming.chars().count().max(self.outgoing.chars().count())).collect();
        }
        self.incoming
            .chars()
            .enumerate()
            .filter(|(_, c)| *c != ' ')
            .map(|(i, _)| i)
            .collect()
    }

    /// Layer placement at eased `progress`.
    pub fn frame(&self, progress: f32) -> RollFrame {
        let p = progress.clamp(0.0, 1.0);
        let half = (p * 2.0).min(1.0);
        let direction = if self.increment { 1.0 } else { -1.0 };

        let scale = if self.increment {
            let bump = if p <= 0.5 {
                Easing::EaseOut.apply(p * 2.0)
            } else {
                Easing::EaseIn.apply(1.0 - (p - 0.5) * 2.0)
            };
            1.0 + INCREMENT_SCALE_BUMP * bump
        } else {
            1.0
        };

        RollFrame {
            outgoing_dy: -direction * ROLL_SLIDE_PX * p,
            outgoing_alpha: 1.0 - p,
            incoming_dy: direction * ROLL_SLIDE_PX * (1.0 - p),
            incoming_alpha: p,
            width_t: half,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_length_only_changed_digit_rolls() {
        let roll = DigitRoll::split("12", "15");
        assert!(roll.aligned);
        assert!(roll.increment);
        assert_eq!(roll.changed_positions(), vec![1]);
        insta::assert_debug_snapshot!(
            (roll.stable.as_str(), roll.outgoing.as_str(), roll.incoming.as_str()),
            @r#"
        (
            "1 ",
            " 2",
            " 5",
        )
        "#
        );
    }

    #[test]
    fn continuing_roll_starts_outgoing_where_it_was_left() {
        let roll = DigitRoll::split("15", "16");
        let carry = RollCarry { dy: 4.0, alpha: 0.7 };

        let start = roll.frame(0.0).continuing(carry, 0.0);
        assert_eq!(start.outgoing_dy, 4.0);
        assert_eq!(start.outgoing_alpha, 0.7);
        assert_eq!(start.incoming_alpha, 0.0);

        let end = roll.frame(1.0).continuing(carry, 1.0);
        assert_eq!(end, roll.frame(1.0));
    }

    #[test]
    fn different_length_falls_back_to_full_swap() {
        let roll = DigitRoll::split("8", "12");
        assert!(!roll.aligned);
        assert!(roll.increment);
        assert_eq!(roll.stable, "");
        assert_eq!(roll.outgoing, "8");
        assert_eq!(roll.incoming, "12");
    }

    #[test]
    fn decrement_reverses_direction() {
        let roll = DigitRoll::split("20", "19");
        assert!(!roll.increment);
        assert_eq!(roll.changed_positions(), vec![0, 1]);
        let frame = roll.frame(0.0);
        assert_eq!(frame.incoming_dy, -ROLL_SLIDE_PX);
        assert_eq!(frame.scale, 1.0);
    }

    #[test]
    fn frame_endpoints() {
        let roll = DigitRoll::split("3", "4");
        let start = roll.frame(0.0);
        assert_eq!(start.outgoing_alpha, 1.0);
        assert_eq!(start.incoming_alpha, 0.0);
        assert_eq!(start.incoming_dy, ROLL_SLIDE_PX);
        assert_eq!(start.width_t, 0.0);

        let end = roll.frame(1.0);
        assert_eq!(end.outgoing_alpha, 0.0);
        assert_eq!(end.incoming_alpha, 1.0);
        assert_eq!(end.incoming_dy, 0.0);
        assert_eq!(end.width_t, 1.0);
        assert!((end.scale - 1.0).abs() < 1e-4);
    }

    #[test]
    fn increment_bumps_scale_at_midpoint() {
        let roll = DigitRoll::split("3", "4");
        let mid = roll.frame(0.5);
        assert!((mid.scale - 1.1).abs() < 1e-4, "got {}", mid.scale);
        assert_eq!(mid.width_t, 1.0);
    }
}
