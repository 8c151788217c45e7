//! Tests for the transition coordinator.

use super::*;
use crate::animation::status_icon::StatusFrame;
use crate::model::{RowId, SendState, StatusIcon};

fn row(unread: u32) -> RowState {
    RowState {
        title: "Alice".to_string(),
        unread_count: unread,
        ..RowState::new(RowId::new(1))
    }
}

fn kinds(started: &[StartedTransition]) -> Vec<(Channel, TransitionKind)> {
    started.iter().map(|t| (t.channel, t.kind)).collect()
}

mod counter_tests {
    use super::*;

    #[test]
    fn identical_rebind_starts_nothing() {
        let mut c = TransitionCoordinator::default();
        assert!(c.on_state_changed(&row(3), &row(3), 0).is_empty());
        assert_eq!(c.channel_count(), 0);
    }

    #[test]
    fn zero_to_n_pops_in_with_overshoot() {
        let mut c = TransitionCoordinator::default();
        let started = c.on_state_changed(&row(0), &row(5), 0);
        assert_eq!(
            started,
            vec![StartedTransition {
                channel: Channel::Counter,
                kind: TransitionKind::PopIn,
                duration_ms: 220,
                easing: Easing::Overshoot,
            }]
        );

        let mid = c.sample(&row(5), 110);
        assert_eq!(mid.counter.text, "5");
        assert!(mid.counter.presence > 1.0, "overshooting, got {}", mid.counter.presence);
        assert_eq!(c.sample(&row(5), 220).counter.presence, 1.0);
    }

    #[test]
    fn shrink_retargets_from_current_value_and_keeps_old_text() {
        let mut c = TransitionCoordinator::default();
        c.on_state_changed(&row(0), &row(5), 0);
        let started = c.on_state_changed(&row(5), &row(0), 110);
        assert_eq!(kinds(&started), vec![(Channel::Counter, TransitionKind::Shrink)]);
        assert_eq!(started[0].duration_ms, 150);

        let just_after = c.sample(&row(0), 110);
        assert!(just_after.counter.presence > 1.0);
        assert_eq!(just_after.counter.text, "5");

        let done = c.sample(&row(0), 260);
        assert_eq!(done.counter.presence, 0.0);
    }

    #[test]
    fn n_to_m_rolls_only_changed_digits() {
        let mut c = TransitionCoordinator::default();
        let started = c.on_state_changed(&row(12), &row(15), 0);
        assert_eq!(kinds(&started), vec![(Channel::Counter, TransitionKind::Roll)]);
        assert_eq!(started[0].duration_ms, 430);
        assert_eq!(started[0].easing, Easing::EaseInOut);

        let frame = c.sample(&row(15), 100);
        let (roll, placement) = frame.counter.roll.expect("rolling");
        assert_eq!(roll.stable, "1 ");
        assert_eq!(roll.incoming, " 5");
        assert!(placement.incoming_alpha > 0.0 && placement.incoming_alpha < 1.0);

        assert!(c.sample(&row(15), 430).counter.roll.is_none());
    }

    #[test]
    fn mark_unread_pops_in_empty_pill() {
        let mut c = TransitionCoordinator::default();
        let marked = RowState {
            marked_unread: true,
            ..row(0)
        };
        let started = c.on_state_changed(&row(0), &marked, 0);
        assert_eq!(kinds(&started), vec![(Channel::Counter, TransitionKind::PopIn)]);
        assert_eq!(c.sample(&marked, 300).counter.text, "");
    }

    #[test]
    fn second_change_mid_roll_continues_from_visible_glyphs() {
        let mut c = TransitionCoordinator::default();
        c.on_state_changed(&row(12), &row(15), 0);
        let (_, before) = c.sample(&row(15), 300).counter.roll.expect("rolling");

        let started = c.on_state_changed(&row(15), &row(16), 300);
        assert_eq!(kinds(&started), vec![(Channel::Counter, TransitionKind::Roll)]);

        let (roll, after) = c.sample(&row(16), 300).counter.roll.expect("rolling again");
        assert_eq!(roll.outgoing, " 5");
        assert_eq!(after.outgoing_dy, before.incoming_dy);
        assert_eq!(after.outgoing_alpha, before.incoming_alpha);
        assert_eq!(after.incoming_alpha, 0.0);
    }

    #[test]
    fn mark_toggle_under_visible_count_only_refreshes() {
        let mut c = TransitionCoordinator::default();
        let marked = RowState {
            marked_unread: true,
            ..row(3)
        };
        let started = c.on_state_changed(&row(3), &marked, 0);
        assert_eq!(started[0].kind, TransitionKind::Refresh);
        assert_eq!(started[0].duration_ms, 0);
        assert!(!c.is_animating(&marked, 0));
        assert_eq!(c.sample(&marked, 0).counter.presence, 1.0);
    }

    #[test]
    fn origin_width_is_reported_while_collapsing() {
        let mut c = TransitionCoordinator::default();
        c.on_state_changed(&row(5), &row(0), 0);
        c.set_counter_origin_width(8.0);
        assert_eq!(c.sample(&row(0), 50).counter.from_text_width, Some(8.0));
        assert_eq!(c.sample(&row(0), 150).counter.from_text_width, None);
    }

    #[test]
    fn origin_width_is_reported_while_rolling() {
        let mut c = TransitionCoordinator::default();
        c.on_state_changed(&row(9), &row(10), 0);
        c.set_counter_origin_width(8.0);
        assert_eq!(c.sample(&row(10), 50).counter.from_text_width, Some(8.0));
        c.tick(500);
        assert_eq!(c.sample(&row(10), 500).counter.from_text_width, None);
    }
}

mod toggle_tests {
    use super::*;

    #[test]
    fn mention_count_change_with_pill_shown_only_refreshes() {
        let mut c = TransitionCoordinator::default();
        let one = RowState {
            mention_count: 1,
            ..row(0)
        };
        let two = RowState {
            mention_count: 2,
            ..row(0)
        };
        let started = c.on_state_changed(&one, &two, 0);
        assert_eq!(kinds(&started), vec![(Channel::Mention, TransitionKind::Refresh)]);
        assert!(!c.is_animating(&two, 0));
        assert_eq!(c.sample(&two, 0).mention, 1.0);
    }

    #[test]
    fn toggles_use_their_own_timings() {
        let mut c = TransitionCoordinator::default();
        let old = row(0);
        let new = RowState {
            muted: true,
            pinned: true,
            reaction_mention: true,
            online: true,
            ..row(0)
        };
        let started = c.on_state_changed(&old, &new, 0);
        assert_eq!(
            kinds(&started),
            vec![
                (Channel::Reaction, TransitionKind::PopIn),
                (Channel::Mute, TransitionKind::FadeIn),
                (Channel::Pin, TransitionKind::PopIn),
                (Channel::Online, TransitionKind::FadeIn),
            ]
        );
        let durations: Vec<u64> = started.iter().map(|t| t.duration_ms).collect();
        assert_eq!(durations, vec![220, 150, 220, 150]);
    }

    #[test]
    fn reversal_mid_flight_continues_from_current_value() {
        let mut c = TransitionCoordinator::default();
        let offline = row(0);
        let online = RowState { online: true, ..row(0) };

        c.on_state_changed(&offline, &online, 0);
        assert!((c.sample(&online, 75).online - 0.5).abs() < 1e-6);

        c.on_state_changed(&online, &offline, 75);
        assert!((c.sample(&offline, 75).online - 0.5).abs() < 1e-6);
        assert!((c.sample(&offline, 150).online - 0.25).abs() < 1e-6);
        assert_eq!(c.sample(&offline, 225).online, 0.0);
    }

    #[test]
    fn channels_are_retargeted_not_recreated() {
        let mut c = TransitionCoordinator::default();
        let plain = row(0);
        let muted = RowState { muted: true, ..row(0) };
        c.on_state_changed(&plain, &muted, 0);
        c.on_state_changed(&muted, &plain, 10);
        c.on_state_changed(&plain, &muted, 20);
        assert_eq!(c.channel_count(), 1);
    }

    #[test]
    fn settles_after_durations() {
        let mut c = TransitionCoordinator::default();
        let new = RowState { muted: true, ..row(2) };
        c.on_state_changed(&row(0), &new, 0);
        assert!(c.is_animating(&new, 100));
        c.tick(300);
        assert!(!c.is_animating(&new, 300));
    }

    #[test]
    fn active_call_keeps_animating() {
        let c = TransitionCoordinator::default();
        let calling = RowState { call_active: true, ..row(0) };
        assert!(c.is_animating(&calling, 10_000));
        assert!((call_wave_phase(1_600) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn corners_follow_swipe_activity() {
        let mut c = TransitionCoordinator::default();
        assert!(c.on_swipe_activity(true, 0).is_some());
        assert!(c.on_swipe_activity(true, 10).is_none());
        assert_eq!(c.sample(&row(0), 150).corners, 1.0);
        c.on_swipe_activity(false, 150);
        assert_eq!(c.sample(&row(0), 300).corners, 0.0);
    }
}

mod status_tests {
    use super::*;

    #[test]
    fn send_state_change_morphs_status_icon() {
        let mut c = TransitionCoordinator::default();
        let sending = RowState {
            send_state: SendState::Sending,
            ..row(0)
        };
        let sent = RowState {
            send_state: SendState::Sent,
            ..row(0)
        };
        let started = c.on_state_changed(&sending, &sent, 0);
        assert_eq!(kinds(&started), vec![(Channel::Status, TransitionKind::Morph)]);

        match c.sample(&sent, 110).status {
            StatusFrame::CrossFade { from, to, .. } => {
                assert_eq!(from, StatusIcon::Clock);
                assert_eq!(to, StatusIcon::SingleCheck);
            }
            other => panic!("expected cross-fade, got {other:?}"),
        }

        c.tick(220);
        assert_eq!(
            c.sample(&sent, 220).status,
            StatusFrame::Static(StatusIcon::SingleCheck)
        );
    }
}

mod identity_tests {
    use super::*;

    #[test]
    fn identity_change_clears_table() {
        let mut c = TransitionCoordinator::default();
        c.on_state_changed(&row(0), &row(5), 0);
        assert_eq!(c.channel_count(), 1);

        let other = RowState {
            id: RowId::new(2),
            ..row(9)
        };
        assert!(c.on_state_changed(&row(5), &other, 50).is_empty());
        assert_eq!(c.channel_count(), 0);
        assert_eq!(c.sample(&other, 50), FrameSample::settled(&other, 50));
    }
}
