//! Tests for the row layout engine.

use super::*;
use crate::model::{LinkSpan, RowId, SendState};

const WIDTH: f32 = 400.0;

fn engine() -> LayoutEngine {
    LayoutEngine::new(Rc::new(crate::layout::MonospaceMeasurer::new(8.0)), RowMetrics::default())
}

fn row() -> RowState {
    RowState {
        title: "Alice".to_string(),
        preview: "See you tomorrow".to_string(),
        timestamp_label: "12:30".to_string(),
        ..RowState::new(RowId::new(1))
    }
}

struct FailingMeasurer;

impl TextMeasurer for FailingMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> Result<f32, MeasureError> {
        Err(MeasureError::Unmeasurable {
            len: text.chars().count(),
            style,
            reason: "no font".to_string(),
        })
    }

    fn ellipsize(
        &self,
        text: &str,
        style: TextStyle,
        _max_width: f32,
        _max_lines: u8,
    ) -> Result<TextRun, MeasureError> {
        self.measure(text, style).map(|_| TextRun::empty())
    }
}

mod allocation_tests {
    use super::*;

    #[test]
    fn avatar_and_text_start_at_fixed_offsets() {
        let layout = engine().layout(&row(), WIDTH, LayoutDirection::Ltr);
        assert_eq!(layout.avatar, Rect::new(16.0, 8.0, 56.0, 56.0));
        assert_eq!(layout.title.rect.x, 85.0);
        assert_eq!(layout.title.run.text, "Alice");
        assert_eq!(layout.preview.rect.x, 85.0);
        assert_eq!(layout.height, 73.0);
    }

    #[test]
    fn timestamp_is_aligned_to_trailing_inset() {
        let layout = engine().layout(&row(), WIDTH, LayoutDirection::Ltr);
        let ts = layout.timestamp.expect("timestamp present");
        assert_eq!(ts.rect.right(), 384.0);
        assert_eq!(ts.rect.x, 344.0);
    }

    #[test]
    fn pills_are_ordered_from_trailing_edge_inward() {
        let state = RowState {
            unread_count: 5,
            mention_count: 1,
            reaction_mention: true,
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);

        let counter = layout.counter.expect("counter");
        let mention = layout.mention.expect("mention");
        let reaction = layout.reaction.expect("reaction");

        assert_eq!(counter.rect.right(), 386.0);
        assert_eq!(counter.rect.x, 363.0);
        assert_eq!(mention.rect.x, 334.0);
        assert_eq!(reaction.rect.x, 305.0);
        assert!(layout.preview.rect.right() <= 299.0);
    }

    #[test]
    fn pill_width_is_max_of_minimum_and_text_plus_padding() {
        let small = engine().layout(&RowState { unread_count: 5, ..row() }, WIDTH, LayoutDirection::Ltr);
        assert_eq!(small.counter.expect("counter").rect.width, 23.0);

        let large = engine().layout(&RowState { unread_count: 1234, ..row() }, WIDTH, LayoutDirection::Ltr);
        assert_eq!(large.counter.expect("counter").rect.width, 43.0);
    }

    #[test]
    fn failed_send_replaces_counters_with_error_badge() {
        let state = RowState {
            unread_count: 3,
            mention_count: 1,
            send_state: SendState::Failed,
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        assert!(layout.counter.is_none());
        assert!(layout.mention.is_none());
        assert_eq!(layout.error_badge, Some(Rect::new(363.0, 37.0, 23.0, 23.0)));
    }

    #[test]
    fn pin_space_is_reserved_only_without_badges() {
        let pinned = engine().layout(&RowState { pinned: true, ..row() }, WIDTH, LayoutDirection::Ltr);
        assert!(pinned.pin_reserved);

        let with_counter = engine().layout(
            &RowState { pinned: true, unread_count: 2, ..row() },
            WIDTH,
            LayoutDirection::Ltr,
        );
        assert!(!with_counter.pin_reserved);
    }

    #[test]
    fn status_icon_takes_space_from_the_title() {
        let plain = engine().layout(&row(), WIDTH, LayoutDirection::Ltr);
        assert_eq!(plain.status_icon.width, 0.0);

        let read = RowState {
            send_state: SendState::Sent,
            read_by_peer: true,
            ..row()
        };
        let layout = engine().layout(&read, WIDTH, LayoutDirection::Ltr);
        assert_eq!(layout.status_icon.width, 17.0);
        assert_eq!(layout.status_icon.right(), 339.0);
    }

    #[test]
    fn draft_prefix_precedes_preview() {
        let state = RowState {
            draft: true,
            sender_prefix: Some("Bob".to_string()),
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        let prefix = layout.sender_prefix.expect("prefix");
        assert_eq!(prefix.run.text, "Draft: ");
        assert_eq!(layout.preview.rect.x, prefix.rect.right());
    }

    #[test]
    fn long_title_is_ellipsized_before_badges() {
        let state = RowState {
            title: "A very long conversation title that cannot fit".to_string(),
            verified: true,
            muted: true,
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        assert!(layout.title.run.truncated);
        let badge = layout.title_badge.expect("badge");
        assert!(badge.rect.x > layout.title.rect.right());
        assert!(layout.mute_icon.x > badge.rect.right());
        assert!(layout.mute_icon.right() <= 339.0);
    }
}

mod direction_tests {
    use super::*;

    #[test]
    fn rtl_layout_is_mirror_of_ltr() {
        let state = RowState {
            unread_count: 12,
            pinned: true,
            muted: true,
            ..row()
        };
        let ltr = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        let rtl = engine().layout(&state, WIDTH, LayoutDirection::Rtl);

        assert_eq!(rtl.direction, LayoutDirection::Rtl);
        assert_eq!(rtl.avatar, ltr.avatar.mirrored(WIDTH));
        assert_eq!(rtl.avatar.x, 328.0);
        assert_eq!(rtl.title.rect, ltr.title.rect.mirrored(WIDTH));
        assert_eq!(
            rtl.counter.expect("counter").rect,
            ltr.counter.expect("counter").rect.mirrored(WIDTH)
        );
        assert_eq!(rtl.swipe_icon, ltr.swipe_icon.mirrored(WIDTH));
        assert_eq!(rtl.title.run, ltr.title.run);
    }

    #[test]
    fn trailing_aligned_keeps_trailing_edge() {
        let state = RowState { unread_count: 3, ..row() };
        let ltr = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        let grown = ltr.trailing_aligned(&ltr.counter_anchor, 40.0);
        assert_eq!(grown.right(), ltr.counter_anchor.right());

        let rtl = engine().layout(&state, WIDTH, LayoutDirection::Rtl);
        let grown = rtl.trailing_aligned(&rtl.counter_anchor, 40.0);
        assert_eq!(grown.x, rtl.counter_anchor.x);
    }
}

mod degenerate_tests {
    use super::*;

    #[test]
    fn zero_width_produces_non_negative_boxes() {
        let state = RowState {
            unread_count: 99,
            mention_count: 2,
            reaction_mention: true,
            ..row()
        };
        for width in [0.0, 40.0, 120.0, -10.0, f32::NAN] {
            let layout = engine().layout(&state, width, LayoutDirection::Ltr);
            assert!(layout.title.rect.width >= 0.0, "width {width}");
            assert!(layout.preview.rect.width >= 0.0, "width {width}");
            assert!(layout.divider.width >= 0.0, "width {width}");
        }
    }

    #[test]
    fn measurement_failure_degrades_to_plain_text() {
        let engine = LayoutEngine::new(Rc::new(FailingMeasurer), RowMetrics::default());
        let layout = engine.layout(&row(), WIDTH, LayoutDirection::Ltr);

        assert!(layout.title.fallback);
        assert_eq!(layout.title.run.text, "Alice");
        assert!(layout.preview.fallback);
        assert!(!layout.preview.run.text.is_empty());
    }

    #[test]
    fn multiline_preview_is_flattened() {
        let state = RowState {
            preview: "line one\nline two".to_string(),
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        assert_eq!(layout.preview.run.text, "line one line two");
    }
}

mod link_tests {
    use super::*;

    #[test]
    fn link_region_covers_visible_link_text() {
        let state = RowState {
            preview: "go to example.org now".to_string(),
            links: vec![LinkSpan {
                start: 6,
                end: 17,
                target: "https://example.org".to_string(),
            }],
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        assert_eq!(layout.links.len(), 1);
        let region = &layout.links[0];
        assert_eq!(region.rect.x, 85.0 + 48.0);
        assert_eq!(region.rect.width, 88.0);
        assert_eq!(region.target, "https://example.org");
    }

    #[test]
    fn links_past_the_ellipsis_are_dropped() {
        let state = RowState {
            preview: "x".repeat(200),
            links: vec![LinkSpan {
                start: 190,
                end: 195,
                target: "t".to_string(),
            }],
            ..row()
        };
        let layout = engine().layout(&state, WIDTH, LayoutDirection::Ltr);
        assert!(layout.links.is_empty());
    }
}

mod key_tests {
    use super::*;

    #[test]
    fn presence_and_avatar_do_not_change_layout_key() {
        let a = row();
        let b = RowState {
            online: true,
            call_active: true,
            avatar_key: Some("photo-1".to_string()),
            ..row()
        };
        assert_eq!(
            LayoutKey::new(&a, WIDTH, LayoutDirection::Ltr),
            LayoutKey::new(&b, WIDTH, LayoutDirection::Ltr)
        );
    }

    #[test]
    fn structural_changes_change_layout_key() {
        let a = row();
        let b = RowState { unread_count: 1, ..row() };
        assert_ne!(
            LayoutKey::new(&a, WIDTH, LayoutDirection::Ltr),
            LayoutKey::new(&b, WIDTH, LayoutDirection::Ltr)
        );
        assert_ne!(
            LayoutKey::new(&a, WIDTH, LayoutDirection::Ltr),
            LayoutKey::new(&a, WIDTH + 1.0, LayoutDirection::Ltr)
        );
    }
}
