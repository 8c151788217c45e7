//! Acceptance tests: a row driven end to end through the public API.
//!
//! Each test binds snapshots, feeds pointer input on a manual clock, draws
//! into a recording canvas and checks what the host observes.

use dialog_row::controller::{ManualClock, RecordingDelegate, RowAction, RowController, RowDataProvider};
use dialog_row::gesture::{HapticKind, PointerEvent, PointerKind, RecordingHaptics, SwipePhase};
use dialog_row::layout::{LayoutEngine, MonospaceMeasurer, RowMetrics, TextStyle};
use dialog_row::model::{ChangeMask, LayoutDirection, RowId, RowState, SwipeActionKind};
use dialog_row::render::{DrawOp, RecordingCanvas};
use dialog_row::source::FixtureProvider;
use std::rc::Rc;

const ROW_WIDTH: f32 = 400.0;

// ===== Test Fixtures =====

struct Row {
    clock: Rc<ManualClock>,
    haptics: Rc<RecordingHaptics>,
    delegate: RecordingDelegate,
    controller: RowController,
}

impl Row {
    fn new() -> Self {
        Self::with(|c| c)
    }

    fn with(configure: impl FnOnce(RowController) -> RowController) -> Self {
        let clock = Rc::new(ManualClock::new(0));
        let haptics = Rc::new(RecordingHaptics::new());
        let engine = LayoutEngine::new(Rc::new(MonospaceMeasurer::new(8.0)), RowMetrics::default());
        let mut controller = configure(RowController::new(engine, clock.clone(), haptics.clone()));
        let delegate = RecordingDelegate::new();
        controller.set_action_delegate(Box::new(delegate.clone()));
        Self {
            clock,
            haptics,
            delegate,
            controller,
        }
    }

    fn draw_at(&mut self, now_ms: u64) -> RecordingCanvas {
        self.clock.set(now_ms);
        let mut canvas = RecordingCanvas::new();
        self.controller.draw(&mut canvas, 0.0, 0.0);
        canvas
    }

    fn pointer(&mut self, kind: PointerKind, x: f32, t: u64) {
        self.clock.set(t);
        self.controller
            .on_pointer_event(PointerEvent::new(kind, x, 36.0, t));
    }

    /// Drags from `from` by `distance` in ten even steps over 300ms.
    fn drag(&mut self, from: f32, distance: f32) {
        self.pointer(PointerKind::Down, from, 0);
        for step in 1..=10u64 {
            let x = from + distance * step as f32 / 10.0;
            self.pointer(PointerKind::Move, x, step * 30);
        }
        self.pointer(PointerKind::Up, from + distance, 300);
    }
}

fn conversation(id: i64, unread: u32) -> RowState {
    RowState {
        title: "Alice".to_string(),
        preview: "See you tomorrow".to_string(),
        timestamp_label: "12:30".to_string(),
        unread_count: unread,
        ..RowState::new(RowId::new(id))
    }
}

fn counter(canvas: &RecordingCanvas) -> Option<(String, f32)> {
    canvas.ops().iter().find_map(|op| match op {
        DrawOp::Text {
            text,
            style: TextStyle::Counter,
            scale,
            ..
        } => Some((text.clone(), *scale)),
        _ => None,
    })
}

// ===== Scenario 1: Unread Badge Pops In, Then Collapses =====

#[test]
fn unread_badge_pops_in_then_collapses() {
    // GIVEN: A read conversation bound and measured at t=0
    let mut row = Row::new();
    row.controller.bind(conversation(1, 0));
    assert_eq!(row.controller.measure(ROW_WIDTH), 73.0);

    // WHEN: Five messages arrive, and the row is drawn at t=110ms
    row.controller.bind(conversation(1, 5));
    let mid = row.draw_at(110);

    // THEN: The badge is mid pop-in and reads "5"
    let (text, scale) = counter(&mid).expect("badge drawn during pop-in");
    assert_eq!(text, "5");
    assert!(scale > 0.0 && scale != 1.0, "badge should still be animating, scale {scale}");
    assert!(row.controller.is_animating());

    // WHEN: The conversation is read at t=110ms and drawn at t=260ms
    row.controller.bind(conversation(1, 0));
    let end = row.draw_at(260);

    // THEN: The shrink has finished and nothing is drawn
    assert_eq!(counter(&end), None);
    assert!(!row.controller.is_animating());
}

// ===== Scenario 2: Half-Width Drag Commits Once =====

#[test]
fn half_width_drag_commits_exactly_once() {
    // GIVEN: An ordinary conversation with the default archive action
    let mut row = Row::new();
    row.controller.bind(conversation(1, 0));
    row.controller.measure(ROW_WIDTH);

    // WHEN: The foreground is dragged 0.5 x width to the left over 300ms
    row.drag(390.0, -0.5 * ROW_WIDTH);
    row.draw_at(400);
    row.draw_at(800);

    // THEN: One commit, one threshold pulse, and the row is back at rest
    assert_eq!(
        row.delegate.actions(),
        vec![RowAction::SwipeCommitted(RowId::new(1), SwipeActionKind::Archive)]
    );
    assert_eq!(row.haptics.count(HapticKind::ThresholdCrossed), 1);
    assert_eq!(row.controller.swipe_state().phase, SwipePhase::Idle);
    assert_eq!(row.controller.swipe_state().offset_px, 0.0);
}

// ===== Scenario 3: Right-To-Left Rows Mirror The Swipe =====

#[test]
fn rtl_row_commits_on_rightward_drag() {
    // GIVEN: The same conversation laid out right to left
    let mut row = Row::new();
    row.controller.bind(RowState {
        direction: LayoutDirection::Rtl,
        ..conversation(1, 0)
    });
    row.controller.measure(ROW_WIDTH);

    // WHEN: A leftward drag is attempted first
    row.drag(390.0, -0.5 * ROW_WIDTH);
    row.draw_at(800);

    // THEN: The foreground never moves the wrong way and nothing commits
    assert!(row.delegate.actions().is_empty());

    // WHEN: The drag goes rightward instead
    row.clock.set(1000);
    row.pointer(PointerKind::Down, 10.0, 1000);
    for step in 1..=10u64 {
        row.pointer(PointerKind::Move, 10.0 + 20.0 * step as f32, 1000 + step * 30);
    }
    row.pointer(PointerKind::Up, 210.0, 1300);
    row.draw_at(1800);

    // THEN: The mirrored gesture commits once
    assert_eq!(
        row.delegate.actions(),
        vec![RowAction::SwipeCommitted(RowId::new(1), SwipeActionKind::Archive)]
    );
}

// ===== Scenario 4: Data-Layer Notification Animates The Badge =====

#[test]
fn fixture_update_reaches_the_bound_row() {
    // GIVEN: A row bound to the sample data set
    let provider = Rc::new(FixtureProvider::sample());
    let data: Rc<dyn RowDataProvider> = provider.clone();
    let mut row = Row::with(|c| c.with_data_provider(data));
    let alice = provider.row_state(RowId::new(1)).expect("sample row");
    row.controller.bind(alice);
    row.controller.measure(ROW_WIDTH);
    assert_eq!(provider.subscriber_count(), 1);

    // WHEN: The data layer bumps the unread count and renames the row
    //       under an unread-only mask
    assert!(provider.update(RowId::new(1), ChangeMask::UNREAD, |state| {
        state.unread_count = 3;
        state.title = "Renamed".to_string();
    }));
    row.controller.tick();

    // THEN: Only the masked fields are merged and the badge animates
    let state = row.controller.state().expect("still bound");
    assert_eq!(state.unread_count, 3);
    assert_eq!(state.title, "Alice");
    assert!(row.controller.is_animating());

    // WHEN: The row is detached
    row.controller.detach();

    // THEN: The subscription is cancelled
    assert_eq!(provider.subscriber_count(), 0);
}
