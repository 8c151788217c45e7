//! The row facade the list host talks to.
//!
//! A [`RowController`] owns everything one visible row needs: the bound
//! snapshot, its cached layout, the transition coordinator, the swipe and
//! pointer state machines, and the subscriptions of the current bind. Hosts
//! recycle controllers across rows by calling [`RowController::bind`] again.

use super::clock::FrameClock;
use super::completion::{BindToken, Completion, CompletionKind, CompletionSender};
use super::delegate::RowActionDelegate;
use super::provider::{ImageProvider, RowDataProvider};
use super::subscription::Subscription;
use crate::animation::{Channel, TransitionCoordinator, TransitionKind, TransitionTimings};
use crate::gesture::{
    GestureConfig, HapticKind, HapticSink, PointerEvent, PointerOutcome, PointerTracker,
    SwipeGestureController, SwipePhase, SwipeState,
};
use crate::layout::{LayoutEngine, LayoutKey, LayoutResult, TextStyle};
use crate::model::{ChangeMask, RowState, SwipeActionKind, SwipeGesture};
use crate::render::{render_row, Canvas, RenderInput, Theme};
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::debug;

/// Drives one visible row.
pub struct RowController {
    engine: LayoutEngine,
    theme: Theme,
    clock: Rc<dyn FrameClock>,
    haptics: Rc<dyn HapticSink>,
    data: Option<Rc<dyn RowDataProvider>>,
    images: Option<Rc<dyn ImageProvider>>,
    delegate: Option<Box<dyn RowActionDelegate>>,
    swipe_gesture: SwipeGesture,
    gesture_config: GestureConfig,

    state: Option<RowState>,
    token: BindToken,
    coordinator: TransitionCoordinator,
    swipe: SwipeGestureController,
    pointer: PointerTracker,
    layout: Option<(LayoutKey, Rc<LayoutResult>)>,
    layout_count: u64,
    width: f32,
    selected: bool,
    avatar_ready: bool,
    bind_subscriptions: Vec<Subscription>,
    avatar_request: Option<Subscription>,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
}

impl std::fmt::Debug for RowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowController")
            .field("row", &self.state.as_ref().map(|s| s.id))
            .field("token", &self.token)
            .field("width", &self.width)
            .field("layout_count", &self.layout_count)
            .field("swipe", self.swipe.state())
            .finish_non_exhaustive()
    }
}

impl RowController {
    /// Creates an unbound controller.
    pub fn new(engine: LayoutEngine, clock: Rc<dyn FrameClock>, haptics: Rc<dyn HapticSink>) -> Self {
        let gesture_config = GestureConfig::default();
        let (completions_tx, completions_rx) = channel();
        Self {
            engine,
            theme: Theme::default(),
            clock,
            haptics: haptics.clone(),
            data: None,
            images: None,
            delegate: None,
            swipe_gesture: SwipeGesture::default(),
            pointer: PointerTracker::new(gesture_config.touch_slop_px, gesture_config.long_press_ms),
            swipe: SwipeGestureController::new(gesture_config.clone(), haptics),
            gesture_config,
            state: None,
            token: BindToken::default(),
            coordinator: TransitionCoordinator::default(),
            layout: None,
            layout_count: 0,
            width: 0.0,
            selected: false,
            avatar_ready: false,
            bind_subscriptions: Vec::new(),
            avatar_request: None,
            completions_tx,
            completions_rx,
        }
    }

    /// Replaces the color scheme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replaces the swipe and press tunables.
    pub fn with_gesture_config(mut self, config: GestureConfig) -> Self {
        self.pointer = PointerTracker::new(config.touch_slop_px, config.long_press_ms);
        self.swipe = SwipeGestureController::new(config.clone(), self.haptics.clone());
        self.gesture_config = config;
        self
    }

    /// Replaces the transition durations.
    pub fn with_timings(mut self, timings: TransitionTimings) -> Self {
        self.coordinator = TransitionCoordinator::new(timings);
        self
    }

    /// Chooses which action a swipe reveals on ordinary conversations.
    pub fn with_swipe_gesture(mut self, gesture: SwipeGesture) -> Self {
        self.swipe_gesture = gesture;
        self
    }

    /// Subscribes to change notifications on every bind.
    pub fn with_data_provider(mut self, provider: Rc<dyn RowDataProvider>) -> Self {
        self.data = Some(provider);
        self
    }

    /// Loads avatars through `provider`.
    pub fn with_image_provider(mut self, provider: Rc<dyn ImageProvider>) -> Self {
        self.images = Some(provider);
        self
    }

    /// Installs the receiver of tap, long-press, swipe and link actions.
    pub fn set_action_delegate(&mut self, delegate: Box<dyn RowActionDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Toggles the selection overlay.
    pub fn set_selected(&mut self, selected: bool) {
        if self.selected != selected {
            self.selected = selected;
            self.clock.request_redraw();
        }
    }

    /// Binds a snapshot.
    ///
    /// A snapshot of the same row animates every field that changed. A
    /// snapshot of another row cancels everything in flight, drops the
    /// previous bind's subscriptions and draws the new row at rest.
    pub fn bind(&mut self, state: RowState) {
        let now = self.clock.now_millis();
        match self.state.take() {
            Some(old) if old.id == state.id => {
                let started = self.coordinator.on_state_changed(&old, &state, now);
                let resizes_counter = started.iter().any(|t| {
                    t.channel == Channel::Counter
                        && matches!(t.kind, TransitionKind::Roll | TransitionKind::Shrink)
                });
                if resizes_counter {
                    let origin = self.engine.text_width(&old.counter_text(), TextStyle::Counter);
                    self.coordinator.set_counter_origin_width(origin);
                }
                if old.avatar_key != state.avatar_key {
                    self.request_avatar(&state);
                }
                debug!(row = %state.id, started = started.len(), "rebind");
            }
            previous => {
                self.reset_bind();
                debug!(
                    row = %state.id,
                    previous = ?previous.map(|s| s.id),
                    token = %self.token,
                    "bind"
                );
                self.subscribe(&state);
                self.request_avatar(&state);
            }
        }
        self.state = Some(state);
        self.sync_swipe_row();
        self.clock.request_redraw();
    }

    /// Unbinds, cancelling animations, gestures and subscriptions.
    pub fn detach(&mut self) {
        if let Some(state) = self.state.as_ref() {
            debug!(row = %state.id, "detach");
        }
        self.reset_bind();
        self.state = None;
        self.layout = None;
    }

    /// Height of the row at `max_width`. Lays the row out if needed.
    pub fn measure(&mut self, max_width: f32) -> f32 {
        let width = if max_width.is_finite() { max_width.max(0.0) } else { 0.0 };
        if width != self.width {
            self.width = width;
            self.sync_swipe_row();
        }
        self.current_layout();
        self.engine.height()
    }

    /// Draws the current frame with its top-left corner at `(origin_x, origin_y)`.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, origin_x: f32, origin_y: f32) {
        let now = self.clock.now_millis();
        self.advance(now);
        let Some(layout) = self.current_layout() else {
            return;
        };
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let frame = self.coordinator.sample(state, now);
        let ops = render_row(&RenderInput {
            state,
            layout: &layout,
            frame: &frame,
            swipe: self.swipe.state(),
            metrics: self.engine.metrics(),
            theme: &self.theme,
            selected: self.selected,
            avatar_ready: self.avatar_ready,
        });
        for op in &ops {
            canvas.draw(&op.translated(origin_x, origin_y));
        }
        if self.is_animating() {
            self.clock.request_redraw();
        }
    }

    /// Feeds a pointer event in row-local coordinates. Returns `true` when
    /// the row consumed it.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        let Some(id) = self.state.as_ref().map(|s| s.id) else {
            return false;
        };
        let now = self.clock.now_millis();
        let handled = match self.pointer.on_event(event) {
            PointerOutcome::Ignored => false,
            PointerOutcome::Pressed => true,
            PointerOutcome::Drag(dx) => self.swipe.on_drag(dx).phase != SwipePhase::Idle,
            PointerOutcome::Cancelled => {
                self.swipe.on_cancel(now);
                true
            }
            PointerOutcome::Released { tap } => {
                if matches!(self.swipe.state().phase, SwipePhase::Dragging | SwipePhase::Committing) {
                    self.swipe.on_release(now);
                    if let Some(action) = self.swipe.take_committed() {
                        debug!(row = %id, %action, "swipe action");
                        if let Some(delegate) = self.delegate.as_mut() {
                            delegate.on_swipe_committed(id, action);
                        }
                    }
                } else if let Some(point) = tap {
                    let link = self
                        .current_layout()
                        .and_then(|l| l.links.iter().find(|link| link.rect.contains(point)).map(|link| link.target.clone()));
                    if let Some(delegate) = self.delegate.as_mut() {
                        match link {
                            Some(target) => delegate.on_link_activated(id, &target),
                            None => delegate.on_tap(id),
                        }
                    }
                }
                true
            }
        };
        self.after_swipe_input(now);
        handled
    }

    /// Processes completions, long presses and animation progress. Returns
    /// `true` when the row needs another frame.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_millis();
        self.advance(now);
        let animating = self.is_animating();
        if animating {
            self.clock.request_redraw();
        }
        animating
    }

    /// Fetches the provider snapshot and rebinds the fields covered by `mask`.
    pub fn on_row_changed(&mut self, mask: ChangeMask) {
        let (Some(data), Some(current)) = (self.data.clone(), self.state.as_ref()) else {
            return;
        };
        match data.row_state(current.id) {
            Some(fresh) => {
                let next = current.merged(&fresh, mask);
                self.bind(next);
            }
            None => debug!(row = %current.id, "row vanished from provider"),
        }
    }

    /// Sender for work belonging to the current bind.
    pub fn completion_sender(&self) -> CompletionSender {
        CompletionSender::new(self.token, self.completions_tx.clone())
    }

    /// Bound snapshot.
    pub fn state(&self) -> Option<&RowState> {
        self.state.as_ref()
    }

    /// Current bind generation.
    pub fn token(&self) -> BindToken {
        self.token
    }

    /// Cached layout, if the row has been measured.
    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref().map(|(_, l)| l.as_ref())
    }

    /// Number of layouts computed so far.
    pub fn layout_count(&self) -> u64 {
        self.layout_count
    }

    /// Swipe gesture state.
    pub fn swipe_state(&self) -> &SwipeState {
        self.swipe.state()
    }

    /// Swipe action revealed on this row.
    pub fn swipe_action(&self) -> Option<SwipeActionKind> {
        self.swipe.state().action
    }

    /// Returns `true` once the avatar image arrived for the current bind.
    pub fn avatar_ready(&self) -> bool {
        self.avatar_ready
    }

    /// Returns `true` while anything on the row is moving.
    pub fn is_animating(&self) -> bool {
        let now = self.clock.now_millis();
        let swiping = self.swipe.state().is_active();
        self.state
            .as_ref()
            .is_some_and(|s| self.coordinator.is_animating(s, now))
            || swiping
    }

    fn advance(&mut self, now: u64) {
        self.drain_completions();
        if self.pointer.poll_long_press(now) {
            self.haptics.pulse(HapticKind::LongPress);
            if let Some(id) = self.state.as_ref().map(|s| s.id) {
                debug!(row = %id, "long press");
                if let Some(delegate) = self.delegate.as_mut() {
                    delegate.on_long_press(id);
                }
            }
        }
        self.swipe.tick(now);
        self.coordinator.on_swipe_activity(self.swipe.state().is_active(), now);
        self.coordinator.tick(now);
    }

    fn after_swipe_input(&mut self, now: u64) {
        self.coordinator.on_swipe_activity(self.swipe.state().is_active(), now);
        if self.swipe.state().is_active() {
            self.clock.request_redraw();
        }
    }

    fn drain_completions(&mut self) {
        let pending: Vec<Completion> = self.completions_rx.try_iter().collect();
        for completion in pending {
            if completion.token != self.token {
                debug!(
                    stale = %completion.token,
                    current = %self.token,
                    "dropping stale completion"
                );
                continue;
            }
            match completion.kind {
                CompletionKind::AvatarReady { key } => {
                    let current = self.state.as_ref().and_then(|s| s.avatar_key.as_deref());
                    if current == Some(key.as_str()) {
                        self.avatar_ready = true;
                        self.clock.request_redraw();
                    }
                }
                CompletionKind::RowChanged { mask } => self.on_row_changed(mask),
            }
        }
    }

    fn current_layout(&mut self) -> Option<Rc<LayoutResult>> {
        let state = self.state.as_ref()?;
        let key = LayoutKey::new(state, self.width, state.direction);
        if let Some((cached, layout)) = self.layout.as_ref() {
            if *cached == key {
                return Some(layout.clone());
            }
        }
        let layout = Rc::new(self.engine.layout(state, self.width, state.direction));
        self.layout_count += 1;
        debug!(row = %state.id, width = self.width, count = self.layout_count, "relayout");
        self.layout = Some((key, layout.clone()));
        Some(layout)
    }

    fn reset_bind(&mut self) {
        self.token = self.token.next();
        self.bind_subscriptions.clear();
        self.avatar_request = None;
        self.avatar_ready = false;
        self.coordinator.reset();
        self.swipe.reset();
        self.pointer = PointerTracker::new(self.gesture_config.touch_slop_px, self.gesture_config.long_press_ms);
        // Anything already queued belongs to the previous bind.
        self.completions_rx.try_iter().for_each(drop);
    }

    fn subscribe(&mut self, state: &RowState) {
        if let Some(data) = self.data.as_ref() {
            let sender = self.completion_sender();
            self.bind_subscriptions.push(data.subscribe(state.id, sender));
        }
    }

    fn request_avatar(&mut self, state: &RowState) {
        self.avatar_ready = false;
        self.avatar_request = match (self.images.as_ref(), state.avatar_key.as_deref()) {
            (Some(images), Some(key)) => Some(images.request(key, self.completion_sender())),
            _ => None,
        };
    }

    fn sync_swipe_row(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let action = SwipeActionKind::resolve(state, self.swipe_gesture);
        self.swipe.set_row(self.width, state.direction, action);
    }
}

#[cfg(test)]
#[path = "row_controller_tests.rs"]
mod tests;
