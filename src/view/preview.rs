//! Interactive list of fixture rows, one [`RowController`] per row.
//!
//! Mouse drags swipe rows, clicks tap them, and keys mutate the selected
//! row's fixture data so every transition can be watched in a terminal.

use super::terminal_canvas::{TerminalCanvas, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::config::ResolvedConfig;
use crate::controller::{
    FrameClock, RecordingDelegate, RowAction, RowController, RowDataProvider,
};
use crate::gesture::{HapticSink, PointerEvent, PointerKind};
use crate::layout::{LayoutEngine, MonospaceMeasurer};
use crate::model::{ChangeMask, LayoutDirection, RowId, SendState, SwipeActionKind};
use crate::source::{FixtureImages, FixtureProvider};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect as CellRect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::rc::Rc;
use tracing::{debug, info};

/// Key help, split so each line fits a narrow terminal.
const KEY_HELP: [&str; 2] = [
    "j/k select  + unread  r read  @ mention  m mute  p pin",
    "s send  o online  c call  d rtl  q quit",
];

struct RowSlot {
    id: RowId,
    controller: RowController,
    area: Option<CellRect>,
}

/// Rows, their controllers, and the fixture they are bound to.
pub struct Preview {
    provider: Rc<FixtureProvider>,
    images: Rc<FixtureImages>,
    clock: Rc<dyn FrameClock>,
    delegate: RecordingDelegate,
    slots: Vec<RowSlot>,
    selected: usize,
    drag: Option<usize>,
    status: String,
}

impl Preview {
    /// Binds one controller per fixture row.
    pub fn new(
        config: &ResolvedConfig,
        provider: Rc<FixtureProvider>,
        images: Rc<FixtureImages>,
        clock: Rc<dyn FrameClock>,
        haptics: Rc<dyn HapticSink>,
    ) -> Self {
        if config.rtl {
            for id in provider.ids() {
                provider.update(id, ChangeMask::ALL, |r| r.direction = LayoutDirection::Rtl);
            }
        }

        let delegate = RecordingDelegate::new();
        let measurer = Rc::new(MonospaceMeasurer::new(CELL_WIDTH_PX));
        let data: Rc<dyn RowDataProvider> = provider.clone();
        let slots = provider
            .ids()
            .into_iter()
            .filter_map(|id| {
                let state = provider.row_state(id)?;
                let engine = LayoutEngine::new(measurer.clone(), config.metrics.clone())
                    .with_draft_label(config.draft_label.clone());
                let mut controller = RowController::new(engine, clock.clone(), haptics.clone())
                    .with_gesture_config(config.gesture.clone())
                    .with_timings(config.timings.clone())
                    .with_swipe_gesture(config.swipe_action)
                    .with_data_provider(data.clone())
                    .with_image_provider(images.clone());
                controller.set_action_delegate(Box::new(delegate.clone()));
                controller.bind(state);
                Some(RowSlot {
                    id,
                    controller,
                    area: None,
                })
            })
            .collect::<Vec<_>>();

        info!(rows = slots.len(), "preview ready");
        Self {
            provider,
            images,
            clock,
            delegate,
            slots,
            selected: 0,
            drag: None,
            status: String::new(),
        }
    }

    /// Last action message.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Index of the selected row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Rows still in the list.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Delivers pending avatars and advances every row. Returns `true` while
    /// any row is animating.
    pub fn tick(&mut self) -> bool {
        self.images.flush();
        let mut animating = false;
        for slot in &mut self.slots {
            animating |= slot.controller.tick();
        }
        self.apply_actions();
        animating
    }

    /// Handles a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected.saturating_add(1)),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('+') => self.edit(ChangeMask::UNREAD, |r| {
                r.unread_count = r.unread_count.saturating_add(1);
            }),
            KeyCode::Char('r') => self.edit(ChangeMask::UNREAD, |r| {
                r.unread_count = 0;
                r.mention_count = 0;
                r.reaction_mention = false;
                r.marked_unread = false;
            }),
            KeyCode::Char('@') => self.edit(ChangeMask::UNREAD, |r| {
                r.mention_count = r.mention_count.saturating_add(1);
            }),
            KeyCode::Char('m') => self.edit(ChangeMask::NAME, |r| r.muted = !r.muted),
            KeyCode::Char('p') => self.edit(ChangeMask::NAME, |r| r.pinned = !r.pinned),
            KeyCode::Char('o') => self.edit(ChangeMask::STATUS, |r| r.online = !r.online),
            KeyCode::Char('c') => self.edit(ChangeMask::STATUS, |r| r.call_active = !r.call_active),
            KeyCode::Char('s') => self.edit(ChangeMask::SEND_STATE, |r| {
                let (next, read) = match (r.send_state, r.read_by_peer) {
                    (SendState::None, _) | (SendState::Failed, _) => (SendState::Sending, false),
                    (SendState::Sending, _) => (SendState::Sent, false),
                    (SendState::Sent, false) => (SendState::Sent, true),
                    (SendState::Sent, true) => (SendState::Failed, false),
                };
                r.send_state = next;
                r.read_by_peer = read;
            }),
            KeyCode::Char('d') => {
                for id in self.row_ids() {
                    self.provider
                        .update(id, ChangeMask::ALL, |r| r.direction = r.direction.flipped());
                }
                self.status = "Flipped reading direction".to_string();
            }
            _ => {}
        }
        false
    }

    /// Routes a mouse event to the row under the pointer. A drag stays with
    /// the row it started on.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = self.slot_at(mouse.column, mouse.row);
                PointerKind::Down
            }
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            MouseEventKind::ScrollDown => {
                self.select(self.selected.saturating_add(1));
                return;
            }
            MouseEventKind::ScrollUp => {
                self.select(self.selected.saturating_sub(1));
                return;
            }
            _ => return,
        };
        let Some(index) = self.drag else {
            return;
        };
        if kind == PointerKind::Up {
            self.drag = None;
        }
        let now = self.clock.now_millis();
        if let Some(slot) = self.slots.get_mut(index) {
            let Some(area) = slot.area else {
                return;
            };
            let x = (f32::from(mouse.column) - f32::from(area.x) + 0.5) * CELL_WIDTH_PX;
            let y = (f32::from(mouse.row) - f32::from(area.y) + 0.5) * CELL_HEIGHT_PX;
            slot.controller
                .on_pointer_event(PointerEvent::new(kind, x, y, now));
        }
        self.apply_actions();
    }

    /// Draws the list, the status line and the key help into `frame`.
    pub fn render(&mut self, frame: &mut Frame) {
        let status_lines = 1 + KEY_HELP.len() as u16;
        let [list_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(status_lines)]).areas(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" dialog-row ");
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);

        let width_px = f32::from(inner.width) * CELL_WIDTH_PX;
        let mut top = inner.y;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.controller.set_selected(index == self.selected);
            let height_px = slot.controller.measure(width_px);
            let lines = (height_px / CELL_HEIGHT_PX).ceil().max(1.0) as u16;
            if top >= inner.bottom() {
                slot.area = None;
                continue;
            }
            let area = CellRect::new(inner.x, top, inner.width, lines.min(inner.bottom() - top));
            slot.area = Some(area);
            let mut canvas = TerminalCanvas::new(frame.buffer_mut(), area);
            slot.controller.draw(&mut canvas, 0.0, 0.0);
            top = top.saturating_add(lines);
        }

        let dim = Style::default().add_modifier(Modifier::DIM);
        let status = Paragraph::new(
            std::iter::once(Line::from(self.status.as_str()))
                .chain(KEY_HELP.iter().map(|help| Line::styled(*help, dim)))
                .collect::<Vec<_>>(),
        );
        frame.render_widget(status, status_area);
    }

    fn select(&mut self, index: usize) {
        if !self.slots.is_empty() {
            self.selected = index.min(self.slots.len() - 1);
        }
    }

    fn selected_id(&self) -> Option<RowId> {
        self.slots.get(self.selected).map(|s| s.id)
    }

    fn title_of(&self, id: RowId) -> String {
        self.provider
            .row_state(id)
            .map(|r| r.title)
            .unwrap_or_else(|| id.to_string())
    }

    fn edit(&mut self, mask: ChangeMask, f: impl FnOnce(&mut crate::model::RowState)) {
        if let Some(id) = self.selected_id() {
            self.provider.update(id, mask, f);
        }
    }

    fn slot_at(&self, column: u16, row: u16) -> Option<usize> {
        self.slots.iter().position(|s| {
            s.area.is_some_and(|a| {
                column >= a.x && column < a.right() && row >= a.y && row < a.bottom()
            })
        })
    }

    fn apply_actions(&mut self) {
        for action in self.delegate.drain() {
            debug!(?action, "row action");
            match action {
                RowAction::Tap(id) => {
                    if let Some(index) = self.slots.iter().position(|s| s.id == id) {
                        self.selected = index;
                    }
                    self.status = format!("Open {}", self.title_of(id));
                }
                RowAction::LongPress(id) => {
                    self.status = format!("Peek {}", self.title_of(id));
                }
                RowAction::LinkActivated(_, target) => {
                    self.status = format!("Open link {target}");
                }
                RowAction::SwipeCommitted(id, action) => self.apply_swipe(id, action),
            }
        }
    }

    fn apply_swipe(&mut self, id: RowId, action: SwipeActionKind) {
        self.status = format!("{} {}", action.label(), self.title_of(id));
        let provider = &self.provider;
        match action {
            SwipeActionKind::Archive => provider.update(id, ChangeMask::NAME, |r| r.in_archive = true),
            SwipeActionKind::Unarchive => {
                provider.update(id, ChangeMask::NAME, |r| r.in_archive = false)
            }
            SwipeActionKind::Mute => provider.update(id, ChangeMask::NAME, |r| r.muted = true),
            SwipeActionKind::Unmute => provider.update(id, ChangeMask::NAME, |r| r.muted = false),
            SwipeActionKind::Pin => provider.update(id, ChangeMask::NAME, |r| r.pinned = true),
            SwipeActionKind::Unpin => provider.update(id, ChangeMask::NAME, |r| r.pinned = false),
            SwipeActionKind::Read => provider.update(id, ChangeMask::UNREAD, |r| {
                r.unread_count = 0;
                r.mention_count = 0;
                r.reaction_mention = false;
                r.marked_unread = false;
            }),
            SwipeActionKind::Unread => {
                provider.update(id, ChangeMask::UNREAD, |r| r.marked_unread = true)
            }
            SwipeActionKind::Delete | SwipeActionKind::HidePromo | SwipeActionKind::HideFolder => {
                provider.remove(id);
                self.slots.retain(|s| s.id != id);
                self.select(self.selected);
                self.drag = None;
                true
            }
        };
    }
}

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;
