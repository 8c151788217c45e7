//! Row action callbacks.

use crate::model::{RowId, SwipeActionKind};
use std::cell::RefCell;
use std::rc::Rc;

/// Receives user actions on a row.
pub trait RowActionDelegate {
    /// The row was tapped outside any link.
    fn on_tap(&mut self, row: RowId);

    /// The row was held without moving.
    fn on_long_press(&mut self, row: RowId);

    /// A swipe was released beyond the commit threshold.
    fn on_swipe_committed(&mut self, row: RowId, action: SwipeActionKind);

    /// A tap landed on a link in the preview.
    fn on_link_activated(&mut self, row: RowId, target: &str);
}

/// One delegate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// See [`RowActionDelegate::on_tap`].
    Tap(RowId),
    /// See [`RowActionDelegate::on_long_press`].
    LongPress(RowId),
    /// See [`RowActionDelegate::on_swipe_committed`].
    SwipeCommitted(RowId, SwipeActionKind),
    /// See [`RowActionDelegate::on_link_activated`].
    LinkActivated(RowId, String),
}

/// Delegate that appends every call to a shared list.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelegate {
    actions: Rc<RefCell<Vec<RowAction>>>,
}

impl RecordingDelegate {
    /// Creates a delegate with an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    pub fn actions(&self) -> Vec<RowAction> {
        self.actions.borrow().clone()
    }

    /// Removes and returns the calls received so far.
    pub fn drain(&self) -> Vec<RowAction> {
        std::mem::take(&mut *self.actions.borrow_mut())
    }
}

impl RowActionDelegate for RecordingDelegate {
    fn on_tap(&mut self, row: RowId) {
        self.actions.borrow_mut().push(RowAction::Tap(row));
    }

    fn on_long_press(&mut self, row: RowId) {
        self.actions.borrow_mut().push(RowAction::LongPress(row));
    }

    fn on_swipe_committed(&mut self, row: RowId, action: SwipeActionKind) {
        self.actions
            .borrow_mut()
            .push(RowAction::SwipeCommitted(row, action));
    }

    fn on_link_activated(&mut self, row: RowId, target: &str) {
        self.actions
            .borrow_mut()
            .push(RowAction::LinkActivated(row, target.to_string()));
    }
}
