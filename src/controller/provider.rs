//! Data and image provider seams.

use super::completion::CompletionSender;
use super::subscription::Subscription;
use crate::model::{RowId, RowState};

/// Source of row snapshots.
pub trait RowDataProvider {
    /// Current snapshot of `id`, or `None` if the row no longer exists.
    fn row_state(&self, id: RowId) -> Option<RowState>;

    /// Registers for change notifications of `id`. Each change is posted
    /// through `sender` as [`CompletionSender::row_changed`] until the
    /// returned subscription is dropped.
    fn subscribe(&self, id: RowId, sender: CompletionSender) -> Subscription;
}

/// Source of avatar images.
pub trait ImageProvider {
    /// Starts loading `key`. Success is posted through `sender` as
    /// [`CompletionSender::avatar_ready`]; dropping the subscription
    /// abandons the request.
    fn request(&self, key: &str, sender: CompletionSender) -> Subscription;
}
