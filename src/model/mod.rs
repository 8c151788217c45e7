//! Domain model: row snapshots, identities, change masks, swipe actions, errors.

pub mod error;
pub mod row_state;
pub mod swipe_action;

pub use error::{AppError, FixtureError};
pub use row_state::{
    ChangeMask, LayoutDirection, LinkSpan, RowContent, RowId, RowState, SendState,
    StatusIcon,
};
pub use swipe_action::{SwipeActionKind, SwipeGesture, UnknownSwipeGesture};
