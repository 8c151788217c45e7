//! The row controller facade and the seams it talks through.

pub mod clock;
pub mod completion;
pub mod delegate;
pub mod provider;
pub mod row_controller;
pub mod subscription;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use completion::{BindToken, Completion, CompletionKind, CompletionSender};
pub use delegate::{RecordingDelegate, RowAction, RowActionDelegate};
pub use provider::{ImageProvider, RowDataProvider};
pub use row_controller::RowController;
pub use subscription::Subscription;
