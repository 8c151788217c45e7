//! Token-guarded completions posted by background work.
//!
//! Every bind of a new row identity gets a fresh [`BindToken`]. Work started
//! for a bind (avatar loads, change notifications) posts its result through
//! a [`CompletionSender`] carrying that token; the controller drops results
//! whose token is no longer current.

use crate::model::ChangeMask;
use std::fmt;
use std::sync::mpsc::Sender;
use tracing::debug;

/// Generation of a controller's binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BindToken(u64);

impl BindToken {
    /// The token after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw generation number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionKind {
    /// The avatar image for `key` is available.
    AvatarReady {
        /// Image-provider key.
        key: String,
    },
    /// The provider's snapshot of the row changed.
    RowChanged {
        /// Fields that changed.
        mask: ChangeMask,
    },
}

/// A result tagged with the bind it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Bind the work was started for.
    pub token: BindToken,
    /// Result.
    pub kind: CompletionKind,
}

/// Posts completions for one bind.
#[derive(Clone)]
pub struct CompletionSender {
    token: BindToken,
    tx: Sender<Completion>,
}

impl CompletionSender {
    /// Creates a sender for `token`.
    pub fn new(token: BindToken, tx: Sender<Completion>) -> Self {
        Self { token, tx }
    }

    /// Bind the sender belongs to.
    pub fn token(&self) -> BindToken {
        self.token
    }

    /// Reports a loaded avatar.
    pub fn avatar_ready(&self, key: impl Into<String>) {
        self.post(CompletionKind::AvatarReady { key: key.into() });
    }

    /// Reports a changed row snapshot.
    pub fn row_changed(&self, mask: ChangeMask) {
        self.post(CompletionKind::RowChanged { mask });
    }

    fn post(&self, kind: CompletionKind) {
        let completion = Completion {
            token: self.token,
            kind,
        };
        if self.tx.send(completion).is_err() {
            debug!(token = %self.token, "controller gone, completion dropped");
        }
    }
}

impl fmt::Debug for CompletionSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSender")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
