//! Swipe action kinds revealed behind a row.

use super::row_state::{RowContent, RowState};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// User-configured meaning of the swipe gesture for ordinary conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeGesture {
    /// Archive or unarchive.
    #[default]
    Archive,
    /// Mute or unmute.
    Mute,
    /// Mark read or unread.
    Read,
    /// Pin or unpin.
    Pin,
    /// Delete the conversation.
    Delete,
}

/// Error returned when a gesture name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown swipe action '{0}' (expected archive, mute, read, pin or delete)")]
pub struct UnknownSwipeGesture(pub String);

impl FromStr for SwipeGesture {
    type Err = UnknownSwipeGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "archive" => Ok(Self::Archive),
            "mute" => Ok(Self::Mute),
            "read" => Ok(Self::Read),
            "pin" => Ok(Self::Pin),
            "delete" => Ok(Self::Delete),
            _ => Err(UnknownSwipeGesture(s.to_string())),
        }
    }
}

/// Concrete action performed when a swipe commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeActionKind {
    /// Move to the archive folder.
    Archive,
    /// Move out of the archive folder.
    Unarchive,
    /// Mute notifications.
    Mute,
    /// Unmute notifications.
    Unmute,
    /// Mark all messages read.
    Read,
    /// Mark the conversation unread.
    Unread,
    /// Pin to the top.
    Pin,
    /// Unpin.
    Unpin,
    /// Delete the conversation.
    Delete,
    /// Dismiss a sponsored entry.
    HidePromo,
    /// Collapse a folder row into the list header.
    HideFolder,
}

impl SwipeActionKind {
    /// Resolves the action for `state` under the configured `gesture`.
    ///
    /// Returns `None` for rows that cannot be swiped.
    pub fn resolve(state: &RowState, gesture: SwipeGesture) -> Option<Self> {
        match state.content {
            RowContent::Custom => None,
            RowContent::Promo => Some(Self::HidePromo),
            RowContent::Folder { .. } => Some(Self::HideFolder),
            RowContent::Dialog | RowContent::Encrypted => Some(match gesture {
                SwipeGesture::Archive if state.in_archive => Self::Unarchive,
                SwipeGesture::Archive => Self::Archive,
                SwipeGesture::Mute if state.muted => Self::Unmute,
                SwipeGesture::Mute => Self::Mute,
                SwipeGesture::Read if state.counter_visible() => Self::Read,
                SwipeGesture::Read => Self::Unread,
                SwipeGesture::Pin if state.pinned => Self::Unpin,
                SwipeGesture::Pin => Self::Pin,
                SwipeGesture::Delete => Self::Delete,
            }),
        }
    }

    /// Short label drawn under the action icon.
    pub fn label(self) -> &'static str {
        match self {
            Self::Archive => "Archive",
            Self::Unarchive => "Unarchive",
            Self::Mute => "Mute",
            Self::Unmute => "Unmute",
            Self::Read => "Read",
            Self::Unread => "Unread",
            Self::Pin => "Pin",
            Self::Unpin => "Unpin",
            Self::Delete => "Delete",
            Self::HidePromo => "Hide",
            Self::HideFolder => "Hide",
        }
    }
}

impl fmt::Display for SwipeActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
