//! Immutable row snapshot bound to a [`RowController`](crate::controller::RowController).
//!
//! Every field has a default so that partially filled snapshots coming from
//! the data layer (or a fixture file) still render: missing text renders
//! empty, missing counters render as zero.

use serde::Deserialize;
use std::fmt;

/// Stable identity of a conversation row.
///
/// Two snapshots with the same id describe the same conversation; a change of
/// id on rebind means the row view was recycled for a different conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct RowId(i64);

impl RowId {
    /// Wraps a raw dialog id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw dialog id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reading direction of the row.
///
/// Layout is computed in direction-relative space ("leading" and
/// "trailing") and mirrored to absolute X for [`LayoutDirection::Rtl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl LayoutDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }
}

/// Delivery state of the last outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendState {
    /// Last message is incoming, or there is none.
    #[default]
    None,
    /// Waiting for the server to acknowledge.
    Sending,
    /// Acknowledged by the server.
    Sent,
    /// Delivery failed; the row shows an error badge.
    Failed,
}

/// Delivery icon shown next to the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum StatusIcon {
    /// No icon.
    #[default]
    None,
    /// Sending.
    Clock,
    /// Delivered, not yet read.
    SingleCheck,
    /// Read by the peer.
    DoubleCheck,
}

/// What kind of entry the row represents.
///
/// The renderer and the swipe layer switch on this instead of probing
/// nullable fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowContent {
    /// Ordinary user, group, or channel conversation.
    #[default]
    Dialog,
    /// End-to-end encrypted conversation; drawn with a lock before the title.
    Encrypted,
    /// A folder of conversations, such as the archive.
    Folder {
        /// Number of conversations inside the folder.
        #[serde(default)]
        dialogs_count: u32,
    },
    /// Sponsored entry pinned by the server.
    Promo,
    /// Host-drawn entry with no swipe action.
    Custom,
}

impl RowContent {
    /// Returns `true` for folder rows.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }
}

/// A range of the preview text that activates a link when tapped.
///
/// `start` and `end` are character offsets into the preview text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct LinkSpan {
    /// First character of the link.
    pub start: usize,
    /// One past the last character of the link.
    pub end: usize,
    /// Opaque target handed to the action delegate.
    pub target: String,
}

/// Snapshot of everything a row displays.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RowState {
    /// Conversation identity.
    pub id: RowId,
    /// Closed set of row kinds.
    pub content: RowContent,
    /// Conversation title.
    pub title: String,
    /// Last message preview.
    pub preview: String,
    /// Author of the last message in group conversations ("Alice").
    pub sender_prefix: Option<String>,
    /// Pre-formatted timestamp of the last message.
    pub timestamp_label: String,
    /// Unread message count.
    pub unread_count: u32,
    /// Unread mention count.
    pub mention_count: u32,
    /// An unread reaction to one of the user's messages exists.
    pub reaction_mention: bool,
    /// The user manually marked the conversation as unread.
    pub marked_unread: bool,
    /// Notifications are muted.
    pub muted: bool,
    /// Pinned to the top of the list.
    pub pinned: bool,
    /// Verified account or channel.
    pub verified: bool,
    /// Premium account.
    pub premium: bool,
    /// Flagged as scam.
    pub scam: bool,
    /// An unsent draft exists.
    pub draft: bool,
    /// Delivery state of the last outgoing message.
    pub send_state: SendState,
    /// The peer has read the last outgoing message.
    pub read_by_peer: bool,
    /// The peer is online.
    pub online: bool,
    /// A group call is active in the conversation.
    pub call_active: bool,
    /// The conversation lives inside the archive folder.
    pub in_archive: bool,
    /// Key understood by the host's image provider.
    pub avatar_key: Option<String>,
    /// Activatable ranges inside [`RowState::preview`].
    pub links: Vec<LinkSpan>,
    /// Reading direction.
    pub direction: LayoutDirection,
}

impl RowState {
    /// Creates an empty snapshot for `id`.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Returns `true` when the unread counter pill is shown.
    ///
    /// A manually marked conversation shows an empty pill even with zero
    /// unread messages.
    pub fn counter_visible(&self) -> bool {
        self.unread_count > 0 || self.marked_unread
    }

    /// Text drawn inside the counter pill.
    pub fn counter_text(&self) -> String {
        if self.unread_count > 0 {
            self.unread_count.to_string()
        } else {
            String::new()
        }
    }

    /// Returns `true` when the mention pill is shown.
    pub fn mention_visible(&self) -> bool {
        self.mention_count > 0 && !self.content.is_folder()
    }

    /// Delivery icon drawn before the timestamp.
    ///
    /// Drafts and folders never show one; a failed send shows the error
    /// badge instead.
    pub fn status_icon(&self) -> StatusIcon {
        if self.draft || self.content.is_folder() {
            return StatusIcon::None;
        }
        match self.send_state {
            SendState::None | SendState::Failed => StatusIcon::None,
            SendState::Sending => StatusIcon::Clock,
            SendState::Sent if self.read_by_peer => StatusIcon::DoubleCheck,
            SendState::Sent => StatusIcon::SingleCheck,
        }
    }

    /// Returns `true` when the failed-send badge replaces the counters.
    pub fn shows_error(&self) -> bool {
        self.send_state == SendState::Failed
    }

    /// Copies the fields covered by `mask` from `fresh` into a copy of `self`.
    ///
    /// Fields outside the mask keep their current values, so a coarse
    /// notification never rewrites unrelated parts of the row.
    pub fn merged(&self, fresh: &RowState, mask: ChangeMask) -> RowState {
        if mask.contains(ChangeMask::ALL) || fresh.id != self.id {
            return fresh.clone();
        }
        let mut next = self.clone();
        if mask.contains(ChangeMask::AVATAR) {
            next.avatar_key = fresh.avatar_key.clone();
        }
        if mask.contains(ChangeMask::NAME) {
            next.title = fresh.title.clone();
            next.content = fresh.content.clone();
            next.verified = fresh.verified;
            next.premium = fresh.premium;
            next.scam = fresh.scam;
            next.muted = fresh.muted;
            next.pinned = fresh.pinned;
            next.in_archive = fresh.in_archive;
        }
        if mask.contains(ChangeMask::STATUS) {
            next.online = fresh.online;
            next.call_active = fresh.call_active;
        }
        if mask.contains(ChangeMask::MESSAGE) {
            next.preview = fresh.preview.clone();
            next.sender_prefix = fresh.sender_prefix.clone();
            next.timestamp_label = fresh.timestamp_label.clone();
            next.draft = fresh.draft;
            next.links = fresh.links.clone();
        }
        if mask.contains(ChangeMask::UNREAD) {
            next.unread_count = fresh.unread_count;
            next.mention_count = fresh.mention_count;
            next.reaction_mention = fresh.reaction_mention;
            next.marked_unread = fresh.marked_unread;
        }
        if mask.contains(ChangeMask::SEND_STATE) {
            next.send_state = fresh.send_state;
            next.read_by_peer = fresh.read_by_peer;
        }
        next
    }
}

/// Coarse description of which parts of a row changed in the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChangeMask(u8);

impl ChangeMask {
    /// Nothing changed.
    pub const NONE: Self = Self(0);
    /// Avatar image key.
    pub const AVATAR: Self = Self(1);
    /// Title and account flags.
    pub const NAME: Self = Self(1 << 1);
    /// Presence: online and call state.
    pub const STATUS: Self = Self(1 << 2);
    /// Last message, sender, timestamp, draft.
    pub const MESSAGE: Self = Self(1 << 3);
    /// Unread, mention, and reaction counters.
    pub const UNREAD: Self = Self(1 << 4);
    /// Delivery state of the last outgoing message.
    pub const SEND_STATE: Self = Self(1 << 5);
    /// Everything.
    pub const ALL: Self = Self(0b0011_1111);

    /// Returns `true` when every bit of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when `self` and `other` share any bit.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when no bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ChangeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ChangeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowState {
        RowState {
            id: RowId::new(7),
            title: "Alice".to_string(),
            preview: "see you".to_string(),
            unread_count: 3,
            online: false,
            ..RowState::default()
        }
    }

    #[test]
    fn deserializes_partial_snapshot_with_defaults() {
        let state: RowState =
            serde_json::from_str(r#"{"id": 42, "title": "Bob"}"#).expect("valid json");
        assert_eq!(state.id, RowId::new(42));
        assert_eq!(state.title, "Bob");
        assert_eq!(state.preview, "");
        assert_eq!(state.unread_count, 0);
        assert_eq!(state.send_state, SendState::None);
        assert_eq!(state.content, RowContent::Dialog);
    }

    #[test]
    fn deserializes_tagged_content_and_enums() {
        let state: RowState = serde_json::from_str(
            r#"{"id": 1, "content": {"kind": "folder", "dialogs_count": 12},
                "send_state": "failed", "direction": "rtl"}"#,
        )
        .expect("valid json");
        assert_eq!(state.content, RowContent::Folder { dialogs_count: 12 });
        assert_eq!(state.send_state, SendState::Failed);
        assert_eq!(state.direction, LayoutDirection::Rtl);
    }

    #[test]
    fn marked_unread_shows_empty_counter() {
        let state = RowState {
            marked_unread: true,
            ..RowState::new(RowId::new(1))
        };
        assert!(state.counter_visible());
        assert_eq!(state.counter_text(), "");
    }

    #[test]
    fn status_icon_follows_send_state() {
        let mut state = RowState::new(RowId::new(1));
        assert_eq!(state.status_icon(), StatusIcon::None);
        state.send_state = SendState::Sending;
        assert_eq!(state.status_icon(), StatusIcon::Clock);
        state.send_state = SendState::Sent;
        assert_eq!(state.status_icon(), StatusIcon::SingleCheck);
        state.read_by_peer = true;
        assert_eq!(state.status_icon(), StatusIcon::DoubleCheck);
        state.draft = true;
        assert_eq!(state.status_icon(), StatusIcon::None);
    }

    #[test]
    fn folder_rows_hide_mentions() {
        let state = RowState {
            content: RowContent::Folder { dialogs_count: 3 },
            mention_count: 2,
            ..RowState::new(RowId::new(1))
        };
        assert!(!state.mention_visible());
    }

    #[test]
    fn merged_only_takes_masked_fields() {
        let current = sample();
        let fresh = RowState {
            title: "Alice Liddell".to_string(),
            unread_count: 9,
            online: true,
            ..current.clone()
        };

        let merged = current.merged(&fresh, ChangeMask::STATUS);

        assert!(merged.online);
        assert_eq!(merged.unread_count, 3);
        assert_eq!(merged.title, "Alice");
    }

    #[test]
    fn merged_with_all_mask_takes_everything() {
        let current = sample();
        let fresh = RowState {
            title: "Other".to_string(),
            ..current.clone()
        };
        assert_eq!(current.merged(&fresh, ChangeMask::ALL), fresh);
    }

    #[test]
    fn change_mask_set_operations() {
        let mask = ChangeMask::NAME | ChangeMask::UNREAD;
        assert!(mask.contains(ChangeMask::NAME));
        assert!(!mask.contains(ChangeMask::STATUS));
        assert!(mask.intersects(ChangeMask::UNREAD | ChangeMask::AVATAR));
        assert!(ChangeMask::NONE.is_empty());
        assert!(ChangeMask::ALL.contains(mask));
    }
}
