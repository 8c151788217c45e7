//! Row color scheme.

use super::primitives::Color;
use crate::model::SwipeActionKind;

/// Colors of the layer revealed behind a swiped row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeColors {
    /// Fill behind the foreground before the wipe reaches it.
    pub background: Color,
    /// Color of the circular wipe.
    pub reveal: Color,
    /// Action icon and label.
    pub foreground: Color,
}

/// Every color the renderer uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Row background.
    pub background: Color,
    /// Overlay on the selected row.
    pub selection: Color,
    /// Tint of pinned rows.
    pub pinned_tint: Color,
    /// Tint of rows inside the archive and promoted rows.
    pub archive_tint: Color,
    /// Divider line.
    pub divider: Color,
    /// Title text.
    pub title: Color,
    /// Title text of encrypted conversations.
    pub encrypted_title: Color,
    /// Preview text.
    pub preview: Color,
    /// Sender prefix.
    pub sender: Color,
    /// Draft prefix.
    pub draft: Color,
    /// Timestamp.
    pub timestamp: Color,
    /// Delivery checks and clock.
    pub status: Color,
    /// Unread pill of an unmuted row.
    pub counter: Color,
    /// Unread pill of a muted row.
    pub counter_muted: Color,
    /// Text and glyphs inside pills.
    pub pill_content: Color,
    /// Mention pill.
    pub mention: Color,
    /// Reaction pill.
    pub reaction: Color,
    /// Failed-send badge.
    pub error: Color,
    /// Title badges and the mute and pin icons.
    pub icon: Color,
    /// Scam badge.
    pub scam: Color,
    /// Online dot and call indicator.
    pub presence: Color,
    /// Avatar circle while the image is loading.
    pub avatar_placeholder: Color,
    /// Initials on the placeholder.
    pub avatar_initials: Color,
    /// Archive, hide and unarchive actions.
    pub swipe_archive: SwipeColors,
    /// Mute and unmute actions.
    pub swipe_mute: SwipeColors,
    /// Read and unread actions.
    pub swipe_read: SwipeColors,
    /// Pin and unpin actions.
    pub swipe_pin: SwipeColors,
    /// Delete action.
    pub swipe_delete: SwipeColors,
}

impl Theme {
    /// Colors of the layer behind a row swiped to `kind`.
    pub fn swipe(&self, kind: SwipeActionKind) -> SwipeColors {
        match kind {
            SwipeActionKind::Archive
            | SwipeActionKind::Unarchive
            | SwipeActionKind::HidePromo
            | SwipeActionKind::HideFolder => self.swipe_archive,
            SwipeActionKind::Mute | SwipeActionKind::Unmute => self.swipe_mute,
            SwipeActionKind::Read | SwipeActionKind::Unread => self.swipe_read,
            SwipeActionKind::Pin | SwipeActionKind::Unpin => self.swipe_pin,
            SwipeActionKind::Delete => self.swipe_delete,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let white = Color::rgb(255, 255, 255);
        let swipe = |background: Color, reveal: Color| SwipeColors {
            background,
            reveal,
            foreground: white,
        };
        Self {
            background: white,
            selection: Color::rgba(0, 0, 0, 20),
            pinned_tint: Color::rgb(247, 247, 247),
            archive_tint: Color::rgb(243, 244, 246),
            divider: Color::rgb(217, 217, 217),
            title: Color::rgb(34, 34, 34),
            encrypted_title: Color::rgb(0, 162, 59),
            preview: Color::rgb(143, 143, 143),
            sender: Color::rgb(61, 122, 184),
            draft: Color::rgb(221, 75, 57),
            timestamp: Color::rgb(149, 153, 157),
            status: Color::rgb(77, 183, 95),
            counter: Color::rgb(77, 183, 95),
            counter_muted: Color::rgb(196, 201, 204),
            pill_content: white,
            mention: Color::rgb(77, 183, 95),
            reaction: Color::rgb(242, 87, 87),
            error: Color::rgb(217, 68, 68),
            icon: Color::rgb(161, 170, 179),
            scam: Color::rgb(230, 76, 76),
            presence: Color::rgb(69, 188, 81),
            avatar_placeholder: Color::rgb(110, 165, 217),
            avatar_initials: white,
            swipe_archive: swipe(Color::rgb(196, 201, 204), Color::rgb(63, 140, 209)),
            swipe_mute: swipe(Color::rgb(196, 201, 204), Color::rgb(247, 147, 30)),
            swipe_read: swipe(Color::rgb(196, 201, 204), Color::rgb(63, 140, 209)),
            swipe_pin: swipe(Color::rgb(196, 201, 204), Color::rgb(77, 183, 95)),
            swipe_delete: swipe(Color::rgb(196, 201, 204), Color::rgb(217, 68, 68)),
        }
    }
}
