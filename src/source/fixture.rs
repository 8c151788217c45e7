//! JSON fixture rows served through the provider seams.
//!
//! A fixture document looks like:
//!
//! ```json
//! { "rows": [
//!     { "id": 1, "title": "Alice", "preview": "hi", "sent_at": "2026-10-18T12:30:00Z" }
//! ] }
//! ```
//!
//! Each row accepts every [`RowState`] field. `sent_at` fills an empty
//! `timestamp_label`. Rows that fail to parse are logged and skipped.

use crate::controller::{CompletionSender, ImageProvider, RowDataProvider, Subscription};
use crate::model::{
    ChangeMask, FixtureError, LinkSpan, RowContent, RowId, RowState, SendState,
};
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Utc};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct RawDocument {
    rows: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(flatten)]
    state: RowState,
    #[serde(default)]
    sent_at: Option<DateTime<Utc>>,
}

/// Formats a message time relative to `now`.
///
/// Same day gives `HH:MM`, same year gives `Mon D`, older gives `DD.MM.YY`.
pub fn format_timestamp(at: NaiveDateTime, now: NaiveDateTime) -> String {
    if at.date() == now.date() {
        at.format("%H:%M").to_string()
    } else if at.year() == now.year() {
        at.format("%b %-d").to_string()
    } else {
        at.format("%d.%m.%y").to_string()
    }
}

/// Parses a fixture document. Timestamps are formatted relative to `now`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidDocument`] when the text is not JSON or
/// has no `rows` array. Individual bad rows only produce a warning.
pub fn parse_rows(json: &str, now: NaiveDateTime) -> Result<Vec<RowState>, FixtureError> {
    let doc: RawDocument =
        serde_json::from_str(json).map_err(|e| FixtureError::InvalidDocument {
            message: e.to_string(),
        })?;

    let mut rows: Vec<RowState> = Vec::with_capacity(doc.rows.len());
    for (index, value) in doc.rows.into_iter().enumerate() {
        let raw: RawRow = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed fixture row");
                continue;
            }
        };
        let mut state = raw.state;
        if rows.iter().any(|r| r.id == state.id) {
            warn!(index, id = %state.id, "skipping fixture row with duplicate id");
            continue;
        }
        if state.timestamp_label.is_empty() {
            if let Some(at) = raw.sent_at {
                state.timestamp_label = format_timestamp(at.naive_local(), now);
            }
        }
        rows.push(state);
    }
    Ok(rows)
}

struct Subscriber {
    key: u64,
    row: RowId,
    sender: CompletionSender,
}

/// In-memory row store implementing [`RowDataProvider`].
///
/// Mutations through [`FixtureProvider::update`] notify every subscriber of
/// the row with the supplied change mask.
pub struct FixtureProvider {
    rows: RefCell<Vec<RowState>>,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
    next_key: Cell<u64>,
}

impl FixtureProvider {
    /// Store holding `rows` in order.
    pub fn from_rows(rows: Vec<RowState>) -> Self {
        Self {
            rows: RefCell::new(rows),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_key: Cell::new(0),
        }
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a fixture document.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows = parse_rows(&json, Local::now().naive_local())?;
        info!(path = %path.display(), rows = rows.len(), "loaded fixture");
        Ok(Self::from_rows(rows))
    }

    /// Built-in rows covering the common row shapes.
    pub fn sample() -> Self {
        Self::from_rows(sample_rows())
    }

    /// Row ids in display order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.borrow().iter().map(|r| r.id).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Returns `true` when the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    /// Live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Applies `edit` to row `id` and notifies its subscribers with `mask`.
    ///
    /// Returns `false` when no such row exists.
    pub fn update(&self, id: RowId, mask: ChangeMask, edit: impl FnOnce(&mut RowState)) -> bool {
        {
            let mut rows = self.rows.borrow_mut();
            let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                return false;
            };
            edit(row);
        }
        let subscribers = self.subscribers.borrow();
        let mut notified = 0;
        for sub in subscribers.iter().filter(|s| s.row == id) {
            sub.sender.row_changed(mask);
            notified += 1;
        }
        debug!(%id, ?mask, notified, "fixture row updated");
        true
    }

    /// Removes row `id`. Its subscribers are told with [`ChangeMask::ALL`]
    /// and will find no snapshot.
    pub fn remove(&self, id: RowId) -> Option<RowState> {
        let removed = {
            let mut rows = self.rows.borrow_mut();
            let index = rows.iter().position(|r| r.id == id)?;
            rows.remove(index)
        };
        for sub in self.subscribers.borrow().iter().filter(|s| s.row == id) {
            sub.sender.row_changed(ChangeMask::ALL);
        }
        info!(%id, "fixture row removed");
        Some(removed)
    }
}

impl RowDataProvider for FixtureProvider {
    fn row_state(&self, id: RowId) -> Option<RowState> {
        self.rows.borrow().iter().find(|r| r.id == id).cloned()
    }

    fn subscribe(&self, id: RowId, sender: CompletionSender) -> Subscription {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            key,
            row: id,
            sender,
        });

        let subscribers = Rc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers.borrow_mut().retain(|s| s.key != key);
            }
        })
    }
}

/// Avatar loader whose requests finish on [`FixtureImages::flush`].
///
/// Stands in for a network loader: results arrive on a later frame than the
/// request.
#[derive(Default)]
pub struct FixtureImages {
    pending: Rc<RefCell<Vec<(u64, String, CompletionSender)>>>,
    next_key: Cell<u64>,
}

impl FixtureImages {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Finishes every outstanding request.
    pub fn flush(&self) -> usize {
        let done: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for (_, key, sender) in &done {
            sender.avatar_ready(key.clone());
        }
        done.len()
    }
}

impl ImageProvider for FixtureImages {
    fn request(&self, key: &str, sender: CompletionSender) -> Subscription {
        let id = self.next_key.get();
        self.next_key.set(id + 1);
        self.pending
            .borrow_mut()
            .push((id, key.to_string(), sender));

        let pending = Rc::downgrade(&self.pending);
        Subscription::new(move || {
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().retain(|(k, _, _)| *k != id);
            }
        })
    }
}

fn sample_rows() -> Vec<RowState> {
    vec![
        RowState {
            title: "Alice".to_string(),
            preview: "See you tomorrow".to_string(),
            timestamp_label: "12:30".to_string(),
            unread_count: 2,
            online: true,
            avatar_key: Some("alice".to_string()),
            ..RowState::new(RowId::new(1))
        },
        RowState {
            title: "Rust Weekly".to_string(),
            preview: "This week: async closures land on stable".to_string(),
            timestamp_label: "11:02".to_string(),
            unread_count: 128,
            muted: true,
            verified: true,
            ..RowState::new(RowId::new(2))
        },
        RowState {
            title: "Design team".to_string(),
            sender_prefix: Some("Bob".to_string()),
            preview: "mockups at example.org/row".to_string(),
            links: vec![LinkSpan {
                start: 11,
                end: 26,
                target: "https://example.org/row".to_string(),
            }],
            timestamp_label: "10:47".to_string(),
            mention_count: 1,
            reaction_mention: true,
            call_active: true,
            ..RowState::new(RowId::new(3))
        },
        RowState {
            title: "Carol".to_string(),
            preview: "On my way".to_string(),
            timestamp_label: "09:15".to_string(),
            send_state: SendState::Sent,
            read_by_peer: true,
            pinned: true,
            ..RowState::new(RowId::new(4))
        },
        RowState {
            title: "Dave".to_string(),
            content: RowContent::Encrypted,
            preview: "Photo".to_string(),
            timestamp_label: "Mon".to_string(),
            send_state: SendState::Failed,
            ..RowState::new(RowId::new(5))
        },
        RowState {
            title: "Archived chats".to_string(),
            content: RowContent::Folder { dialogs_count: 14 },
            preview: "Eve, Mallory, Trent".to_string(),
            timestamp_label: "Sun".to_string(),
            unread_count: 3,
            muted: true,
            ..RowState::new(RowId::new(6))
        },
    ]
}
