#![forbid(unsafe_code)]

//! Session arena: who owns which live scribbles.
//!
//! A [`Session`] groups the trails produced by one input source (a mouse, a
//! pen, a remote collaborator's cursor). The [`SessionArena`] owns every
//! session by id, enumerates them in creation order, and hands out scribble
//! ids that stay unique across all sessions for the arena's lifetime.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, ScribbleError};
use crate::scribble::{Scribble, ScribbleId, ScribbleItem, ScribbleState};

/// Identifier of a session within an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Items owned by one input source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    items: Vec<ScribbleItem>,
}

impl Session {
    #[must_use]
    pub fn items(&self) -> &[ScribbleItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut ScribbleItem> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn item(&self, id: ScribbleId) -> Option<&ScribbleItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owner of every session and the scribbles inside them.
#[derive(Debug, Clone, Default)]
pub struct SessionArena {
    sessions: BTreeMap<SessionId, Session>,
    next_session: u64,
    next_scribble: u64,
}

impl SessionArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty session.
    pub fn create_session(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.sessions.insert(id, Session::default());
        id
    }

    /// Close a session, returning its remaining items.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> impl Iterator<Item = (SessionId, &Session)> {
        self.sessions.iter().map(|(id, session)| (*id, session))
    }

    /// Add a scribble to `session`. The scribble always enters in
    /// [`ScribbleState::Starting`].
    ///
    /// # Errors
    ///
    /// Returns [`ScribbleError::SessionNotFound`] if the session is not open.
    pub fn add_item(&mut self, session: SessionId, mut scribble: Scribble) -> Result<ScribbleId> {
        let owner = self
            .sessions
            .get_mut(&session)
            .ok_or(ScribbleError::SessionNotFound { session })?;
        let id = ScribbleId::new(self.next_scribble);
        self.next_scribble += 1;
        scribble.state = ScribbleState::Starting;
        owner.items.push(ScribbleItem::new(id, scribble));
        Ok(id)
    }

    /// Every item, sessions in creation order and items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &ScribbleItem> {
        self.sessions.values().flat_map(|session| session.items.iter())
    }

    /// Mutable walk in the same order as [`items`](Self::items).
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut ScribbleItem> {
        self.sessions
            .values_mut()
            .flat_map(|session| session.items.iter_mut())
    }

    /// First item with `id`, searching sessions in creation order.
    #[must_use]
    pub fn find_item(&self, id: ScribbleId) -> Option<&ScribbleItem> {
        self.items().find(|item| item.id() == id)
    }

    pub fn find_item_mut(&mut self, id: ScribbleId) -> Option<&mut ScribbleItem> {
        self.items_mut().find(|item| item.id() == id)
    }

    /// Total number of items across sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.values().map(Session::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.values().all(Session::is_empty)
    }

    /// Drop vanished items. Sessions stay open even when emptied.
    ///
    /// Returns the ids of the dropped items in enumeration order.
    pub fn prune_vanished(&mut self) -> Vec<ScribbleId> {
        let mut retired = Vec::new();
        for session in self.sessions.values_mut() {
            session.items.retain(|item| {
                let vanished = item.is_vanished();
                if vanished {
                    retired.push(item.id());
                }
                !vanished
            });
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(count = retired.len(), "pruned vanished scribbles");
        retired
    }
}
