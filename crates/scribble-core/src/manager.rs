#![forbid(unsafe_code)]

//! Scribble lifecycle manager: the host-facing entry point.
//!
//! [`ScribbleManager`] owns a [`SessionArena`] and a [`SettingsHandle`] and
//! drives every live trail from the host's animation loop.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use scribble_core::{Scribble, ScribbleColor, ScribbleManager, ScribbleSettings};
//!
//! let mut manager = ScribbleManager::new(ScribbleSettings::default());
//! let session = manager.create_session();
//! let id = manager
//!     .add_scribble(session, Scribble::default().with_color(ScribbleColor::Laser))
//!     .unwrap();
//!
//! for i in 0..12 {
//!     manager.add_point(id, f64::from(i) * 4.0, 0.0).unwrap();
//!     manager.tick(Duration::from_millis(16));
//! }
//! manager.stop(id).unwrap();
//!
//! while manager.arena().find_item(id).is_some_and(|item| !item.is_vanished()) {
//!     manager.tick(Duration::from_millis(16));
//! }
//! assert_eq!(manager.prune_vanished(), vec![id]);
//! ```
//!
//! # Failure Modes
//!
//! - `stop` / `add_point` with an id no session holds return
//!   [`ScribbleError::NotFound`] and mutate nothing.
//! - A frame clock that goes backwards (`tick_frame` with an earlier instant)
//!   is treated as zero elapsed time.

use std::time::Duration;

use web_time::Instant;

use crate::error::{Result, ScribbleError};
use crate::geometry::Point;
use crate::lifecycle::{stop_in, stop_item, tick_item};
use crate::scribble::{Scribble, ScribbleId, ScribbleItem};
use crate::session::{SessionArena, SessionId};
use crate::settings::{ScribbleSettings, SettingsHandle};

/// Stop the item `id`, searching `arena` sessions in creation order.
///
/// # Errors
///
/// Returns [`ScribbleError::NotFound`] if no session holds `id`.
pub fn stop<'a>(
    arena: &'a mut SessionArena,
    id: ScribbleId,
    settings: &ScribbleSettings,
) -> Result<&'a mut ScribbleItem> {
    stop_in(arena.items_mut(), id, settings)
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Items advanced this frame.
    pub ticked: usize,
    /// Items whose trail emptied this frame.
    pub vanished: usize,
}

/// Owns live scribbles and advances them once per frame.
#[derive(Debug)]
pub struct ScribbleManager {
    arena: SessionArena,
    settings: SettingsHandle,
    last_frame: Option<Instant>,
}

impl ScribbleManager {
    /// Create a manager with its own settings cell.
    #[must_use]
    pub fn new(settings: ScribbleSettings) -> Self {
        Self::with_handle(SettingsHandle::new(settings))
    }

    /// Create a manager reading from a shared settings cell.
    #[must_use]
    pub fn with_handle(settings: SettingsHandle) -> Self {
        Self {
            arena: SessionArena::new(),
            settings,
            last_frame: None,
        }
    }

    #[must_use]
    pub fn arena(&self) -> &SessionArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SessionArena {
        &mut self.arena
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn create_session(&mut self) -> SessionId {
        self.arena.create_session()
    }

    /// Open a new trail in `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ScribbleError::SessionNotFound`] if the session is not open.
    pub fn add_scribble(&mut self, session: SessionId, scribble: Scribble) -> Result<ScribbleId> {
        let id = self.arena.add_item(session, scribble)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(id = %id, session = %session, "scribble added");
        Ok(id)
    }

    /// Feed a raw pointer sample to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ScribbleError::NotFound`] if no session holds `id`.
    pub fn add_point(&mut self, id: ScribbleId, x: f64, y: f64) -> Result<&mut ScribbleItem> {
        let item = self
            .arena
            .find_item_mut(id)
            .ok_or(ScribbleError::not_found(id))?;
        item.add_point(Point::at(x, y));
        Ok(item)
    }

    /// Move `id` into its decay phase.
    ///
    /// # Errors
    ///
    /// Returns [`ScribbleError::NotFound`] if no session holds `id`.
    pub fn stop(&mut self, id: ScribbleId) -> Result<&mut ScribbleItem> {
        let settings = self.settings.load();
        let result = stop(&mut self.arena, id, &settings);
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::warn!(id = %id, error = %err, "stop requested for unknown scribble");
        }
        result
    }

    /// Stop every trail that has not vanished yet. Returns how many were
    /// stopped.
    pub fn stop_all(&mut self) -> usize {
        let settings = self.settings.load();
        let mut stopped = 0;
        for item in self.arena.items_mut().filter(|item| !item.is_vanished()) {
            stop_item(item, &settings);
            stopped += 1;
        }
        stopped
    }

    /// Advance every item by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) -> TickSummary {
        let settings = self.settings.load();
        let mut summary = TickSummary::default();
        for item in self.arena.items_mut() {
            let was_vanished = item.is_vanished();
            tick_item(item, elapsed, &settings);
            summary.ticked += 1;
            if !was_vanished && item.is_vanished() {
                summary.vanished += 1;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            elapsed_us = elapsed.as_micros() as u64,
            ticked = summary.ticked,
            vanished = summary.vanished,
            "scribble frame"
        );
        summary
    }

    /// Advance every item by the time since the previous `tick_frame` call.
    ///
    /// The first frame advances by zero.
    pub fn tick_frame(&mut self, now: Instant) -> TickSummary {
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        self.tick(elapsed)
    }

    /// Drop vanished items. See [`SessionArena::prune_vanished`].
    pub fn prune_vanished(&mut self) -> Vec<ScribbleId> {
        self.arena.prune_vanished()
    }
}

impl Default for ScribbleManager {
    fn default() -> Self {
        Self::new(ScribbleSettings::default())
    }
}
