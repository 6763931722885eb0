#![forbid(unsafe_code)]

//! Scribble core: lifecycle engine for transient pointer and laser trails.
//!
//! # Role
//! A canvas host opens a scribble when a gesture begins, writes raw pointer
//! samples into it, and calls [`ScribbleManager::tick`] once per animation
//! frame. This crate owns everything after that: growing the trail, letting
//! it self-consume while the pointer rests, and fading it out after release.
//!
//! # Primary responsibilities
//! - **Lifecycle**: [`lifecycle::tick_item`] and [`lifecycle::stop_item`],
//!   the per-item state machine.
//! - **Policy**: [`lifecycle::is_exempt`], the single place the laser
//!   exemption is decided.
//! - **Ownership**: [`SessionArena`], sessions of items keyed by id.
//! - **Settings**: [`ScribbleSettings`] plus a lock-free [`SettingsHandle`].
//!
//! # How it fits
//! Rendering and gesture capture are the host's business. The host reads
//! [`Scribble::points`] to paint and drops items once
//! [`ScribbleItem::is_vanished`] reports true (or calls
//! [`ScribbleManager::prune_vanished`]).

pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod logging;
pub mod manager;
pub mod scribble;
pub mod session;
pub mod settings;

pub use error::{Result, ScribbleError};
pub use geometry::Point;
pub use lifecycle::{SAMPLE_INTERVAL, STOP_GRACE, is_exempt, stop_item, tick_item};
pub use manager::{ScribbleManager, TickSummary, stop};
pub use scribble::{Scribble, ScribbleColor, ScribbleId, ScribbleItem, ScribbleState};
pub use session::{Session, SessionArena, SessionId};
pub use settings::{ScribbleSettings, SettingsError, SettingsHandle};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
