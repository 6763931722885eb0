#![forbid(unsafe_code)]

//! Per-item lifecycle: stop and tick.
//!
//! Every live trail is advanced once per frame by [`tick_item`]. Releasing the
//! pointer calls [`stop_item`], which moves the trail into decay. Between the
//! two, three clocks compete:
//!
//! - the host's frame delta (`elapsed`), which varies frame to frame;
//! - the item's grace countdown (`delay_remaining`), which holds decay off;
//! - the sample accumulator (`timeout`), which lets point mutation happen at
//!   most once per [`SAMPLE_INTERVAL`] regardless of frame rate.
//!
//! # State Machine
//!
//! ```text
//!  Starting ──(>8 points)──▶ Active ──stop──▶ Stopping ──(points empty)──▶ vanished
//!     └──────────────────stop───────────────────▲
//! ```
//!
//! - **Starting**: append fresh samples; timers are frozen.
//! - **Active**: append fresh samples as a sliding window; while idle, drop
//!   the oldest point each sample or refill the grace at one point.
//! - **Stopping**: once grace runs out, drop a point and shrink the stroke
//!   each sample, vanishing when at most one point is left.
//! - **Paused**: untouched.
//!
//! # Invariants
//!
//! 1. A growing trail never holds more than [`MAX_TRAIL_POINTS`] + 1 points
//!    after a tick once grace has run out.
//! 2. While stopping, the point count strictly decreases on every sample-due
//!    tick without grace, reaching zero exactly once.
//! 3. Decayed stroke size never drops below 1.
//! 4. [`tick_item`] is total: it never fails and never panics.

use std::time::Duration;

use crate::error::{Result, ScribbleError};
use crate::scribble::{ScribbleColor, ScribbleId, ScribbleItem, ScribbleState};
use crate::settings::ScribbleSettings;

/// Fixed cadence at which point lists may change.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(16);

/// Ceiling on the grace a non-exempt trail keeps once stopped.
pub const STOP_GRACE: Duration = Duration::from_millis(200);

/// Point count a trail may reach before it starts sliding.
pub const MAX_TRAIL_POINTS: usize = 8;

/// Smallest stroke size decay can produce.
pub const MIN_STROKE_SIZE: f64 = 1.0;

/// Whether `item` is exempt from the stop grace ceiling and idle
/// self-consumption.
///
/// Only laser trails qualify, and only when the user opted in.
#[inline]
#[must_use]
pub fn is_exempt(item: &ScribbleItem, settings: &ScribbleSettings) -> bool {
    item.scribble.color == ScribbleColor::Laser && settings.laser_keep_delay_after_stop
}

/// Move `item` into its decay phase.
///
/// Non-exempt items have their remaining grace capped at
/// [`STOP_GRACE`]; the cap only ever shortens it.
pub fn stop_item(item: &mut ScribbleItem, settings: &ScribbleSettings) {
    if !is_exempt(item, settings) {
        let capped = item.delay_remaining().min(STOP_GRACE);
        item.set_delay_remaining(capped);
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(
        id = %item.id(),
        from = item.scribble.state.as_str(),
        delay_remaining_ms = item.delay_remaining().as_millis() as u64,
        "scribble stopping"
    );
    item.scribble.state = ScribbleState::Stopping;
}

/// Find `id` among `items` and stop it.
///
/// # Errors
///
/// Returns [`ScribbleError::NotFound`] if no item has that id. Nothing is
/// mutated in that case.
pub fn stop_in<'a, I>(
    items: I,
    id: ScribbleId,
    settings: &ScribbleSettings,
) -> Result<&'a mut ScribbleItem>
where
    I: IntoIterator<Item = &'a mut ScribbleItem>,
{
    let item = items
        .into_iter()
        .find(|item| item.id() == id)
        .ok_or(ScribbleError::not_found(id))?;
    stop_item(item, settings);
    Ok(item)
}

/// Advance `item` by `elapsed` and mutate its trail in place.
///
/// Call once per item per frame. A zero `elapsed` still evaluates the
/// sample gate, which is open whenever the accumulator sits at zero.
pub fn tick_item(item: &mut ScribbleItem, elapsed: Duration, settings: &ScribbleSettings) {
    if item.scribble.state == ScribbleState::Starting {
        tick_starting(item);
        return;
    }

    let delay_remaining = item.delay_remaining().saturating_sub(elapsed);
    item.set_delay_remaining(delay_remaining);

    let mut timeout = item.timeout().saturating_add(elapsed);
    if timeout >= SAMPLE_INTERVAL {
        timeout = Duration::ZERO;
    }
    item.set_timeout(timeout);
    let sample_due = timeout.is_zero();

    match item.scribble.state {
        ScribbleState::Active => tick_active(item, sample_due, settings),
        ScribbleState::Stopping => tick_stopping(item, sample_due),
        ScribbleState::Paused | ScribbleState::Starting => {}
    }
}

fn tick_starting(item: &mut ScribbleItem) {
    if let Some(point) = item.take_fresh_sample() {
        item.scribble.points.push_back(point);
    }
    if item.scribble.points.len() > MAX_TRAIL_POINTS {
        #[cfg(feature = "tracing")]
        tracing::debug!(id = %item.id(), points = item.scribble.points.len(), "scribble active");
        item.scribble.state = ScribbleState::Active;
    }
}

fn tick_active(item: &mut ScribbleItem, sample_due: bool, settings: &ScribbleSettings) {
    if let Some(point) = item.take_fresh_sample() {
        item.scribble.points.push_back(point);
        if item.delay_remaining().is_zero() && item.scribble.points.len() > MAX_TRAIL_POINTS {
            item.scribble.points.pop_front();
        }
        return;
    }

    // Idle: consume the tail one sample at a time.
    if !sample_due || is_exempt(item, settings) {
        return;
    }
    if item.scribble.points.len() > 1 {
        item.scribble.points.pop_front();
    } else {
        let delay = item.scribble.delay;
        item.set_delay_remaining(delay);
    }
}

fn tick_stopping(item: &mut ScribbleItem, sample_due: bool) {
    if !item.delay_remaining().is_zero() || !sample_due {
        return;
    }

    let scribble = &mut item.scribble;
    if scribble.points.len() <= 1 {
        if scribble.points.pop_front().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(id = %item.id(), "scribble vanished");
        }
        return;
    }
    if let Some(shrink) = scribble.shrink.filter(|s| *s > 0.0) {
        scribble.size = (scribble.size * (1.0 - shrink)).max(MIN_STROKE_SIZE);
    }
    scribble.points.pop_front();
}
