#![forbid(unsafe_code)]

//! Scribble descriptors and the per-gesture item record.
//!
//! A [`Scribble`] is what the renderer reads: a point list plus the visual
//! parameters used to paint it. A [`ScribbleItem`] wraps a scribble with the
//! bookkeeping the lifecycle engine needs between frames (last/next input
//! sample, grace countdown, and the sample-cadence accumulator).
//!
//! # Invariants
//!
//! 1. `state` only moves forward: `Starting` → `Active` → `Stopping`
//!    (`Starting` may jump straight to `Stopping`). `Paused` is only ever
//!    assigned by the host.
//! 2. `delay_remaining` never grows except when refilled from
//!    [`Scribble::delay`] or capped by a stop.
//! 3. `timeout` stays below [`SAMPLE_INTERVAL`](crate::lifecycle::SAMPLE_INTERVAL)
//!    after every tick.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::geometry::Point;

/// Minimum planar distance between consecutive input samples. Closer samples
/// are treated as jitter and do not count as new input.
pub const MIN_SAMPLE_DISTANCE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Identifiers and tags
// ---------------------------------------------------------------------------

/// Opaque identifier of a live scribble item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScribbleId(u64);

impl ScribbleId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScribbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scribble:{}", self.0)
    }
}

/// Lifecycle phase of a scribble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScribbleState {
    /// Accumulating its first samples; timers are not running yet.
    #[default]
    Starting,
    /// Frozen by the host. Never produced by the engine.
    Paused,
    /// Following live input, self-consuming while idle.
    Active,
    /// Input released; decaying toward an empty trail.
    Stopping,
}

impl ScribbleState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Paused => "paused",
            Self::Active => "active",
            Self::Stopping => "stopping",
        }
    }
}

/// Colour tag the renderer resolves against the canvas theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScribbleColor {
    #[default]
    Accent,
    White,
    Black,
    SelectionStroke,
    SelectionFill,
    /// Presenter laser pointer. Its decay can be exempted by settings.
    Laser,
    Muted1,
}

impl ScribbleColor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accent => "accent",
            Self::White => "white",
            Self::Black => "black",
            Self::SelectionStroke => "selection-stroke",
            Self::SelectionFill => "selection-fill",
            Self::Laser => "laser",
            Self::Muted1 => "muted-1",
        }
    }
}

// ---------------------------------------------------------------------------
// Scribble
// ---------------------------------------------------------------------------

/// Visual descriptor of one trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Scribble {
    /// Current lifecycle phase.
    pub state: ScribbleState,
    /// Samples, most recent last.
    pub points: VecDeque<Point>,
    /// Colour tag.
    pub color: ScribbleColor,
    /// Stroke thickness. Decay never takes it below 1.
    pub size: f64,
    /// Stroke opacity in `[0.0, 1.0]`.
    pub opacity: f64,
    /// Fraction of `size` lost per decay step, in `[0.0, 1.0)`.
    pub shrink: Option<f64>,
    /// Grace period restored whenever an idle trail is down to one point.
    pub delay: Duration,
    /// Whether the renderer tapers the tail of the stroke.
    pub taper: bool,
}

impl Default for Scribble {
    fn default() -> Self {
        Self {
            state: ScribbleState::Starting,
            points: VecDeque::new(),
            color: ScribbleColor::Accent,
            size: 20.0,
            opacity: 0.8,
            shrink: Some(0.1),
            delay: Duration::ZERO,
            taper: true,
        }
    }
}

impl Scribble {
    /// Set the colour tag (builder pattern).
    #[must_use]
    pub fn with_color(mut self, color: ScribbleColor) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke size (builder pattern). Clamped to a minimum of 1.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size.max(1.0);
        self
    }

    /// Set the opacity (builder pattern). Clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the shrink factor (builder pattern).
    ///
    /// Values outside `[0.0, 1.0)` are clamped; `None` disables size decay.
    #[must_use]
    pub fn with_shrink(mut self, shrink: Option<f64>) -> Self {
        self.shrink = shrink.map(|s| s.clamp(0.0, 0.999));
        self
    }

    /// Set the idle grace period (builder pattern).
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enable or disable tail tapering (builder pattern).
    #[must_use]
    pub fn with_taper(mut self, taper: bool) -> Self {
        self.taper = taper;
        self
    }

    /// Seed the point list (builder pattern).
    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points = points.into_iter().collect();
        self
    }
}

// ---------------------------------------------------------------------------
// ScribbleItem
// ---------------------------------------------------------------------------

// Bitwise so a NaN written straight into `next` is still consumed once.
fn same_sample(a: Point, b: Point) -> bool {
    a.x.to_bits() == b.x.to_bits()
        && a.y.to_bits() == b.y.to_bits()
        && a.z.to_bits() == b.z.to_bits()
}

/// A scribble plus the state the engine carries between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ScribbleItem {
    id: ScribbleId,
    /// The descriptor handed to the renderer.
    pub scribble: Scribble,
    /// Latest raw sample written by input capture.
    pub next: Option<Point>,
    prev: Option<Point>,
    delay_remaining: Duration,
    timeout: Duration,
}

impl ScribbleItem {
    /// Wrap a scribble. The grace countdown starts at `scribble.delay`.
    #[must_use]
    pub fn new(id: ScribbleId, scribble: Scribble) -> Self {
        let delay_remaining = scribble.delay;
        Self {
            id,
            scribble,
            next: None,
            prev: None,
            delay_remaining,
            timeout: Duration::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ScribbleId {
        self.id
    }

    /// The last sample appended to the trail.
    #[inline]
    #[must_use]
    pub fn prev(&self) -> Option<Point> {
        self.prev
    }

    /// Remaining grace before an idle or stopping trail may shrink.
    #[inline]
    #[must_use]
    pub fn delay_remaining(&self) -> Duration {
        self.delay_remaining
    }

    /// Phase of the sample-cadence accumulator.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record a raw input sample.
    ///
    /// Non-finite samples and samples closer than [`MIN_SAMPLE_DISTANCE`] to
    /// the last appended point are dropped so a resting pointer reads as
    /// idle. Returns whether the sample was accepted.
    pub fn add_point(&mut self, point: Point) -> bool {
        let accepted = point.x.is_finite()
            && point.y.is_finite()
            && self
                .prev
                .is_none_or(|prev| prev.distance(&point) >= MIN_SAMPLE_DISTANCE);
        if accepted {
            self.next = Some(point);
        }
        accepted
    }

    /// Whether the trail has fully decayed and can be dropped by the host.
    #[inline]
    #[must_use]
    pub fn is_vanished(&self) -> bool {
        self.scribble.state == ScribbleState::Stopping && self.scribble.points.is_empty()
    }

    /// Take `next` if it differs from the last appended sample.
    pub(crate) fn take_fresh_sample(&mut self) -> Option<Point> {
        let next = self.next?;
        if self.prev.is_some_and(|prev| same_sample(prev, next)) {
            return None;
        }
        self.prev = Some(next);
        Some(next)
    }

    pub(crate) fn set_delay_remaining(&mut self, delay: Duration) {
        self.delay_remaining = delay;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
