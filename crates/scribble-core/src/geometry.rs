#![forbid(unsafe_code)]

//! Geometric primitives.

/// A single trail sample in canvas coordinates.
///
/// `z` carries pen pressure in `[0.0, 1.0]`; pointer devices without
/// pressure report [`Point::DEFAULT_PRESSURE`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Pressure.
    pub z: f64,
}

impl Point {
    /// Pressure assigned to samples from devices that do not report it.
    pub const DEFAULT_PRESSURE: f64 = 0.5;

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a point with the default pressure.
    #[inline]
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, Self::DEFAULT_PRESSURE)
    }

    /// Planar distance to `other` (pressure is ignored).
    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::at(x, y)
    }
}
