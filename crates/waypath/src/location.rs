//! Points in field space.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A point on the field, in field-pixel units.
///
/// `Location` is a plain value type. Entities that move own a `Location` and
/// overwrite it each tick; anything that needs to follow them looks them up
/// by id instead of holding on to the value.
///
/// # Example
///
/// ```
/// use waypath::Location;
///
/// let a = Location::new(0.0, 0.0);
/// let b = Location::new(3.0, 4.0);
/// assert_eq!(a.distance(b), 5.0);
/// assert_eq!(a.lerp(b, 0.5), Location::new(1.5, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Location {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a location from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this location as a glam vector.
    #[must_use]
    pub const fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        self.as_dvec2().distance_squared(other.as_dvec2())
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.as_dvec2().lerp(other.as_dvec2(), t).into()
    }

    /// Returns true if both coordinates are within `epsilon` of `other`'s.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }

    /// Returns true if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<DVec2> for Location {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Location> for DVec2 {
    fn from(loc: Location) -> Self {
        loc.as_dvec2()
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Location::new(1.0, 2.0);
        let b = Location::new(-4.0, 14.0);
        assert_eq!(a.distance(b), 13.0);
        assert_eq!(b.distance(a), 13.0);
        assert_eq!(a.distance_squared(b), 169.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Location::new(2.0, 3.0);
        let b = Location::new(10.0, -5.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.25), Location::new(4.0, 1.0));
    }

    #[test]
    fn converts_to_and_from_dvec2() {
        let loc = Location::new(7.5, -1.25);
        let v: DVec2 = loc.into();
        assert_eq!(Location::from(v), loc);
    }

    #[test]
    fn display_rounds_to_two_places() {
        assert_eq!(Location::new(1.0, 2.5).to_string(), "(1.00, 2.50)");
    }

    #[test]
    fn serde_round_trip() {
        let loc = Location::new(12.5, 40.0);
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, r#"{"x":12.5,"y":40.0}"#);
        let back: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);
    }
}
