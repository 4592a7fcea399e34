//! Axis-aligned field rectangle anchored at the origin.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::Location;

/// The playable rectangle `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The larger of the two dimensions.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Check if a point is inside the bounds (edges included).
    #[must_use]
    pub fn contains(&self, point: Location) -> bool {
        self.contains_with_tolerance(point, 0.0)
    }

    /// Check if a point is inside the bounds grown by `tolerance` on every side.
    #[must_use]
    pub fn contains_with_tolerance(&self, point: Location, tolerance: f64) -> bool {
        point.x >= -tolerance
            && point.x <= self.width + tolerance
            && point.y >= -tolerance
            && point.y <= self.height + tolerance
    }

    /// Returns the bounds shrunk by `margin` on every side as `(min, max)` corners.
    #[must_use]
    pub fn inset(&self, margin: f64) -> (Location, Location) {
        (
            Location::new(margin, margin),
            Location::new(self.width - margin, self.height - margin),
        )
    }

    /// Where a ray leaving `origin` along `direction` crosses the boundary.
    ///
    /// `origin` is expected to lie inside the bounds. Returns `None` for a
    /// zero-length direction.
    ///
    /// # Example
    ///
    /// ```
    /// use glam::DVec2;
    /// use waypath::{Bounds, Location};
    ///
    /// let bounds = Bounds::new(80.0, 45.0);
    /// let exit = bounds.exit_point(Location::new(10.0, 20.0), DVec2::X).unwrap();
    /// assert_eq!(exit, Location::new(80.0, 20.0));
    /// ```
    #[must_use]
    pub fn exit_point(&self, origin: Location, direction: DVec2) -> Option<Location> {
        if direction.length_squared() == 0.0 || !direction.is_finite() {
            return None;
        }
        let axis_t = |pos: f64, dir: f64, extent: f64| {
            if dir > 0.0 {
                (extent - pos) / dir
            } else if dir < 0.0 {
                -pos / dir
            } else {
                f64::INFINITY
            }
        };
        let t = axis_t(origin.x, direction.x, self.width)
            .min(axis_t(origin.y, direction.y, self.height))
            .max(0.0);
        Some((origin.as_dvec2() + direction * t).into())
    }
}
