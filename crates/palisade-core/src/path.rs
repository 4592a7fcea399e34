//! The enemy path: a spline through waypoints, materialized as a polyline.
//!
//! Enemies move by distance along the polyline, so an enemy's speed is true
//! distance per tick no matter how the spline parameter is distributed.

use serde::Serialize;
use waypath::{Bounds, CubicSpline2D, Location, SplineError};

/// A sampled path from the first waypoint to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    spline: CubicSpline2D,
    points: Vec<Location>,
    /// Distance from the start to each point.
    cumulative: Vec<f64>,
}

impl Path {
    /// Fits a spline through `waypoints` and samples `samples` points from it.
    ///
    /// At least two samples are always taken so the polyline has both ends.
    ///
    /// # Errors
    ///
    /// Returns a [`SplineError`] if the waypoints cannot define a spline.
    ///
    /// # Example
    ///
    /// ```
    /// use palisade_core::path::Path;
    /// use waypath::Location;
    ///
    /// let path = Path::from_waypoints(
    ///     &[
    ///         Location::new(0.0, 10.0),
    ///         Location::new(20.0, 5.0),
    ///         Location::new(40.0, 15.0),
    ///         Location::new(60.0, 10.0),
    ///     ],
    ///     1001,
    /// )?;
    /// assert_eq!(path.points().len(), 1001);
    /// assert!(path.length() > 60.0);
    /// # Ok::<(), waypath::SplineError>(())
    /// ```
    pub fn from_waypoints(waypoints: &[Location], samples: usize) -> Result<Self, SplineError> {
        let spline = CubicSpline2D::new(waypoints)?;
        let points = spline.sample(samples.max(2));

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }

        Ok(Self {
            spline,
            points,
            cumulative,
        })
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// The sampled polyline.
    #[must_use]
    pub fn points(&self) -> &[Location] {
        &self.points
    }

    /// The waypoints the path was fitted through.
    #[must_use]
    pub fn waypoints(&self) -> &[Location] {
        self.spline.waypoints()
    }

    /// Where enemies enter.
    #[must_use]
    pub fn start(&self) -> Location {
        self.points[0]
    }

    /// Where enemies reach the base.
    #[must_use]
    pub fn end(&self) -> Location {
        self.points[self.points.len() - 1]
    }

    /// Point at `distance` along the polyline, clamped to the ends.
    #[must_use]
    pub fn location_at_distance(&self, distance: f64) -> Location {
        let idx = self.cumulative.partition_point(|&c| c <= distance);
        if idx == 0 {
            return self.start();
        }
        if idx >= self.points.len() {
            return self.end();
        }
        let (d0, d1) = (self.cumulative[idx - 1], self.cumulative[idx]);
        let t = (distance - d0) / (d1 - d0);
        self.points[idx - 1].lerp(self.points[idx], t)
    }

    /// Point at `fraction` of the path length; `0` is the start and `1` the end.
    #[must_use]
    pub fn location_at(&self, fraction: f64) -> Location {
        self.location_at_distance(fraction.clamp(0.0, 1.0) * self.length())
    }

    /// Shortest distance from `point` to the polyline.
    #[must_use]
    pub fn distance_to(&self, point: Location) -> f64 {
        let p = point.as_dvec2();
        self.points
            .windows(2)
            .map(|seg| {
                let (a, b) = (seg[0].as_dvec2(), seg[1].as_dvec2());
                let ab = b - a;
                let len_sq = ab.length_squared();
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                p.distance(a + ab * t)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// True if every sampled point lies within `bounds` grown by `tolerance`.
    #[must_use]
    pub fn within(&self, bounds: &Bounds, tolerance: f64) -> bool {
        self.points
            .iter()
            .all(|p| bounds.contains_with_tolerance(*p, tolerance))
    }
}

/// Serializable summary of the path for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathView {
    /// The waypoints.
    pub waypoints: Vec<Location>,
    /// The sampled polyline.
    pub points: Vec<Location>,
    /// Total polyline length.
    pub length: f64,
}

impl From<&Path> for PathView {
    fn from(path: &Path) -> Self {
        Self {
            waypoints: path.waypoints().to_vec(),
            points: path.points().to_vec(),
            length: path.length(),
        }
    }
}
