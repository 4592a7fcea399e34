//! Natural cubic splines in one and two dimensions.
//!
//! [`CubicSpline1D`] fits `y(x)` through points with strictly increasing `x`.
//! [`CubicSpline2D`] fits a curve through 2D waypoints by parametrizing both
//! coordinates over the cumulative chord length `t` and fitting one 1D spline
//! per axis.

use tracing::trace;

use crate::linalg::solve;
use crate::{Location, SplineError};

// =============================================================================
// CubicSpline1D
// =============================================================================

/// A natural cubic spline `y(x)`.
///
/// On interval `i` the curve is
/// `a[i] + b[i]·dx + c[i]·dx² + d[i]·dx³` with `dx = x - xs[i]`. The second
/// derivative is zero at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline1D {
    xs: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline1D {
    /// Minimum number of points a 1D spline accepts.
    pub const MIN_POINTS: usize = 2;

    /// Fits a spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// Fails with [`SplineError`] if the slices differ in length, hold fewer
    /// than [`Self::MIN_POINTS`] entries, contain non-finite values, or if
    /// `xs` is not strictly increasing.
    ///
    /// # Example
    ///
    /// ```
    /// use waypath::CubicSpline1D;
    ///
    /// let spline = CubicSpline1D::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0])?;
    /// assert!((spline.evaluate(1.0) - 1.0).abs() < 1e-12);
    /// # Ok::<(), waypath::SplineError>(())
    /// ```
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let n = xs.len();
        if n < Self::MIN_POINTS {
            return Err(SplineError::TooFewPoints {
                count: n,
                min: Self::MIN_POINTS,
            });
        }
        if let Some(index) = xs
            .iter()
            .zip(ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(SplineError::NonFinite { index });
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SplineError::NonIncreasing { index: i + 1 });
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let a = ys.to_vec();

        // Natural boundary rows pin c at both ends; interior rows are the
        // usual h[i-1], 2(h[i-1] + h[i]), h[i] band.
        let mut matrix = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];
        matrix[0][0] = 1.0;
        matrix[n - 1][n - 1] = 1.0;
        for i in 1..n - 1 {
            matrix[i][i - 1] = h[i - 1];
            matrix[i][i] = 2.0 * (h[i - 1] + h[i]);
            matrix[i][i + 1] = h[i];
            rhs[i] = 3.0 * (a[i + 1] - a[i]) / h[i] - 3.0 * (a[i] - a[i - 1]) / h[i - 1];
        }
        let c = solve(matrix, rhs)?;

        let mut b = Vec::with_capacity(n - 1);
        let mut d = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
        }

        Ok(Self {
            xs: xs.to_vec(),
            a,
            b,
            c,
            d,
        })
    }

    /// Evaluates the spline at `x`.
    ///
    /// Values outside `[xs[0], xs[n-1]]` extrapolate the first or last piece.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let i = self.interval(x);
        let dx = x - self.xs[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx * dx + self.d[i] * dx * dx * dx
    }

    /// Index of the polynomial piece used for `x`, clamped to the valid range.
    #[must_use]
    pub fn interval(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        self.xs
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(last)
    }

    /// The knot positions.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }
}

// =============================================================================
// CubicSpline2D
// =============================================================================

/// A smooth curve through ordered 2D waypoints.
///
/// The curve parameter `t` runs from `0` at the first waypoint to
/// [`max_arc_length`](Self::max_arc_length) at the last, where each waypoint
/// sits at the cumulative straight-line distance from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline2D {
    waypoints: Vec<Location>,
    knots: Vec<f64>,
    sx: CubicSpline1D,
    sy: CubicSpline1D,
}

impl CubicSpline2D {
    /// Minimum number of waypoints a path accepts.
    pub const MIN_POINTS: usize = 3;

    /// Fits a curve through `waypoints`.
    ///
    /// # Errors
    ///
    /// Fails with [`SplineError::TooFewPoints`] for fewer than
    /// [`Self::MIN_POINTS`] waypoints, [`SplineError::NonFinite`] for NaN or
    /// infinite coordinates, and [`SplineError::NonIncreasing`] when two
    /// consecutive waypoints coincide (the parametrization would stall).
    pub fn new(waypoints: &[Location]) -> Result<Self, SplineError> {
        if waypoints.len() < Self::MIN_POINTS {
            return Err(SplineError::TooFewPoints {
                count: waypoints.len(),
                min: Self::MIN_POINTS,
            });
        }
        if let Some(index) = waypoints.iter().position(|p| !p.is_finite()) {
            return Err(SplineError::NonFinite { index });
        }

        let mut knots = Vec::with_capacity(waypoints.len());
        let mut total = 0.0;
        knots.push(total);
        for pair in waypoints.windows(2) {
            total += pair[0].distance(pair[1]);
            knots.push(total);
        }

        let xs: Vec<f64> = waypoints.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = waypoints.iter().map(|p| p.y).collect();
        let sx = CubicSpline1D::new(&knots, &xs)?;
        let sy = CubicSpline1D::new(&knots, &ys)?;

        trace!(
            waypoints = waypoints.len(),
            arc_length = total,
            "Fitted cubic spline"
        );

        Ok(Self {
            waypoints: waypoints.to_vec(),
            knots,
            sx,
            sy,
        })
    }

    /// Chord length from the first to the last waypoint, the upper end of `t`.
    #[must_use]
    pub fn max_arc_length(&self) -> f64 {
        self.knots.last().copied().unwrap_or(0.0)
    }

    /// The waypoints the curve passes through.
    #[must_use]
    pub fn waypoints(&self) -> &[Location] {
        &self.waypoints
    }

    /// Curve parameter of each waypoint.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Point on the curve at parameter `t`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Location {
        Location::new(self.sx.evaluate(t), self.sy.evaluate(t))
    }

    /// Point on the curve at fraction `a` of the parameter range.
    ///
    /// `a` is clamped to `[0, 1]`; `0` is the first waypoint and `1` the last.
    #[must_use]
    pub fn location_at(&self, a: f64) -> Location {
        self.evaluate(a.clamp(0.0, 1.0) * self.max_arc_length())
    }

    /// `count` points evenly spaced in the curve parameter, ends included.
    ///
    /// A single sample is the start of the curve; zero samples is empty.
    #[must_use]
    pub fn sample(&self, count: usize) -> Vec<Location> {
        match count {
            0 => Vec::new(),
            1 => vec![self.location_at(0.0)],
            _ => {
                #[allow(clippy::cast_precision_loss)]
                let last = (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        #[allow(clippy::cast_precision_loss)]
                        let a = i as f64 / last;
                        self.location_at(a)
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_waypoints() -> Vec<Location> {
        vec![
            Location::new(0.0, 10.0),
            Location::new(20.0, 5.0),
            Location::new(40.0, 15.0),
            Location::new(60.0, 10.0),
        ]
    }

    mod spline_1d_tests {
        use super::*;

        #[test]
        fn passes_through_knots() {
            let xs = [0.0, 1.5, 4.0, 5.0, 9.0];
            let ys = [2.0, -1.0, 3.0, 3.5, 0.0];
            let spline = CubicSpline1D::new(&xs, &ys).unwrap();
            for (x, y) in xs.iter().zip(ys) {
                assert!((spline.evaluate(*x) - y).abs() < 1e-9);
            }
        }

        #[test]
        fn two_points_is_a_line() {
            let spline = CubicSpline1D::new(&[0.0, 10.0], &[0.0, 5.0]).unwrap();
            assert!((spline.evaluate(4.0) - 2.0).abs() < 1e-12);
        }

        #[test]
        fn collinear_points_stay_linear() {
            let spline = CubicSpline1D::new(&[0.0, 1.0, 3.0, 6.0], &[1.0, 3.0, 7.0, 13.0]).unwrap();
            for x in [0.5, 2.0, 4.5] {
                assert!((spline.evaluate(x) - (2.0 * x + 1.0)).abs() < 1e-9);
            }
        }

        #[test]
        fn interval_is_clamped() {
            let spline = CubicSpline1D::new(&[0.0, 1.0, 2.0, 3.0], &[0.0; 4]).unwrap();
            assert_eq!(spline.interval(-5.0), 0);
            assert_eq!(spline.interval(0.0), 0);
            assert_eq!(spline.interval(1.0), 1);
            assert_eq!(spline.interval(2.5), 2);
            assert_eq!(spline.interval(3.0), 2);
            assert_eq!(spline.interval(99.0), 2);
        }

        #[test]
        fn rejects_mismatched_lengths() {
            let err = CubicSpline1D::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap_err();
            assert_eq!(err, SplineError::LengthMismatch { xs: 3, ys: 2 });
        }

        #[test]
        fn rejects_non_increasing_parameters() {
            let err = CubicSpline1D::new(&[0.0, 2.0, 2.0], &[0.0, 1.0, 2.0]).unwrap_err();
            assert_eq!(err, SplineError::NonIncreasing { index: 2 });

            let err = CubicSpline1D::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err();
            assert_eq!(err, SplineError::NonIncreasing { index: 2 });
        }

        #[test]
        fn rejects_nan() {
            let err = CubicSpline1D::new(&[0.0, 1.0], &[0.0, f64::NAN]).unwrap_err();
            assert_eq!(err, SplineError::NonFinite { index: 1 });
        }
    }

    mod spline_2d_tests {
        use super::*;

        #[test]
        fn two_samples_are_the_endpoints() {
            let points = scenario_waypoints();
            let spline = CubicSpline2D::new(&points).unwrap();
            let samples = spline.sample(2);
            assert_eq!(samples.len(), 2);
            assert!(samples[0].approx_eq(points[0], 1e-9));
            assert!(samples[1].approx_eq(points[3], 1e-9));
        }

        #[test]
        fn knots_are_cumulative_chord_lengths() {
            let spline = CubicSpline2D::new(&[
                Location::new(0.0, 0.0),
                Location::new(3.0, 4.0),
                Location::new(3.0, 10.0),
            ])
            .unwrap();
            assert_eq!(spline.knots(), &[0.0, 5.0, 11.0]);
            assert_eq!(spline.max_arc_length(), 11.0);
        }

        #[test]
        fn location_at_clamps_fraction() {
            let spline = CubicSpline2D::new(&scenario_waypoints()).unwrap();
            assert_eq!(spline.location_at(-1.0), spline.location_at(0.0));
            assert_eq!(spline.location_at(2.0), spline.location_at(1.0));
        }

        #[test]
        fn sample_edge_counts() {
            let spline = CubicSpline2D::new(&scenario_waypoints()).unwrap();
            assert!(spline.sample(0).is_empty());
            assert_eq!(spline.sample(1), vec![spline.location_at(0.0)]);
            assert_eq!(spline.sample(1001).len(), 1001);
        }

        #[test]
        fn too_few_points_rejected() {
            let err = CubicSpline2D::new(&[Location::new(0.0, 0.0), Location::new(1.0, 1.0)])
                .unwrap_err();
            assert_eq!(err, SplineError::TooFewPoints { count: 2, min: 3 });
        }

        #[test]
        fn repeated_waypoint_rejected() {
            let err = CubicSpline2D::new(&[
                Location::new(0.0, 0.0),
                Location::new(5.0, 5.0),
                Location::new(5.0, 5.0),
                Location::new(9.0, 1.0),
            ])
            .unwrap_err();
            assert_eq!(err, SplineError::NonIncreasing { index: 2 });
        }
    }

    fn waypoints_strategy() -> impl Strategy<Value = Vec<Location>> {
        prop::collection::vec((1.0f64..20.0, 0.0f64..45.0), 3..8).prop_map(|steps| {
            let mut x = 0.0;
            steps
                .into_iter()
                .map(|(dx, y)| {
                    let p = Location::new(x, y);
                    x += dx;
                    p
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn waypoints_round_trip(points in waypoints_strategy()) {
            let spline = CubicSpline2D::new(&points).unwrap();
            for (t, p) in spline.knots().iter().zip(&points) {
                prop_assert!(spline.evaluate(*t).approx_eq(*p, 1e-6));
            }
        }

        #[test]
        fn knots_strictly_increase_and_samples_span_the_curve(
            points in waypoints_strategy(),
            count in 2usize..200,
        ) {
            let spline = CubicSpline2D::new(&points).unwrap();
            let knots = spline.knots();
            prop_assert_eq!(knots[0], 0.0);
            prop_assert!(knots.windows(2).all(|k| k[0] < k[1]));
            prop_assert_eq!(*knots.last().unwrap(), spline.max_arc_length());

            let samples = spline.sample(count);
            prop_assert_eq!(samples.len(), count);
            prop_assert!(samples[0].approx_eq(points[0], 1e-9));
            prop_assert!(samples[count - 1].approx_eq(*points.last().unwrap(), 1e-6));
        }
    }
}
