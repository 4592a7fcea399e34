//! Errors raised while building splines from malformed input.

use thiserror::Error;

/// Invalid input handed to a spline or the linear solver.
///
/// Every variant describes a construction-time problem. A spline that was
/// built successfully never fails afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// Not enough points to define the curve.
    #[error("need at least {min} points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
        /// Minimum number of points required.
        min: usize,
    },

    /// The abscissa and ordinate arrays differ in length.
    #[error("mismatched lengths: {xs} parameters but {ys} values")]
    LengthMismatch {
        /// Number of parameter values.
        xs: usize,
        /// Number of ordinate values.
        ys: usize,
    },

    /// The parametrization does not strictly increase at `index`.
    #[error("parameter at index {index} does not strictly increase")]
    NonIncreasing {
        /// Index of the first offending value.
        index: usize,
    },

    /// A parameter or coordinate is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFinite {
        /// Index of the offending value.
        index: usize,
    },

    /// The linear system has no unique solution.
    #[error("singular matrix: no usable pivot in column {column}")]
    SingularMatrix {
        /// Column where elimination failed.
        column: usize,
    },

    /// The matrix is not square or does not match the right-hand side.
    #[error("matrix is {rows}x{cols} but right-hand side has {rhs} entries")]
    DimensionMismatch {
        /// Row count.
        rows: usize,
        /// Column count of the first offending row.
        cols: usize,
        /// Length of the right-hand side.
        rhs: usize,
    },
}
