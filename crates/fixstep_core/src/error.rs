//! Error types for grid construction, stepping and interpolation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IvpError>;

/// Reasons a time grid is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Time grid needs at least two points, got {0}.")]
    TooFewPoints(usize),

    #[error("Time grid contains non-finite value {value} at index {index}.")]
    NonFinite { index: usize, value: f64 },

    #[error("Time grid is not strictly monotonic at index {index} ({previous} -> {current}).")]
    NotMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Uniform grid requires at least one step.")]
    ZeroSteps,

    #[error("Integration span is empty (start = end = {0}).")]
    EmptySpan(f64),

    #[error("Time grid would need {requested} steps, more than the limit of {limit}.")]
    TooManySteps { requested: f64, limit: usize },

    #[error("Step size dt = {dt} does not advance from t0 = {t0} toward t_end = {t_end}.")]
    InvalidStep { t0: f64, t_end: f64, dt: f64 },
}

/// Errors surfaced by the integration and interpolation entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IvpError {
    #[error("Invalid time grid: {0}")]
    InvalidGrid(#[from] GridError),

    #[error("Derivative dimension mismatch at t = {t}: expected {expected}, got {actual}.")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        t: f64,
    },

    #[error("Unknown integration method \"{0}\"; expected \"euler\" or \"rk4\".")]
    UnknownMethod(String),

    #[error("Initial state must have positive dimension.")]
    EmptyState,

    #[error("Order reduction requires order >= 1, got {0}.")]
    InvalidOrder(usize),

    #[error("Interpolant requires at least one sample.")]
    EmptySamples,

    #[error("Sample count mismatch: {times} times but {states} states.")]
    SampleCountMismatch { times: usize, states: usize },

    #[error("State {index} has dimension {actual}, expected {expected}.")]
    InconsistentDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
