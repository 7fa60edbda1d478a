//! Time grids for fixed-step integration.

use crate::error::{GridError, IvpError};
use serde::{Deserialize, Serialize};

/// A ratio of span to step within this relative distance of an integer is
/// treated as that integer when counting steps.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Largest number of steps a generated grid may hold.
pub const MAX_GRID_STEPS: usize = 100_000_000;

/// A validated, strictly monotonic sequence of at least two finite times.
/// Increasing grids integrate forward, decreasing grids backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// `n` equal steps from `a` to `b`, both ends included.
    pub fn uniform(a: f64, b: f64, n: usize) -> Result<Self, GridError> {
        check_finite(0, a)?;
        check_finite(1, b)?;
        if n == 0 {
            return Err(GridError::ZeroSteps);
        }
        check_step_count(n as f64)?;
        if a == b {
            return Err(GridError::EmptySpan(a));
        }
        let h = (b - a) / n as f64;
        let mut points: Vec<f64> = (0..n).map(|i| a + i as f64 * h).collect();
        points.push(b);
        Self::explicit(points)
    }

    /// Steps of size `dt` from `t0` toward `t_end`. When `dt` does not divide
    /// the span, the final step is shortened so the grid ends at `t_end`.
    pub fn from_step(t0: f64, t_end: f64, dt: f64) -> Result<Self, GridError> {
        check_finite(0, t0)?;
        check_finite(1, t_end)?;
        if t0 == t_end {
            return Err(GridError::EmptySpan(t0));
        }
        let span = t_end - t0;
        if !dt.is_finite() || dt == 0.0 || span.signum() != dt.signum() {
            return Err(GridError::InvalidStep { t0, t_end, dt });
        }

        let ratio = span / dt;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= STEP_COUNT_TOLERANCE * nearest.max(1.0) {
            nearest.max(1.0)
        } else {
            ratio.ceil()
        };
        check_step_count(steps)?;
        let n = steps as usize;

        let mut points: Vec<f64> = (0..n).map(|i| t0 + i as f64 * dt).collect();
        points.push(t_end);
        Self::explicit(points)
    }

    pub fn explicit(points: Vec<f64>) -> Result<Self, GridError> {
        if points.len() < 2 {
            return Err(GridError::TooFewPoints(points.len()));
        }
        validate_monotonic(&points)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// `1.0` for forward grids, `-1.0` for backward grids.
    pub fn direction(&self) -> f64 {
        (self.end() - self.start()).signum()
    }

    /// Local step sizes `t[i] - t[i-1]`.
    pub fn step_sizes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.windows(2).map(|w| w[1] - w[0])
    }
}

impl TryFrom<Vec<f64>> for TimeGrid {
    type Error = IvpError;

    fn try_from(points: Vec<f64>) -> Result<Self, Self::Error> {
        Ok(Self::explicit(points)?)
    }
}

impl From<TimeGrid> for Vec<f64> {
    fn from(grid: TimeGrid) -> Self {
        grid.points
    }
}

fn check_finite(index: usize, value: f64) -> Result<(), GridError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GridError::NonFinite { index, value })
    }
}

fn check_step_count(steps: f64) -> Result<(), GridError> {
    if steps.is_finite() && steps <= MAX_GRID_STEPS as f64 {
        Ok(())
    } else {
        Err(GridError::TooManySteps {
            requested: steps,
            limit: MAX_GRID_STEPS,
        })
    }
}

/// Checks that `points` are finite and strictly monotonic in one direction.
/// Shared with interpolant construction, where a single point is allowed.
pub(crate) fn validate_monotonic(points: &[f64]) -> Result<(), GridError> {
    for (index, &value) in points.iter().enumerate() {
        check_finite(index, value)?;
    }
    if points.len() < 2 {
        return Ok(());
    }
    let direction = (points[1] - points[0]).signum();
    for (i, pair) in points.windows(2).enumerate() {
        let gap = pair[1] - pair[0];
        if gap == 0.0 || gap.signum() != direction {
            return Err(GridError::NotMonotonic {
                index: i + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}
