//! Piecewise-linear reconstruction of `y(x)` from trajectory samples.
//!
//! Queries outside the sampled span are clamped to the nearest boundary
//! sample instead of extrapolating the end segments. `query_checked` reports
//! when that happens.

use crate::error::{IvpError, Result};
use crate::grid::validate_monotonic;
use crate::traits::Scalar;
use nalgebra::DVector;
use std::fmt;

/// Non-fatal notice that a query fell outside the sampled span and was clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationDomainWarning {
    pub x: f64,
    pub clamped_to: f64,
}

impl fmt::Display for InterpolationDomainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "query x = {} lies outside the sampled span; clamped to t = {}",
            self.x, self.clamped_to
        )
    }
}

/// Read-only view over sampled `(times, states)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct Interpolant<'a, T: Scalar> {
    times: &'a [f64],
    states: &'a [DVector<T>],
    direction: f64,
}

/// Builds an interpolant borrowing `times` and `states`.
pub fn make_interpolant<'a, T: Scalar>(
    times: &'a [f64],
    states: &'a [DVector<T>],
) -> Result<Interpolant<'a, T>> {
    if times.is_empty() || states.is_empty() {
        return Err(IvpError::EmptySamples);
    }
    if times.len() != states.len() {
        return Err(IvpError::SampleCountMismatch {
            times: times.len(),
            states: states.len(),
        });
    }
    let expected = states[0].len();
    if let Some((index, state)) = states.iter().enumerate().find(|(_, s)| s.len() != expected) {
        return Err(IvpError::InconsistentDimension {
            index,
            expected,
            actual: state.len(),
        });
    }
    validate_monotonic(times)?;

    let direction = if times.len() > 1 {
        (times[times.len() - 1] - times[0]).signum()
    } else {
        1.0
    };
    Ok(Interpolant {
        times,
        states,
        direction,
    })
}

impl<'a, T: Scalar> Interpolant<'a, T> {
    pub fn dimension(&self) -> usize {
        self.states[0].len()
    }

    /// Sampled span as `(first, last)` time.
    pub fn span(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// Interpolated state at `x`, each component independently.
    pub fn query(&self, x: f64) -> DVector<T> {
        self.query_checked(x).0
    }

    /// Like `query`, also reporting whether `x` was clamped.
    pub fn query_checked(&self, x: f64) -> (DVector<T>, Option<InterpolationDomainWarning>) {
        let last = self.times.len() - 1;
        if x.is_nan() {
            return (DVector::from_element(self.dimension(), T::from_real(f64::NAN)), None);
        }

        let key = x * self.direction;
        if key <= self.times[0] * self.direction {
            return (self.states[0].clone(), self.clamp_warning(x, 0));
        }
        if key >= self.times[last] * self.direction {
            return (self.states[last].clone(), self.clamp_warning(x, last));
        }

        // First sample strictly past x; 1 <= hi <= last by the checks above.
        let hi = self
            .times
            .partition_point(|&t| t * self.direction <= key);
        let lo = hi - 1;
        if self.times[lo] == x {
            return (self.states[lo].clone(), None);
        }

        let weight = (x - self.times[lo]) / (self.times[hi] - self.times[lo]);
        let w = T::from_real(weight);
        let (y0, y1) = (&self.states[lo], &self.states[hi]);
        let mut out = y0.clone();
        for i in 0..out.len() {
            out[i] = y0[i] + (y1[i] - y0[i]) * w;
        }
        (out, None)
    }

    pub fn query_many(&self, xs: &[f64]) -> Vec<DVector<T>> {
        xs.iter().map(|&x| self.query(x)).collect()
    }

    /// The interpolant as a plain callable `x -> y(x)`.
    pub fn as_fn(&self) -> impl Fn(f64) -> DVector<T> + 'a {
        let this = *self;
        move |x| this.query(x)
    }

    fn clamp_warning(&self, x: f64, index: usize) -> Option<InterpolationDomainWarning> {
        let boundary = self.times[index];
        (x != boundary).then_some(InterpolationDomainWarning {
            x,
            clamped_to: boundary,
        })
    }
}
