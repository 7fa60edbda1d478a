use crate::error::Result;
use crate::interpolate::{make_interpolant, Interpolant};
use crate::state::NumericKind;
use crate::traits::Scalar;
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Trajectory of a fixed-step run: `times[i]` pairs with `states[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<T: Scalar> {
    times: Vec<f64>,
    states: Vec<DVector<T>>,
}

impl<T: Scalar> Solution<T> {
    pub(crate) fn with_capacity(points: usize) -> Self {
        Self {
            times: Vec::with_capacity(points),
            states: Vec::with_capacity(points),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: DVector<T>) {
        self.times.push(t);
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.times.len().saturating_sub(1)
    }

    pub fn dimension(&self) -> usize {
        self.states.first().map_or(0, |s| s.len())
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[DVector<T>] {
        &self.states
    }

    pub fn initial_state(&self) -> Option<&DVector<T>> {
        self.states.first()
    }

    pub fn final_state(&self) -> Option<&DVector<T>> {
        self.states.last()
    }

    /// One component of the state across all times.
    /// Panics if `index >= self.dimension()`.
    pub fn component(&self, index: usize) -> Vec<T> {
        self.states.iter().map(|s| s[index]).collect()
    }

    /// The trajectory as plain values when the state is one-dimensional.
    pub fn scalar_values(&self) -> Option<Vec<T>> {
        (self.dimension() == 1).then(|| self.component(0))
    }

    /// Piecewise-linear interpolant over this trajectory.
    pub fn interpolant(&self) -> Result<Interpolant<'_, T>> {
        make_interpolant(&self.times, &self.states)
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<DVector<T>>) {
        (self.times, self.states)
    }
}

/// A trajectory whose numeric kind was chosen at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateSolution {
    Real(Solution<f64>),
    Complex(Solution<Complex64>),
}

impl StateSolution {
    pub fn kind(&self) -> NumericKind {
        match self {
            StateSolution::Real(_) => NumericKind::Real,
            StateSolution::Complex(_) => NumericKind::Complex,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StateSolution::Real(s) => s.len(),
            StateSolution::Complex(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn times(&self) -> &[f64] {
        match self {
            StateSolution::Real(s) => s.times(),
            StateSolution::Complex(s) => s.times(),
        }
    }

    pub fn as_real(&self) -> Option<&Solution<f64>> {
        match self {
            StateSolution::Real(s) => Some(s),
            StateSolution::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Solution<Complex64>> {
        match self {
            StateSolution::Real(_) => None,
            StateSolution::Complex(s) => Some(s),
        }
    }
}
