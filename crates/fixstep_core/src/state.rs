//! Initial-condition normalization.
//!
//! A scalar or a sequence of numbers is turned into a state of explicit
//! dimension `m >= 1` whose numeric kind (real or complex) is decided once and
//! kept for the whole run.

use crate::error::{IvpError, Result};
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericKind {
    Real,
    Complex,
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericKind::Real => write!(f, "real"),
            NumericKind::Complex => write!(f, "complex"),
        }
    }
}

/// An initial condition tagged with its numeric kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateVector {
    Real(DVector<f64>),
    Complex(DVector<Complex64>),
}

impl StateVector {
    pub fn real(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(IvpError::EmptyState);
        }
        Ok(StateVector::Real(DVector::from_column_slice(values)))
    }

    /// Builds a state from complex values. The state is real unless some
    /// element has a non-zero imaginary part.
    pub fn complex(values: &[Complex64]) -> Result<Self> {
        if values.is_empty() {
            return Err(IvpError::EmptyState);
        }
        if values.iter().all(|v| v.im == 0.0) {
            let re: Vec<f64> = values.iter().map(|v| v.re).collect();
            return Ok(StateVector::Real(DVector::from_vec(re)));
        }
        Ok(StateVector::Complex(DVector::from_column_slice(values)))
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            StateVector::Real(_) => NumericKind::Real,
            StateVector::Complex(_) => NumericKind::Complex,
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            StateVector::Real(v) => v.len(),
            StateVector::Complex(v) => v.len(),
        }
    }

    pub fn as_real(&self) -> Option<&DVector<f64>> {
        match self {
            StateVector::Real(v) => Some(v),
            StateVector::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&DVector<Complex64>> {
        match self {
            StateVector::Real(_) => None,
            StateVector::Complex(v) => Some(v),
        }
    }

    /// Lossless promotion to the complex kind.
    pub fn to_complex(&self) -> DVector<Complex64> {
        match self {
            StateVector::Real(v) => v.map(|re| Complex64::new(re, 0.0)),
            StateVector::Complex(v) => v.clone(),
        }
    }
}

impl From<f64> for StateVector {
    fn from(value: f64) -> Self {
        StateVector::Real(DVector::from_element(1, value))
    }
}

impl From<Complex64> for StateVector {
    fn from(value: Complex64) -> Self {
        if value.im == 0.0 {
            StateVector::from(value.re)
        } else {
            StateVector::Complex(DVector::from_element(1, value))
        }
    }
}
