use crate::error::Result;
use nalgebra::{ComplexField, DVector};
use num_traits::Zero;
use std::fmt::Debug;

/// A trait for the element type of an integrated state.
/// Covers `f64` (real kind) and `Complex<f64>` (complex kind); time and step
/// sizes stay real and are lifted with `from_real`.
pub trait Scalar: ComplexField<RealField = f64> + Zero + Copy + Debug {}

impl<T: ComplexField<RealField = f64> + Zero + Copy + Debug> Scalar for T {}

/// The right-hand side `dy/dt = f(t, y)` of a first-order system.
pub trait Derivative<T: Scalar> {
    /// Returns the state dimension the system requires, if it fixes one.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Evaluates the derivative at `(t, y)`.
    /// Must return a vector of the same length as `y` and must not depend on
    /// any state outside its arguments.
    fn evaluate(&self, t: f64, y: &DVector<T>) -> DVector<T>;
}

impl<T, F> Derivative<T> for F
where
    T: Scalar,
    F: Fn(f64, &DVector<T>) -> DVector<T>,
{
    fn evaluate(&self, t: f64, y: &DVector<T>) -> DVector<T> {
        self(t, y)
    }
}

/// A scalar ODE `y' = f(t, y)` viewed as a one-dimensional system.
#[derive(Debug, Clone, Copy)]
pub struct ScalarDerivative<F> {
    f: F,
}

/// Wraps a scalar right-hand side so it can be integrated as a dimension-1 state.
pub fn scalar_derivative<T, F>(f: F) -> ScalarDerivative<F>
where
    T: Scalar,
    F: Fn(f64, T) -> T,
{
    ScalarDerivative { f }
}

impl<T, F> Derivative<T> for ScalarDerivative<F>
where
    T: Scalar,
    F: Fn(f64, T) -> T,
{
    fn dimension(&self) -> Option<usize> {
        Some(1)
    }

    fn evaluate(&self, t: f64, y: &DVector<T>) -> DVector<T> {
        let value = y.get(0).copied().unwrap_or_else(T::zero);
        DVector::from_element(1, (self.f)(t, value))
    }
}

/// A trait for solvers that advance a state by one step.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    /// dt: step size, negative when integrating backward
    fn step(
        &mut self,
        system: &impl Derivative<T>,
        t: &mut f64,
        state: &mut DVector<T>,
        dt: f64,
    ) -> Result<()>;

    /// Global order of accuracy.
    fn order(&self) -> usize;

    /// Derivative evaluations per step.
    fn stages(&self) -> usize;
}
