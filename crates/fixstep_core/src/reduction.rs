//! Rewriting an n-th order scalar ODE as a first-order system.
//!
//! For `y^(n) = g(t, y, y', ..., y^(n-1))` the state is
//! `Y = [y, y', ..., y^(n-1)]` and
//! `F(t, Y) = [Y[1], ..., Y[n-1], g(t, Y)]`.

use crate::error::{IvpError, Result};
use crate::traits::{Derivative, Scalar};
use nalgebra::DVector;

/// First-order system equivalent to an n-th order scalar ODE.
#[derive(Debug, Clone, Copy)]
pub struct ReducedOrder<G> {
    g: G,
    order: usize,
}

/// Wraps `g`, which receives `t` and the slice `[y, y', ..., y^(n-1)]`
/// and returns `y^(n)`.
pub fn reduce_order<T, G>(g: G, order: usize) -> Result<ReducedOrder<G>>
where
    T: Scalar,
    G: Fn(f64, &[T]) -> T,
{
    if order == 0 {
        return Err(IvpError::InvalidOrder(order));
    }
    Ok(ReducedOrder { g, order })
}

impl<G> ReducedOrder<G> {
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<T, G> Derivative<T> for ReducedOrder<G>
where
    T: Scalar,
    G: Fn(f64, &[T]) -> T,
{
    fn dimension(&self) -> Option<usize> {
        Some(self.order)
    }

    /// A state whose length differs from the order yields a NaN vector of
    /// length `order`, which the steppers report as a dimension mismatch.
    fn evaluate(&self, t: f64, y: &DVector<T>) -> DVector<T> {
        let n = self.order;
        if y.len() != n {
            return DVector::from_element(n, T::from_real(f64::NAN));
        }
        let highest = (self.g)(t, &y.as_slice()[..n]);
        DVector::from_fn(n, |i, _| if i + 1 < n { y[i + 1] } else { highest })
    }
}
