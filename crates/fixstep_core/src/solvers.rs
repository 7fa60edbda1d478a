use crate::error::{IvpError, Result};
use crate::traits::{Derivative, Scalar, Steppable};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Checks a system's declared dimension against the state before stepping.
fn check_dimension<T: Scalar>(system: &impl Derivative<T>, t: f64, y: &DVector<T>) -> Result<()> {
    match system.dimension() {
        Some(expected) if expected != y.len() => Err(IvpError::DimensionMismatch {
            expected,
            actual: y.len(),
            t,
        }),
        _ => Ok(()),
    }
}

/// Evaluates `system` and checks that the derivative has the shape of `y`.
fn evaluate<T: Scalar>(system: &impl Derivative<T>, t: f64, y: &DVector<T>) -> Result<DVector<T>> {
    let dy = system.evaluate(t, y);
    if dy.len() != y.len() {
        return Err(IvpError::DimensionMismatch {
            expected: y.len(),
            actual: dy.len(),
            t,
        });
    }
    Ok(dy)
}

/// Explicit (forward) Euler Solver
/// y_next = y + dt * f(t, y)
/// No stability control: a step size outside the stability region diverges.
pub struct Euler<T: Scalar> {
    _kind: std::marker::PhantomData<T>,
}

impl<T: Scalar> Euler<T> {
    pub fn new() -> Self {
        Self {
            _kind: std::marker::PhantomData,
        }
    }
}

impl<T: Scalar> Default for Euler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Steppable<T> for Euler<T> {
    fn step(
        &mut self,
        system: &impl Derivative<T>,
        t: &mut f64,
        state: &mut DVector<T>,
        dt: f64,
    ) -> Result<()> {
        check_dimension(system, *t, state)?;
        let h = T::from_real(dt);
        let k = evaluate(system, *t, state)?;
        for i in 0..state.len() {
            state[i] += h * k[i];
        }
        *t += dt;
        Ok(())
    }

    fn order(&self) -> usize {
        1
    }

    fn stages(&self) -> usize {
        1
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    tmp: DVector<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            tmp: DVector::zeros(dim),
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(
        &mut self,
        system: &impl Derivative<T>,
        t: &mut f64,
        state: &mut DVector<T>,
        dt: f64,
    ) -> Result<()> {
        let h = T::from_real(dt);
        let half_h = T::from_real(0.5 * dt);
        let sixth_h = T::from_real(dt / 6.0);
        let two = T::from_real(2.0);

        let t0 = *t;
        check_dimension(system, t0, state)?;
        if self.tmp.len() != state.len() {
            self.tmp = DVector::zeros(state.len());
        }

        // k1 = f(t, y)
        let k1 = evaluate(system, t0, state)?;

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + half_h * k1[i];
        }
        let k2 = evaluate(system, t0 + 0.5 * dt, &self.tmp)?;

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + half_h * k2[i];
        }
        let k3 = evaluate(system, t0 + 0.5 * dt, &self.tmp)?;

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + h * k3[i];
        }
        let k4 = evaluate(system, t0 + dt, &self.tmp)?;

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] += sixth_h * (k1[i] + two * k2[i] + two * k3[i] + k4[i]);
        }

        *t = t0 + dt;
        Ok(())
    }

    fn order(&self) -> usize {
        4
    }

    fn stages(&self) -> usize {
        4
    }
}

/// Stepping method selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Euler,
    #[default]
    Rk4,
}

impl Method {
    pub(crate) fn build<T: Scalar>(self, dim: usize) -> Stepper<T> {
        match self {
            Method::Euler => Stepper::Euler(Euler::new()),
            Method::Rk4 => Stepper::Rk4(RK4::new(dim)),
        }
    }

    pub fn order(self) -> usize {
        match self {
            Method::Euler => 1,
            Method::Rk4 => 4,
        }
    }

    pub fn stages(self) -> usize {
        match self {
            Method::Euler => 1,
            Method::Rk4 => 4,
        }
    }
}

impl FromStr for Method {
    type Err = IvpError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Method::Euler),
            "rk4" => Ok(Method::Rk4),
            _ => Err(IvpError::UnknownMethod(name.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Euler => write!(f, "euler"),
            Method::Rk4 => write!(f, "rk4"),
        }
    }
}

pub(crate) enum Stepper<T: Scalar> {
    Euler(Euler<T>),
    Rk4(RK4<T>),
}

impl<T: Scalar> Stepper<T> {
    pub(crate) fn step(
        &mut self,
        system: &impl Derivative<T>,
        t: &mut f64,
        state: &mut DVector<T>,
        dt: f64,
    ) -> Result<()> {
        match self {
            Stepper::Euler(s) => s.step(system, t, state, dt),
            Stepper::Rk4(s) => s.step(system, t, state, dt),
        }
    }
}
