use crate::error::{IvpError, Result};
use crate::grid::TimeGrid;
use crate::solution::{Solution, StateSolution};
use crate::solvers::Method;
use crate::state::StateVector;
use crate::traits::{Derivative, Scalar};
use nalgebra::DVector;
use num_complex::Complex64;

/// Drives a stepper across a time grid, recording every grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    grid: TimeGrid,
    method: Method,
}

impl Integrator {
    pub fn new(grid: TimeGrid, method: Method) -> Self {
        Self { grid, method }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Integrates from `y0` at the first grid point. The stepper sees the
    /// local gap `t[i] - t[i-1]` and the recorded times are the grid points
    /// themselves. Non-finite values are stored as computed.
    pub fn run<T, S>(&self, system: &S, y0: &[T]) -> Result<Solution<T>>
    where
        T: Scalar,
        S: Derivative<T>,
    {
        if y0.is_empty() {
            return Err(IvpError::EmptyState);
        }
        let dim = y0.len();
        if let Some(expected) = system.dimension() {
            if expected != dim {
                return Err(IvpError::DimensionMismatch {
                    expected,
                    actual: dim,
                    t: self.grid.start(),
                });
            }
        }

        let points = self.grid.points();
        let mut stepper = self.method.build::<T>(dim);
        let mut solution = Solution::with_capacity(points.len());
        let mut state = DVector::from_column_slice(y0);
        solution.push(points[0], state.clone());

        for window in points.windows(2) {
            let mut t = window[0];
            stepper.step(system, &mut t, &mut state, window[1] - window[0])?;
            solution.push(window[1], state.clone());
        }

        Ok(solution)
    }
}

/// Integrates from `t0` to `t_end` with step `dt`; the last step is
/// shortened when `dt` does not divide the span.
pub fn integrate<T, S>(
    system: &S,
    t0: f64,
    y0: &[T],
    t_end: f64,
    dt: f64,
    method: Method,
) -> Result<Solution<T>>
where
    T: Scalar,
    S: Derivative<T>,
{
    let grid = TimeGrid::from_step(t0, t_end, dt)?;
    Integrator::new(grid, method).run(system, y0)
}

/// Integrates over `[a, b]` in `n` equal steps of `h = (b - a) / n`.
pub fn integrate_uniform<T, S>(
    system: &S,
    a: f64,
    b: f64,
    n: usize,
    y0: &[T],
    method: Method,
) -> Result<Solution<T>>
where
    T: Scalar,
    S: Derivative<T>,
{
    let grid = TimeGrid::uniform(a, b, n)?;
    Integrator::new(grid, method).run(system, y0)
}

/// Integrates over the explicit evaluation times `t_eval`, starting from
/// `y0` at `t0`. `t0` is prepended to the grid unless `t_eval` already starts
/// there, so the returned trajectory always begins with the initial state.
pub fn integrate_at<T, S>(
    system: &S,
    t0: f64,
    y0: &[T],
    t_eval: &[f64],
    method: Method,
) -> Result<Solution<T>>
where
    T: Scalar,
    S: Derivative<T>,
{
    let mut points = Vec::with_capacity(t_eval.len() + 1);
    if t_eval.first() != Some(&t0) {
        points.push(t0);
    }
    points.extend_from_slice(t_eval);
    let grid = TimeGrid::explicit(points)?;
    Integrator::new(grid, method).run(system, y0)
}

/// Integrates a runtime-tagged initial condition, keeping its numeric kind.
pub fn integrate_state<S>(
    system: &S,
    y0: &StateVector,
    grid: &TimeGrid,
    method: Method,
) -> Result<StateSolution>
where
    S: Derivative<f64> + Derivative<Complex64>,
{
    let integrator = Integrator::new(grid.clone(), method);
    match y0 {
        StateVector::Real(v) => Ok(StateSolution::Real(integrator.run(system, v.as_slice())?)),
        StateVector::Complex(v) => {
            Ok(StateSolution::Complex(integrator.run(system, v.as_slice())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{integrate, integrate_at, integrate_state, integrate_uniform, Integrator};
    use crate::error::{GridError, IvpError};
    use crate::grid::TimeGrid;
    use crate::reduction::reduce_order;
    use crate::solvers::Method;
    use crate::state::{NumericKind, StateVector};
    use crate::traits::{scalar_derivative, Derivative, Scalar};
    use nalgebra::DVector;
    use num_complex::Complex64;
    use std::f64::consts::{E, PI};

    /// y' = rate * y for any numeric kind.
    struct Exponential {
        rate: f64,
    }

    impl<T: Scalar> Derivative<T> for Exponential {
        fn evaluate(&self, _t: f64, y: &DVector<T>) -> DVector<T> {
            y * T::from_real(self.rate)
        }
    }

    /// Free fall with the gravitational acceleration captured as a parameter.
    fn free_fall(g: f64) -> impl Fn(f64, &DVector<f64>) -> DVector<f64> {
        move |_t: f64, y: &DVector<f64>| DVector::from_vec(vec![y[1], -g])
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T, IvpError>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn parabola_matches_closed_form() -> anyhow::Result<()> {
        let solution = integrate_uniform(&free_fall(9.8), 0.0, 5.0, 100, &[0.0, 20.0], Method::Rk4)?;
        assert_eq!(solution.len(), 101);
        assert_eq!(solution.dimension(), 2);

        let y = solution.interpolant()?.query(2.0);
        assert!((y[0] - 20.4).abs() < 1e-9, "position {}", y[0]);
        assert!((y[1] - 0.4).abs() < 1e-9, "velocity {}", y[1]);
        Ok(())
    }

    #[test]
    fn harmonic_oscillator_closes_its_period() -> anyhow::Result<()> {
        let oscillator = reduce_order(|_t, y: &[f64]| -y[0], 2)?;
        let solution = integrate_uniform(&oscillator, 0.0, 2.0 * PI, 1000, &[1.0, 0.0], Method::Rk4)?;
        let last = solution.final_state().expect("non-empty trajectory");
        assert!((last[0] - 1.0).abs() < 1e-3);
        assert!(last[1].abs() < 1e-3);
        Ok(())
    }

    fn terminal_error(method: Method, n: usize) -> f64 {
        let growth = scalar_derivative(|_t, y: f64| y);
        let solution = integrate_uniform(&growth, 0.0, 1.0, n, &[1.0], method)
            .expect("growth integrates");
        let last = solution.final_state().expect("non-empty trajectory");
        (last[0] - E).abs()
    }

    #[test]
    fn convergence_orders_match_methods() {
        // Halving h should divide the error by 2^order.
        let euler_ratio = terminal_error(Method::Euler, 200) / terminal_error(Method::Euler, 400);
        assert!((euler_ratio - 2.0).abs() < 0.1, "euler ratio {euler_ratio}");

        let rk4_ratio = terminal_error(Method::Rk4, 10) / terminal_error(Method::Rk4, 20);
        assert!((rk4_ratio - 16.0).abs() < 1.5, "rk4 ratio {rk4_ratio}");
    }

    #[test]
    fn trajectory_length_is_steps_plus_one() -> anyhow::Result<()> {
        let solution = integrate(&Exponential { rate: -1.0 }, 0.0, &[1.0, 2.0, 3.0], 1.0, 0.3, Method::Euler)?;
        assert_eq!(solution.len(), 5);
        assert_eq!(solution.steps(), 4);
        assert_eq!(solution.times()[0], 0.0);
        assert_eq!(solution.times()[4], 1.0);
        assert!(solution.states().iter().all(|s| s.len() == 3));
        assert_eq!(solution.initial_state().map(|s| s[2]), Some(3.0));
        Ok(())
    }

    #[test]
    fn explicit_grid_uses_local_step_sizes() -> anyhow::Result<()> {
        // Euler on y' = 1 advances by exactly the local gap each step.
        let ones = |_t: f64, y: &DVector<f64>| DVector::from_element(y.len(), 1.0);
        let solution = integrate_at(&ones, 0.0, &[0.0], &[0.1, 0.5, 2.0], Method::Euler)?;
        assert_eq!(solution.times(), &[0.0, 0.1, 0.5, 2.0]);
        let values = solution.scalar_values().expect("scalar state");
        for (t, y) in solution.times().iter().zip(values) {
            assert!((y - t).abs() < 1e-12);
        }

        let solution = integrate_at(&ones, 0.0, &[0.0], &[0.0, 1.0], Method::Rk4)?;
        assert_eq!(solution.times(), &[0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn backward_integration_recovers_the_past() -> anyhow::Result<()> {
        let solution = integrate(&Exponential { rate: 1.0 }, 1.0, &[E], 0.0, -0.01, Method::Rk4)?;
        let last = solution.final_state().expect("non-empty trajectory");
        assert!((last[0] - 1.0).abs() < 1e-9);
        assert!((solution.times()[1] - 0.99).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn complex_kind_is_preserved() -> anyhow::Result<()> {
        // y' = i*y with y(0) = 1 gives y(t) = exp(i t).
        let rotation = |_t: f64, y: &DVector<Complex64>| y * Complex64::new(0.0, 1.0);
        let solution = integrate_uniform(&rotation, 0.0, PI, 200, &[Complex64::new(1.0, 0.0)], Method::Rk4)?;
        let last = solution.final_state().expect("non-empty trajectory")[0];
        assert!((last.re + 1.0).abs() < 1e-8);
        assert!(last.im.abs() < 1e-8);
        Ok(())
    }

    #[test]
    fn runtime_tagged_states_dispatch_on_kind() -> anyhow::Result<()> {
        let grid = TimeGrid::uniform(0.0, 1.0, 50)?;
        let decay = Exponential { rate: -0.5 };

        let real = integrate_state(&decay, &StateVector::from(2.0), &grid, Method::Rk4)?;
        assert_eq!(real.kind(), NumericKind::Real);
        assert_eq!(real.len(), 51);
        let y = real.as_real().and_then(|s| s.final_state()).expect("real trajectory")[0];
        assert!((y - 2.0 * (-0.5f64).exp()).abs() < 1e-9);

        let y0 = StateVector::complex(&[Complex64::new(1.0, 1.0)])?;
        let complex = integrate_state(&decay, &y0, &grid, Method::Euler)?;
        assert_eq!(complex.kind(), NumericKind::Complex);
        let y = complex.as_complex().and_then(|s| s.final_state()).expect("complex trajectory")[0];
        assert!((y.re - y.im).abs() < 1e-12);
        assert!(y.im > 0.0);
        Ok(())
    }

    #[test]
    fn divergence_is_recorded_not_masked() -> anyhow::Result<()> {
        let blow_up = |_t: f64, y: &DVector<f64>| y.map(|v| v * v * 1e200);
        let solution = integrate_uniform(&blow_up, 0.0, 1.0, 4, &[1e100], Method::Euler)?;
        let values = solution.scalar_values().expect("scalar state");
        assert!(values.iter().any(|v| v.is_infinite()));
        assert_eq!(values.len(), 5);
        Ok(())
    }

    #[test]
    fn invalid_inputs_fail_before_stepping() {
        let decay = Exponential { rate: -1.0 };
        assert_err_contains(
            integrate(&decay, 0.0, &[1.0], 1.0, -0.1, Method::Rk4),
            "does not advance",
        );
        assert_err_contains(
            integrate_at(&decay, 0.0, &[1.0], &[0.5, 0.25], Method::Rk4),
            "not strictly monotonic",
        );
        assert_err_contains(
            integrate_uniform::<f64, _>(&decay, 0.0, 1.0, 10, &[], Method::Rk4),
            "positive dimension",
        );

        let oscillator = reduce_order(|_t, y: &[f64]| -y[0], 2).expect("valid order");
        assert_eq!(
            integrate_uniform(&oscillator, 0.0, 1.0, 10, &[1.0], Method::Rk4).err(),
            Some(IvpError::DimensionMismatch {
                expected: 2,
                actual: 1,
                t: 0.0
            })
        );

        let grid_err = integrate_uniform(&decay, 0.0, 1.0, 0, &[1.0], Method::Rk4).err();
        assert_eq!(grid_err, Some(IvpError::InvalidGrid(GridError::ZeroSteps)));
    }

    #[test]
    fn misshapen_derivative_aborts_the_run() {
        let bad = |_t: f64, _y: &DVector<f64>| DVector::from_element(1, 0.0);
        let grid = TimeGrid::uniform(0.0, 1.0, 10).expect("valid grid");
        let result = Integrator::new(grid, Method::Euler).run(&bad, &[1.0, 2.0]);
        assert_eq!(
            result.err(),
            Some(IvpError::DimensionMismatch {
                expected: 2,
                actual: 1,
                t: 0.0
            })
        );
    }

    #[test]
    fn method_names_select_steppers() -> anyhow::Result<()> {
        let method: Method = "euler".parse()?;
        let grid = TimeGrid::uniform(0.0, 1.0, 1)?;
        let solution = Integrator::new(grid, method).run(&Exponential { rate: 1.0 }, &[1.0])?;
        assert_eq!(solution.final_state().map(|s| s[0]), Some(2.0));
        assert!("rk-4".parse::<Method>().is_err());
        Ok(())
    }
}
