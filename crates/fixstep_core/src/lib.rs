pub mod error;
pub mod grid;
pub mod integrator;
pub mod interpolate;
pub mod reduction;
pub mod solution;
pub mod solvers;
pub mod state;
/// The `fixstep_core` crate integrates ordinary differential equation initial
/// value problems with fixed-step explicit methods.
/// States are generic over their numeric kind: `f64` or `Complex<f64>`.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric kind), `Derivative` (right-hand side `f(t, y)`), `Steppable` (Solvers).
/// - **Solvers**: Explicit Euler and classical RK4, selected through `Method`.
/// - **Grids**: `TimeGrid` for uniform, step-size and explicit evaluation times.
/// - **Integrator**: drives a stepper across a grid and records the `Solution`.
/// - **Reduction**: rewrites an n-th order scalar ODE as a first-order system.
/// - **Interpolation**: piecewise-linear `y(x)` over a trajectory, clamped at the ends.
pub mod traits;

pub use error::{GridError, IvpError, Result};
pub use grid::TimeGrid;
pub use integrator::{integrate, integrate_at, integrate_state, integrate_uniform, Integrator};
pub use interpolate::{make_interpolant, Interpolant, InterpolationDomainWarning};
pub use reduction::{reduce_order, ReducedOrder};
pub use solution::{Solution, StateSolution};
pub use solvers::{Euler, Method, RK4};
pub use state::{NumericKind, StateVector};
pub use traits::{scalar_derivative, Derivative, Scalar, ScalarDerivative, Steppable};
