//! Trim solving: invert the oracle to meet a thrust target.
//!
//! Given a model from [`OperatingPoint`] to [`Metrics`], [`solve_thrust`]
//! searches for the rotational speed whose thrust matches a target at a
//! fixed airspeed, using a secant-style iteration on the residual
//! `thrust(rpm) − target`.
//!
//! Every iteration costs exactly one oracle evaluation (one simulator child
//! process), which dominates runtime, so the iteration budget doubles as an
//! evaluation budget.
//!
//! The search assumes thrust is monotonic in rotational speed over the
//! probed range. That holds for conventional propellers near their
//! operating envelope but is not guaranteed for arbitrary targets or
//! seeds; a solve that fails to converge reports `converged = false` on
//! its [`TrimSolution`] rather than erroring, and returns the
//! smallest-residual point it saw.

use tracing::warn;
use twine_core::Model;
use uom::si::{
    f64::{Force, Velocity},
    force::newton,
};

use super::qprop::{Metrics, OperatingPoint, OracleError};
use crate::support::constraint::{Constrained, NonNegative};

/// Configuration for [`solve_thrust`].
#[derive(Debug, Clone, Copy)]
pub struct TrimConfig {
    /// Rotational speed seeding the search, in rev/min.
    pub initial_rpm: f64,

    /// Maximum oracle evaluations before giving up.
    pub max_iters: usize,

    /// Absolute thrust residual below which the solve has converged.
    pub thrust_tol: Force,

    /// Step in rev/min used to establish the second secant point and to
    /// advance past flat oracle regions (e.g., a degraded oracle reporting
    /// zero thrust everywhere).
    pub probe_step: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            initial_rpm: 5000.0,
            max_iters: 50,
            thrust_tol: Force::new::<newton>(1e-3),
            probe_step: 250.0,
        }
    }
}

/// Result of a trim solve.
///
/// Always produced, converged or not; callers needing diagnostics check
/// [`converged`](Self::converged) and [`residual`](Self::residual).
#[derive(Debug, Clone, Copy)]
pub struct TrimSolution {
    /// Rotational speed with the smallest thrust residual seen, rev/min.
    pub rpm: f64,

    /// Thrust residual (achieved − target) at [`rpm`](Self::rpm).
    pub residual: Force,

    /// Whether the residual fell within tolerance before the iteration
    /// budget ran out.
    pub converged: bool,

    /// Oracle evaluations performed.
    pub iters: usize,
}

/// Solves for the rotational speed whose thrust matches `target` at
/// `airspeed`.
///
/// On non-convergence within the iteration budget the best
/// (smallest-residual) point is returned with `converged = false`; this is
/// deliberately not an error so a multi-row sweep can record the row and
/// move on.
///
/// # Errors
///
/// Returns an [`OracleError`] only when an underlying simulator invocation
/// fails outright (launch failure or timeout). Degraded zero-thrust replies
/// are ordinary data to the solver.
pub fn solve_thrust<M>(
    model: &M,
    airspeed: Velocity,
    target: Constrained<Force, NonNegative>,
    config: &TrimConfig,
) -> Result<TrimSolution, OracleError>
where
    M: Model<Input = OperatingPoint, Output = Metrics, Error = OracleError>,
{
    let target = target.into_inner().get::<newton>();
    let tol = config.thrust_tol.get::<newton>().abs();

    let mut best_rpm = config.initial_rpm;
    let mut best_residual = f64::INFINITY;

    let mut prev: Option<(f64, f64)> = None;
    let mut rpm = config.initial_rpm;

    for iter in 1..=config.max_iters {
        let metrics = model.call(&OperatingPoint { airspeed, rpm })?;
        let residual = metrics.thrust().get::<newton>() - target;

        if residual.abs() < best_residual.abs() {
            best_rpm = rpm;
            best_residual = residual;
        }

        if residual.abs() <= tol {
            return Ok(TrimSolution {
                rpm,
                residual: Force::new::<newton>(residual),
                converged: true,
                iters: iter,
            });
        }

        let next = match prev {
            Some((prev_rpm, prev_residual)) => {
                let slope = (residual - prev_residual) / (rpm - prev_rpm);
                let candidate = rpm - residual / slope;
                if slope.is_finite() && slope != 0.0 && candidate.is_finite() {
                    candidate
                } else {
                    // Flat or degenerate secant step; probe onward so a
                    // zero-thrust oracle still terminates.
                    rpm + config.probe_step
                }
            }
            None => rpm + config.probe_step,
        };

        prev = Some((rpm, residual));
        rpm = next;
    }

    warn!(
        rpm = best_rpm,
        residual_n = best_residual,
        iters = config.max_iters,
        "trim solve exhausted its iteration budget"
    );

    Ok(TrimSolution {
        rpm: best_rpm,
        residual: Force::new::<newton>(best_residual),
        converged: false,
        iters: config.max_iters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use approx::assert_relative_eq;
    use uom::si::velocity::meter_per_second;

    use crate::models::propulsion::qprop::THRUST;

    /// Synthetic oracle with `thrust = k·rpm²`, counting its evaluations.
    struct Quadratic {
        k: f64,
        calls: Cell<usize>,
    }

    impl Quadratic {
        fn new(k: f64) -> Self {
            Self {
                k,
                calls: Cell::new(0),
            }
        }
    }

    impl Model for Quadratic {
        type Input = OperatingPoint;
        type Output = Metrics;
        type Error = OracleError;

        fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
            self.calls.set(self.calls.get() + 1);
            let thrust = self.k * input.rpm * input.rpm;
            Ok(Metrics::from_columns(vec![(THRUST.to_string(), thrust)]))
        }
    }

    /// Synthetic oracle that always reports zero thrust, as a fully
    /// degraded simulator would.
    struct Flatline;

    impl Model for Flatline {
        type Input = OperatingPoint;
        type Output = Metrics;
        type Error = OracleError;

        fn call(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
            Ok(Metrics::zeroed([THRUST]))
        }
    }

    fn airspeed() -> Velocity {
        Velocity::new::<meter_per_second>(11.0)
    }

    fn target(newtons: f64) -> Constrained<Force, NonNegative> {
        NonNegative::new(Force::new::<newton>(newtons)).unwrap()
    }

    #[test]
    fn converges_on_a_monotonic_thrust_curve() {
        // thrust = 4e-7·rpm², so 10 N is reached at exactly 5000 rev/min.
        let oracle = Quadratic::new(4e-7);
        let config = TrimConfig {
            initial_rpm: 3000.0,
            ..TrimConfig::default()
        };

        let solution = solve_thrust(&oracle, airspeed(), target(10.0), &config).unwrap();

        assert!(solution.converged);
        assert!(solution.iters <= config.max_iters);
        assert!(solution.residual.get::<newton>().abs() <= config.thrust_tol.get::<newton>());
        assert_relative_eq!(solution.rpm, 5000.0, max_relative = 1e-3);
    }

    #[test]
    fn performs_one_evaluation_per_iteration() {
        let oracle = Quadratic::new(4e-7);
        let config = TrimConfig {
            initial_rpm: 3000.0,
            ..TrimConfig::default()
        };

        let solution = solve_thrust(&oracle, airspeed(), target(10.0), &config).unwrap();

        assert!(solution.iters > 1);
        assert_eq!(oracle.calls.get(), solution.iters);
    }

    #[test]
    fn seed_already_at_target_converges_in_one_iteration() {
        let oracle = Quadratic::new(4e-7);
        let config = TrimConfig {
            initial_rpm: 5000.0,
            ..TrimConfig::default()
        };

        let solution = solve_thrust(&oracle, airspeed(), target(10.0), &config).unwrap();

        assert!(solution.converged);
        assert_eq!(solution.iters, 1);
        assert_eq!(solution.rpm, 5000.0);
    }

    #[test]
    fn zero_thrust_oracle_terminates_and_reports_non_convergence() {
        let config = TrimConfig::default();
        let solution = solve_thrust(&Flatline, airspeed(), target(10.0), &config).unwrap();

        assert!(!solution.converged);
        assert_eq!(solution.iters, config.max_iters);
        assert_relative_eq!(solution.residual.get::<newton>(), -10.0);
    }

    #[test]
    fn non_convergence_returns_the_smallest_residual_point() {
        // A tight budget cuts the search off before tolerance is reached.
        let oracle = Quadratic::new(4e-7);
        let config = TrimConfig {
            initial_rpm: 100.0,
            max_iters: 2,
            ..TrimConfig::default()
        };

        let solution = solve_thrust(&oracle, airspeed(), target(10.0), &config).unwrap();

        assert!(!solution.converged);
        assert_eq!(solution.iters, 2);
        // The second probe (initial + probe_step) is closer to target than
        // the seed, so it must be the reported point.
        assert_relative_eq!(solution.rpm, 350.0);
    }
}
