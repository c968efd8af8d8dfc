//! Grid sweeps across component pairings and airspeed sequences.
//!
//! Two grid shapes are provided:
//!
//! - [`trim_sweep`]: for each motor/propeller [`Pairing`], solve for the
//!   rotational speed meeting a thrust target at a fixed airspeed, then
//!   re-evaluate the oracle at the solved point. One output row per
//!   pairing.
//! - [`thrust_available`]: for one component, evaluate a strictly ordered
//!   airspeed sequence at a fixed rotational speed cap (see
//!   [`BatteryPack::max_rpm`](super::battery::BatteryPack::max_rpm)) and
//!   collect the thrust and current-draw series.
//!
//! Both shapes tolerate individual-point failure. A degraded metrics
//! record or a non-converged solve still produces its row; a configuration
//! or launch failure marks only the affected row. Output order always
//! matches input grid order.
//!
//! Execution is sequential: every evaluation blocks on one external child
//! process, which is the bottleneck. Grid points share no mutable state,
//! so a worker pool could evaluate them concurrently and merge rows back
//! into grid order; until that is needed, one child process runs at a
//! time.

use thiserror::Error;
use tracing::warn;
use twine_core::Model;
use uom::si::{
    f64::{ElectricCurrent, Force, Velocity},
    velocity::meter_per_second,
};

use super::{
    qprop::{ConfigError, Metrics, OperatingPoint, OracleError},
    trim::{self, TrimConfig, TrimSolution},
};
use crate::support::constraint::{Constrained, NonNegative};

/// One motor/propeller combination in a trim sweep grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Motor identifier, recorded first in the result table.
    pub motor: String,

    /// Propeller identifier.
    pub propeller: String,
}

/// Why a trim sweep row produced no data.
#[derive(Debug, Error)]
pub enum RowError {
    /// The pairing's oracle could not be constructed.
    #[error("component configuration failed")]
    Config(#[from] ConfigError),

    /// The simulator could not be invoked for this pairing.
    #[error("simulator invocation failed")]
    Oracle(#[from] OracleError),
}

/// Solved operating point plus the metrics re-evaluated there.
#[derive(Debug, Clone)]
pub struct TrimPoint {
    /// The solved rotational speed and its convergence diagnostics.
    pub solution: TrimSolution,

    /// Simulator metrics at the solved rotational speed.
    pub metrics: Metrics,
}

/// One row of a trim sweep table.
///
/// A failed row keeps its place in the table so downstream reporting stays
/// rectangular; the failure is carried in [`outcome`](Self::outcome).
#[derive(Debug)]
pub struct TrimRow {
    pub pairing: Pairing,
    pub outcome: Result<TrimPoint, RowError>,
}

/// Runs a trim sweep: one row per pairing, in pairing order.
///
/// `oracle_for` builds the oracle for each pairing (typically a
/// [`Qprop`](super::qprop::Qprop) from the pairing's definition files). A
/// pairing whose construction or invocation fails yields a row with an
/// [`RowError`] outcome; the sweep itself never aborts.
pub fn trim_sweep<M, F>(
    pairings: &[Pairing],
    mut oracle_for: F,
    airspeed: Velocity,
    target: Constrained<Force, NonNegative>,
    config: &TrimConfig,
) -> Vec<TrimRow>
where
    M: Model<Input = OperatingPoint, Output = Metrics, Error = OracleError>,
    F: FnMut(&Pairing) -> Result<M, ConfigError>,
{
    pairings
        .iter()
        .map(|pairing| {
            let outcome = trim_row(pairing, &mut oracle_for, airspeed, target, config);
            if let Err(error) = &outcome {
                warn!(
                    motor = %pairing.motor,
                    propeller = %pairing.propeller,
                    %error,
                    "trim sweep row failed"
                );
            }
            TrimRow {
                pairing: pairing.clone(),
                outcome,
            }
        })
        .collect()
}

fn trim_row<M, F>(
    pairing: &Pairing,
    oracle_for: &mut F,
    airspeed: Velocity,
    target: Constrained<Force, NonNegative>,
    config: &TrimConfig,
) -> Result<TrimPoint, RowError>
where
    M: Model<Input = OperatingPoint, Output = Metrics, Error = OracleError>,
    F: FnMut(&Pairing) -> Result<M, ConfigError>,
{
    let model = oracle_for(pairing)?;
    let solution = trim::solve_thrust(&model, airspeed, target, config)?;
    let metrics = model.call(&OperatingPoint {
        airspeed,
        rpm: solution.rpm,
    })?;

    Ok(TrimPoint { solution, metrics })
}

/// Thrust-available series for one component at a fixed rotational speed.
#[derive(Debug, Clone)]
pub struct ThrustAvailable {
    /// Rotational speed every point was evaluated at, rev/min.
    pub rpm: f64,

    /// Points in airspeed sequence order.
    pub points: Vec<ThrustPoint>,
}

/// One point of a thrust-available series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustPoint {
    pub airspeed: Velocity,
    pub thrust: Force,
    pub current: ElectricCurrent,

    /// True when the simulator reply for this point was malformed and its
    /// metrics zero-filled.
    pub degraded: bool,
}

/// Evaluates the oracle at a fixed rotational speed across `airspeeds`.
///
/// The output series is aligned by index with the input sequence. Degraded
/// replies produce zeroed, flagged points rather than being dropped.
///
/// # Errors
///
/// Returns an [`OracleError`] if an invocation fails outright, aborting
/// this component's series (later points would use the same executable and
/// fail the same way).
pub fn thrust_available<M>(
    model: &M,
    airspeeds: &[Velocity],
    rpm: f64,
) -> Result<ThrustAvailable, OracleError>
where
    M: Model<Input = OperatingPoint, Output = Metrics, Error = OracleError>,
{
    let mut points = Vec::with_capacity(airspeeds.len());

    for &airspeed in airspeeds {
        let metrics = model.call(&OperatingPoint { airspeed, rpm })?;
        if metrics.is_degraded() {
            warn!(
                airspeed_m_s = airspeed.get::<meter_per_second>(),
                rpm, "degraded reply in thrust-available sweep"
            );
        }

        points.push(ThrustPoint {
            airspeed,
            thrust: metrics.thrust(),
            current: metrics.current(),
            degraded: metrics.is_degraded(),
        });
    }

    Ok(ThrustAvailable { rpm, points })
}
