//! QPROP simulator adapter.
//!
//! [`Qprop`] binds one propeller/motor combination to the external QPROP
//! executable and exposes it as a [`twine_core::Model`] from an
//! [`OperatingPoint`] to a [`Metrics`] record. Each evaluation spawns the
//! simulator as a synchronous child process with four positional arguments
//! (propeller file, motor file, airspeed, rotational speed) and parses the
//! text table it writes to standard output.
//!
//! The adapter is immutable once constructed: the motor's velocity constant
//! is read once at load time and cached, and every evaluation returns a
//! fresh [`Metrics`] value with no retained cross-call state. No retry is
//! attempted here; retry policy, if any, belongs to the caller.

mod core;

pub use self::core::{
    invoke::{OracleError, SimulatorConfig},
    motor::{ConfigError, Kv},
    output::{CURRENT, ELECTRICAL_POWER, Metrics, THRUST},
    point::OperatingPoint,
};

use self::core::{invoke, motor, output};

use std::path::{Path, PathBuf};

use tracing::debug;
use twine_core::Model;
use uom::si::f64::Velocity;

/// Oracle adapter for one propeller/motor combination.
#[derive(Debug, Clone)]
pub struct Qprop {
    prop: PathBuf,
    motor: PathBuf,
    kv: Kv,
    simulator: SimulatorConfig,
}

impl Qprop {
    /// Loads a propeller/motor combination using the default simulator
    /// configuration (a `qprop` executable on the search path, no timeout).
    ///
    /// The motor's velocity constant is read from the final line of the
    /// motor definition file and cached for the adapter's lifetime.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the motor file is missing, empty, or
    /// its final line does not parse as a strictly positive number.
    pub fn new(prop: impl Into<PathBuf>, motor: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::with_simulator(prop, motor, SimulatorConfig::default())
    }

    /// Loads a propeller/motor combination with an explicit simulator
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the motor file is missing, empty, or
    /// its final line does not parse as a strictly positive number.
    pub fn with_simulator(
        prop: impl Into<PathBuf>,
        motor: impl Into<PathBuf>,
        simulator: SimulatorConfig,
    ) -> Result<Self, ConfigError> {
        let prop = prop.into();
        let motor = motor.into();
        let kv = motor::read_kv(&motor)?;

        debug!(
            motor = %motor.display(),
            prop = %prop.display(),
            kv = kv.into_inner(),
            "component loaded"
        );

        Ok(Self {
            prop,
            motor,
            kv,
            simulator,
        })
    }

    /// The motor's cached velocity constant in rev/min per volt.
    #[must_use]
    pub fn kv(&self) -> Kv {
        self.kv
    }

    /// Path of the propeller definition, passed through to the simulator
    /// unexamined.
    #[must_use]
    pub fn propeller(&self) -> &Path {
        &self.prop
    }

    /// Path of the motor definition.
    #[must_use]
    pub fn motor(&self) -> &Path {
        &self.motor
    }

    /// Evaluates the simulator at one operating point.
    ///
    /// Blocks the calling thread until the child process exits. A malformed
    /// reply is not an error: it degrades to a zero-filled [`Metrics`]
    /// record flagged via [`Metrics::is_degraded`].
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] only when the simulator cannot be
    /// launched, its output cannot be captured, or the configured timeout
    /// expires.
    pub fn evaluate(&self, airspeed: Velocity, rpm: f64) -> Result<Metrics, OracleError> {
        self.call(&OperatingPoint { airspeed, rpm })
    }
}

impl Model for Qprop {
    type Input = OperatingPoint;
    type Output = Metrics;
    type Error = OracleError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let raw = invoke::run_simulator(&self.simulator, &self.prop, &self.motor, input)?;
        Ok(output::parse_reply(&raw))
    }
}
