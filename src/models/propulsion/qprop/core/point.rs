use uom::si::f64::Velocity;

/// A single oracle input: the operating point the simulator is asked about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Freestream airspeed.
    pub airspeed: Velocity,

    /// Propeller rotational speed in rev/min.
    ///
    /// Kept as a raw `f64` rather than a `uom` quantity: the solver treats
    /// it as a dimensionless search variable and may transiently probe
    /// negative or zero values, and `rpm = kv × volts` is not a coherent SI
    /// relation.
    pub rpm: f64,
}
