//! Battery pack voltage and the rotational speed cap it implies.
//!
//! A brushless motor at full throttle spins at roughly `kv × volts` with no
//! load, so a pack's series voltage and the motor's velocity constant fix
//! the rotational speed ceiling used by thrust-available sweeps.

use uom::si::{electric_potential::volt, f64::ElectricPotential};

use super::qprop::Kv;

/// Nominal voltage of one lithium-polymer cell, in volts.
pub const LIPO_CELL_VOLTS: f64 = 3.7;

/// A series battery pack driving the motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryPack {
    /// Series cell count.
    pub cells: u32,

    /// Nominal per-cell voltage.
    pub cell_volts: ElectricPotential,
}

impl BatteryPack {
    /// A lithium-polymer pack of `cells` cells at the nominal 3.7 V each.
    #[must_use]
    pub fn lipo(cells: u32) -> Self {
        Self {
            cells,
            cell_volts: ElectricPotential::new::<volt>(LIPO_CELL_VOLTS),
        }
    }

    /// Total pack voltage.
    #[must_use]
    pub fn voltage(&self) -> ElectricPotential {
        self.cell_volts * f64::from(self.cells)
    }

    /// No-load rotational speed cap in rev/min for a motor with velocity
    /// constant `kv`.
    #[must_use]
    pub fn max_rpm(&self, kv: Kv) -> f64 {
        self.voltage().get::<volt>() * kv.into_inner()
    }
}
