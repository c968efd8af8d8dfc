//! Delimited-text export of trim sweep tables.
//!
//! The export contract is deliberately thin: one comma-separated line per
//! grid point with fields in the order `motor, propeller, solved rpm,
//! electrical power (W), thrust (N)`, newline terminated. Anything richer
//! belongs to downstream tooling.

use std::io::{self, Write};

use uom::si::{force::newton, power::watt};

use super::sweep::TrimRow;

/// Writes one line per trim row to `writer`, in row order.
///
/// Failed rows are written with zeroed numeric fields so the table stays
/// rectangular; whether a zero row was a failure is recoverable from the
/// in-memory [`TrimRow::outcome`].
///
/// # Errors
///
/// Returns any I/O error from the underlying writer.
pub fn write_trim_table<W: Write>(mut writer: W, rows: &[TrimRow]) -> io::Result<()> {
    for row in rows {
        let (rpm, electrical_power, thrust) = match &row.outcome {
            Ok(point) => (
                point.solution.rpm,
                point.metrics.electrical_power().get::<watt>(),
                point.metrics.thrust().get::<newton>(),
            ),
            Err(_) => (0.0, 0.0, 0.0),
        };

        writeln!(
            writer,
            "{},{},{},{},{}",
            row.pairing.motor, row.pairing.propeller, rpm, electrical_power, thrust
        )?;
    }

    Ok(())
}
