//! Parsing of the simulator's tabular text reply.
//!
//! A well-formed reply carries its column labels at a fixed line offset and
//! one row of numeric data on the very next line; the first token of each
//! is a row label and is discarded. All other lines are ignored.
//!
//! Parsing never fails. A malformed reply (missing line, short data row,
//! non-numeric token) degrades to a zero-filled [`Metrics`] record with the
//! same label set, flagged via [`Metrics::is_degraded`], so one bad
//! simulator reply cannot abort a batch sweep.

use tracing::warn;
use uom::si::{
    electric_current::ampere,
    f64::{ElectricCurrent, Force, Power},
    force::newton,
    power::watt,
};

/// Zero-based line index of the column labels in a simulator reply.
pub(crate) const HEADER_LINE: usize = 16;

/// Zero-based line index of the single data row.
const DATA_LINE: usize = HEADER_LINE + 1;

/// Column label for thrust in newtons.
pub const THRUST: &str = "T(N)";

/// Column label for electrical power in watts.
pub const ELECTRICAL_POWER: &str = "Pelec";

/// Column label for current draw in amperes.
pub const CURRENT: &str = "Amps";

/// Canonical column set of a QPROP single-point reply.
///
/// Used only when a reply is too malformed to provide its own header line:
/// the degraded record still declares every metric key, just zero-valued.
const FALLBACK_LABELS: [&str; 19] = [
    "V(m/s)",
    "rpm",
    "Dbeta",
    THRUST,
    "Q(N-m)",
    "Pshaft(W)",
    "Volts",
    CURRENT,
    "effmot",
    "effprop",
    "adv",
    "CT",
    "CP",
    "DV(m/s)",
    "eff",
    ELECTRICAL_POWER,
    "Pprop",
    "cl_avg",
    "cd_avg",
];

/// One simulator reply parsed into an ordered label → value mapping.
///
/// Produced fresh on every oracle invocation and never mutated afterwards;
/// column order follows the reply's header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    columns: Vec<(String, f64)>,
    degraded: bool,
}

impl Metrics {
    /// Builds a well-formed record from parsed columns.
    #[must_use]
    pub fn from_columns(columns: Vec<(String, f64)>) -> Self {
        Self {
            columns,
            degraded: false,
        }
    }

    /// Builds a degraded record: every label present, every value `0.0`.
    #[must_use]
    pub fn zeroed<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: labels.into_iter().map(|label| (label.into(), 0.0)).collect(),
            degraded: true,
        }
    }

    /// Returns the value for `label`, if the reply declared that column.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(name, _)| name == label)
            .map(|&(_, value)| value)
    }

    /// Returns the value for `label`, defaulting to `0.0` when absent.
    ///
    /// The zero default mirrors the degrade-not-fail policy: downstream
    /// sweeps treat a missing metric the same as a zeroed one.
    #[must_use]
    pub fn value(&self, label: &str) -> f64 {
        self.get(label).unwrap_or(0.0)
    }

    /// Thrust reported by the simulator.
    #[must_use]
    pub fn thrust(&self) -> Force {
        Force::new::<newton>(self.value(THRUST))
    }

    /// Electrical power drawn by the motor.
    #[must_use]
    pub fn electrical_power(&self) -> Power {
        Power::new::<watt>(self.value(ELECTRICAL_POWER))
    }

    /// Current drawn by the motor.
    #[must_use]
    pub fn current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.value(CURRENT))
    }

    /// Whether this record was zero-filled from a malformed reply.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Column labels in reply order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Label/value pairs in reply order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Parses a raw simulator reply into a [`Metrics`] record.
pub(crate) fn parse_reply(raw: &str) -> Metrics {
    let lines: Vec<&str> = raw.lines().collect();

    let labels: Vec<String> = lines
        .get(HEADER_LINE)
        .map(|line| line.split_whitespace().skip(1).map(str::to_string).collect())
        .unwrap_or_default();

    if labels.is_empty() {
        warn!("simulator reply has no header line; zero-filling canonical columns");
        return Metrics::zeroed(FALLBACK_LABELS);
    }

    let values: Option<Vec<f64>> = lines.get(DATA_LINE).and_then(|line| {
        let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
        if tokens.len() < labels.len() {
            return None;
        }
        tokens[..labels.len()]
            .iter()
            .map(|token| token.parse().ok())
            .collect()
    });

    match values {
        Some(values) => Metrics::from_columns(labels.into_iter().zip(values).collect()),
        None => {
            warn!("simulator data row is missing or non-numeric; zero-filling metrics");
            Metrics::zeroed(labels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::propulsion::qprop::core::test_support::reply;

    #[test]
    fn well_formed_reply_zips_headers_with_values() {
        let raw = reply(
            "# V(m/s) rpm T(N) Pelec Amps",
            "d 11.0 5000.0 10.25 240.0 21.8",
        );

        let metrics = parse_reply(&raw);

        assert!(!metrics.is_degraded());
        assert_eq!(
            metrics.labels().collect::<Vec<_>>(),
            ["V(m/s)", "rpm", "T(N)", "Pelec", "Amps"]
        );
        assert_relative_eq!(metrics.value("V(m/s)"), 11.0);
        assert_relative_eq!(metrics.thrust().get::<newton>(), 10.25);
        assert_relative_eq!(metrics.electrical_power().get::<watt>(), 240.0);
        assert_relative_eq!(metrics.current().get::<ampere>(), 21.8);
    }

    #[test]
    fn non_numeric_token_zero_fills_the_full_label_set() {
        let raw = reply("# V(m/s) rpm T(N)", "d 11.0 NaN? 10.25");

        let metrics = parse_reply(&raw);

        assert!(metrics.is_degraded());
        assert_eq!(
            metrics.labels().collect::<Vec<_>>(),
            ["V(m/s)", "rpm", "T(N)"]
        );
        assert_eq!(metrics.value("V(m/s)"), 0.0);
        assert_eq!(metrics.thrust().get::<newton>(), 0.0);
    }

    #[test]
    fn short_data_row_zero_fills() {
        let raw = reply("# V(m/s) rpm T(N)", "d 11.0 5000.0");

        let metrics = parse_reply(&raw);

        assert!(metrics.is_degraded());
        assert_eq!(metrics.labels().count(), 3);
        assert!(metrics.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn missing_data_line_zero_fills() {
        // Header at the expected offset but no data row after it.
        let raw = format!("{}# T(N) Pelec", "preamble\n".repeat(HEADER_LINE));

        let metrics = parse_reply(&raw);

        assert!(metrics.is_degraded());
        assert_eq!(metrics.labels().collect::<Vec<_>>(), ["T(N)", "Pelec"]);
    }

    #[test]
    fn reply_without_header_line_uses_canonical_labels() {
        let metrics = parse_reply("too\nshort\n");

        assert!(metrics.is_degraded());
        assert_eq!(metrics.labels().count(), FALLBACK_LABELS.len());
        assert_eq!(metrics.value(THRUST), 0.0);
        assert_eq!(metrics.value(ELECTRICAL_POWER), 0.0);
    }

    #[test]
    fn extra_trailing_columns_are_ignored() {
        let raw = reply("# T(N) Pelec", "d 9.5 250.0 77.0 88.0");

        let metrics = parse_reply(&raw);

        assert!(!metrics.is_degraded());
        assert_relative_eq!(metrics.value(THRUST), 9.5);
        assert_relative_eq!(metrics.value(ELECTRICAL_POWER), 250.0);
    }

    #[test]
    fn absent_label_defaults_to_zero() {
        let raw = reply("# T(N)", "d 9.5");
        let metrics = parse_reply(&raw);

        assert_eq!(metrics.get("Amps"), None);
        assert_eq!(metrics.value("Amps"), 0.0);
    }
}
