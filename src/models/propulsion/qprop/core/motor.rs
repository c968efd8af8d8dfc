//! Motor definition parsing.
//!
//! The only property this crate reads from a motor definition file is its
//! final line, which QPROP's motor format places the velocity constant on.
//! Everything else in the file belongs to the simulator's own input format
//! and is passed through unexamined.

use std::{
    fs, io, num,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

/// A motor's velocity constant in rev/min per volt, guaranteed positive.
pub type Kv = Constrained<f64, StrictlyPositive>;

/// Errors raised while loading a component configuration.
///
/// These are fatal for the affected component: a motor whose velocity
/// constant cannot be read can never be evaluated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The motor definition file could not be read.
    #[error("failed to read motor file `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The motor definition file is empty.
    #[error("motor file `{}` has no lines; expected kv on the final line", .path.display())]
    Empty { path: PathBuf },

    /// The final line of the motor definition is not a number.
    #[error("motor file `{}` final line `{}` does not parse as kv", .path.display(), .line)]
    KvNotNumeric {
        path: PathBuf,
        line: String,
        #[source]
        source: num::ParseFloatError,
    },

    /// The parsed velocity constant is zero, negative, or NaN.
    #[error("motor file `{}` kv {} is not strictly positive", .path.display(), .kv)]
    KvOutOfRange {
        path: PathBuf,
        kv: f64,
        #[source]
        source: ConstraintError,
    },
}

/// Reads the velocity constant from the final line of a motor definition.
pub(crate) fn read_kv(path: &Path) -> Result<Kv, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let line = contents
        .lines()
        .last()
        .ok_or_else(|| ConfigError::Empty {
            path: path.to_path_buf(),
        })?
        .trim();

    let kv: f64 = line.parse().map_err(|source| ConfigError::KvNotNumeric {
        path: path.to_path_buf(),
        line: line.to_string(),
        source,
    })?;

    StrictlyPositive::new(kv).map_err(|source| ConfigError::KvOutOfRange {
        path: path.to_path_buf(),
        kv,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;

    fn motor_file(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("motor.txt");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_kv_from_final_line() {
        let dir = tempdir().unwrap();
        let path = motor_file(
            dir.path(),
            "FlightLine 5055\n\n0.05  ! R (Ohms)\n1.0   ! Io (Amps)\n390\n",
        );

        let kv = read_kv(&path).unwrap();
        assert_eq!(kv.into_inner(), 390.0);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let dir = tempdir().unwrap();
        let path = motor_file(dir.path(), "header\n  920.5  \n");

        let kv = read_kv(&path).unwrap();
        assert_eq!(kv.into_inner(), 920.5);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-motor.txt");

        assert!(matches!(read_kv(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = motor_file(dir.path(), "");

        assert!(matches!(read_kv(&path), Err(ConfigError::Empty { .. })));
    }

    #[test]
    fn non_numeric_final_line_is_rejected() {
        let dir = tempdir().unwrap();
        let path = motor_file(dir.path(), "header\nabc\n");

        // Never silently defaults kv to zero.
        assert!(matches!(
            read_kv(&path),
            Err(ConfigError::KvNotNumeric { .. })
        ));
    }

    #[test]
    fn non_positive_kv_is_rejected() {
        let dir = tempdir().unwrap();
        let path = motor_file(dir.path(), "header\n-390\n");

        assert!(matches!(
            read_kv(&path),
            Err(ConfigError::KvOutOfRange { kv, .. }) if kv == -390.0
        ));
    }
}
