//! Synchronous invocation of the external simulator.
//!
//! The simulator is an opaque child process taking exactly four positional
//! arguments (propeller file, motor file, airspeed, rotational speed) and
//! writing a free-form text table to standard output. The call blocks the
//! current thread until the child exits or the configured timeout expires.

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::trace;
use uom::si::velocity::meter_per_second;

use super::point::OperatingPoint;

/// How often a timeout-bounded invocation polls the child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for locating and bounding the simulator executable.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Program name or path of the simulator executable.
    pub program: PathBuf,

    /// Wall-clock bound on one invocation.
    ///
    /// `None` waits for the child indefinitely. When set, an expired child
    /// is killed and the invocation fails with [`OracleError::TimedOut`],
    /// the same fatal class as a failed launch, so a hung simulator cannot
    /// stall an entire sweep.
    pub timeout: Option<Duration>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("qprop"),
            timeout: None,
        }
    }
}

/// Errors raised when the simulator cannot be invoked.
///
/// Malformed simulator *output* is never an error; it degrades to a
/// zero-filled metrics record so batch sweeps can continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// The simulator executable could not be launched at all.
    #[error("failed to launch simulator `{}`", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The simulator's standard output could not be captured.
    #[error("failed to capture simulator output")]
    Capture(#[source] io::Error),

    /// The simulator exceeded the configured timeout and was killed.
    #[error("simulator `{}` timed out after {:?}", .program.display(), .timeout)]
    TimedOut {
        program: PathBuf,
        timeout: Duration,
    },
}

/// Runs the simulator for one operating point and returns its stdout text.
pub(crate) fn run_simulator(
    config: &SimulatorConfig,
    prop: &Path,
    motor: &Path,
    point: &OperatingPoint,
) -> Result<String, OracleError> {
    let airspeed = point.airspeed.get::<meter_per_second>();

    let mut command = Command::new(&config.program);
    command
        .arg(prop)
        .arg(motor)
        .arg(airspeed.to_string())
        .arg(point.rpm.to_string());

    let stdout = match config.timeout {
        None => {
            let output = command.output().map_err(|source| OracleError::Launch {
                program: config.program.clone(),
                source,
            })?;
            output.stdout
        }
        Some(timeout) => run_with_timeout(command, &config.program, timeout)?,
    };

    let text = String::from_utf8_lossy(&stdout).into_owned();
    trace!(
        airspeed_m_s = airspeed,
        rpm = point.rpm,
        reply = %text,
        "simulator reply"
    );
    Ok(text)
}

/// Spawns the child with a piped stdout and polls it against a deadline.
///
/// Stdout is drained on a separate thread so a chatty child can never block
/// on a full pipe while we wait for it.
fn run_with_timeout(
    mut command: Command,
    program: &Path,
    timeout: Duration,
) -> Result<Vec<u8>, OracleError> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OracleError::Launch {
            program: program.to_path_buf(),
            source,
        })?;

    let stdout_thread = child
        .stdout
        .take()
        .map(spawn_reader_thread)
        .unwrap_or_else(|| thread::spawn(|| Ok(Vec::new())));

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_status)) => {
                return stdout_thread
                    .join()
                    .unwrap_or_else(|_| Ok(Vec::new()))
                    .map_err(OracleError::Capture);
            }
            Ok(None) => {}
            Err(source) => return Err(OracleError::Capture(source)),
        }

        if start.elapsed() >= timeout {
            let _ = child.kill();
            // Reap the killed child off-thread; the caller is done with it.
            thread::spawn(move || {
                let _ = child.wait();
                let _ = stdout_thread.join();
            });
            return Err(OracleError::TimedOut {
                program: program.to_path_buf(),
                timeout,
            });
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader_thread<R>(mut reader: R) -> thread::JoinHandle<io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}
