//! # QPROP Sweep
//!
//! Parametric performance evaluation of propeller/motor combinations built
//! around the external [QPROP](https://web.mit.edu/drela/Public/web/qprop/)
//! simulator.
//!
//! The simulator is treated as a black-box oracle from an operating point
//! (airspeed, rotational speed) to a table of performance metrics. On top of
//! that oracle this crate provides:
//!
//! - [`models::propulsion::qprop`]: the oracle adapter, a
//!   [`twine_core::Model`] implementation that spawns the simulator and
//!   parses its tabular text reply.
//! - [`models::propulsion::trim`]: a derivative-free root finder that
//!   inverts the oracle to find the rotational speed meeting a thrust
//!   target.
//! - [`models::propulsion::sweep`]: grid drivers that iterate the oracle
//!   across component pairings or airspeed sequences and accumulate
//!   rectangular result tables.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations and
//!   the operations built on them.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Failure philosophy
//!
//! Batch sweeps spanning many simulator invocations must survive individual
//! bad replies. A malformed simulator reply degrades to a zero-filled,
//! flagged [`models::propulsion::qprop::Metrics`] record instead of an
//! error; a root find that exhausts its iteration budget reports
//! `converged = false` instead of failing. Only configuration problems and
//! process-launch failures are surfaced as errors, and they abort only the
//! unit of work that depends on them.

pub mod models;
pub mod support;
