//! Propeller/motor propulsion models.
//!
//! This module wraps the external QPROP simulator as a [`twine_core::Model`]
//! and builds the batch operations used for component selection on top of
//! it:
//!
//! - [`qprop`]: the simulator adapter and its parsed [`qprop::Metrics`].
//! - [`trim`]: solve for the rotational speed meeting a thrust target.
//! - [`battery`]: the no-load rpm cap implied by a battery pack and a
//!   motor's velocity constant.
//! - [`sweep`]: trim and thrust-available sweeps across component grids.
//! - [`report`]: delimited-text export of trim sweep tables.

pub mod battery;
pub mod qprop;
pub mod report;
pub mod sweep;
pub mod trim;
