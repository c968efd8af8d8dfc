//! Internal computation for the QPROP adapter.
//!
//! Splits the adapter into the three concerns the public model composes:
//! reading the motor definition ([`motor`]), invoking the simulator child
//! process ([`invoke`]), and parsing its text reply ([`output`]).

pub(crate) mod invoke;
pub(crate) mod motor;
pub(crate) mod output;
pub(crate) mod point;

#[cfg(test)]
pub(crate) mod test_support;
