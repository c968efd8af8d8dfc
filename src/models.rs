//! Public models and the operations built on them.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are organized into domain-specific submodules. Today the only
//! domain is [`propulsion`]; the taxonomy may grow as more models are added.
//!
//! # Model structure
//!
//! Each model lives in its own module and keeps its computation in an
//! internal `core` submodule. The [`twine_core::Model`] implementation is a
//! thin adapter over that core, so higher-level operations (trim solving,
//! grid sweeps) can be written against the trait and exercised with
//! synthetic models in tests.

pub mod propulsion;
