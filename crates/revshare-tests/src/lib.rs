//! Integration test suite for the revshare optimization engine.
//!
//! The tests in `tests/` exercise the full pipeline — quality scoring,
//! share derivation, model construction, the reference simplex backend, and
//! status-gated persistence — against the acceptance scenarios and the
//! engine's cross-module properties.

pub mod helpers;
