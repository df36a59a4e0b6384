//! # revshare-core
//! Foundation types and traits for the revshare engine.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod traits;
pub mod types;
