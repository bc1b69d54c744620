//! # reach-core
//!
//! Core types and shared defaults for reachinbox.
//!
//! This crate provides the domain entities exchanged between the dashboard,
//! the BFF proxy, and the external aggregation backend, plus the workspace
//! error type. It deliberately contains no I/O.

pub mod defaults;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
