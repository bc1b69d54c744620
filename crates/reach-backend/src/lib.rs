//! # reach-backend
//!
//! HTTP client for the reachinbox aggregation backend.
//!
//! The aggregation backend is an external service that owns every heavy
//! concern: IMAP sync, AI categorization, vector retrieval, reply
//! generation. This crate provides:
//! - [`SyncBackend`], a thin typed client over its HTTP API that hands
//!   payloads back as raw JSON so the proxy can propagate them unchanged
//! - [`UpstreamError`], which keeps "backend unreachable" distinguishable
//!   from "backend answered with an error"
//! - [`mock`], the fixed mock-mode payloads served when the backend is down
//!
//! # Example
//!
//! ```rust,no_run
//! use reach_backend::{EmailQuery, SyncBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = SyncBackend::from_env();
//!     let emails = backend.list_emails(&EmailQuery::default()).await;
//!     println!("{:?}", emails);
//! }
//! ```

pub mod client;
pub mod error;
pub mod mock;

pub use client::{EmailQuery, SyncBackend};
pub use error::{UpstreamError, UpstreamResult};
