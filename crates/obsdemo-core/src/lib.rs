//! obsdemo core: transport-agnostic payload contracts and the shared error type.
//!
//! This crate defines the JSON bodies served by the demo and the error surface
//! shared by the server and its tests. It carries no transport or runtime
//! dependencies so the contracts can be checked in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ObsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ObsError, Result};
