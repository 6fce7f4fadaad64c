//! Top-level facade crate for obsdemo.
//!
//! Re-exports the payload contracts and the server library so users can depend on a single crate.

pub mod core {
    pub use obsdemo_core::*;
}

pub mod server {
    pub use obsdemo_server::*;
}
