//! OSC packet workbench.
//!
//! The library surface re-exports the zero-copy message codec; the `oscwire`
//! binary adds `inspect` and `build` commands around it for working with raw
//! packets on disk or stdio.

/// Re-export message codec types.
pub mod message {
    pub use oscwire_message::*;
}
