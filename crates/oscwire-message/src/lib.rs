//! Zero-copy OSC (Open Sound Control) message codec over caller-owned buffers.
//!
//! An OSC message is three flat, word-aligned regions packed into one buffer:
//!
//! ```text
//! ┌────────────────────┬──────────────────────┬─────────────────────┐
//! │ Address             │ Type tags            │ Argument payloads   │
//! │ "/synth/1/freq\0\0" │ ",f\0\0"             │ 43 dc 00 00         │
//! │ NUL-padded to 4B    │ NUL-padded to 4B     │ big-endian          │
//! └────────────────────┴──────────────────────┴─────────────────────┘
//! ```
//!
//! [`OscMessage`] binds to a buffer the caller owns — it never allocates,
//! grows, or frees storage — and derives the region boundaries on demand by
//! scanning the NUL-terminated, padded strings. Accessors translate between
//! the wire's big-endian layout and host numeric types.
//!
//! Transport framing, address routing, bundles, and wildcard matching are out
//! of scope; the view always operates on one already-delimited packet.

pub mod error;
pub mod message;
pub mod tags;

pub use error::{OscError, Result};
pub use message::{OscArg, OscMessage};
