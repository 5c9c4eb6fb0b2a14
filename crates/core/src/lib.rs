//! # Yuki Core
//!
//! Domain types, traits, and error definitions for the Yuki chat
//! client. This crate has **zero framework dependencies** — it defines
//! the domain model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The pieces with real behavior (context selection, the delta sink
//! seam) live here, free of any transport or terminal library, so they
//! can be tested in isolation. The HTTP client, persistence, and CLI
//! crates all depend inward on core.

pub mod context;
pub mod error;
pub mod message;
pub mod sink;

// Re-export key types at crate root for ergonomics
pub use context::select;
pub use error::{ClientError, Error, Result, StoreError};
pub use message::{History, Message, Role};
pub use sink::{CollectingSink, DeltaSink};
