//! # Ports Layer
//!
//! Trait definitions for world state access. No concrete implementations
//! live here.

pub mod transaction;

pub use transaction::*;
