//! # Adapters Layer
//!
//! Concrete world state implementations.

pub mod memory;

pub use memory::*;
