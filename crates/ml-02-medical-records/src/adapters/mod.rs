//! # Adapters Layer (Outer Hexagon)
//!
//! Connects the contract to its host: positional-argument invocations in,
//! JSON payloads out.

pub mod invocation;

pub use invocation::*;
