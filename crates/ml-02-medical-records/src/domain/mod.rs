//! # Domain Module
//!
//! Patient aggregate and the fixed demo data set.

pub mod entities;
pub mod seed;

pub use entities::*;
pub use seed::demo_patients;
