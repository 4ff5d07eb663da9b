pub mod entities;
pub mod errors;
pub mod rwset;

pub use entities::*;
pub use errors::*;
pub use rwset::*;
