// programs/tempest_pool/src/instructions/mod.rs

pub mod admin;
pub mod deposits;
pub mod initialize;
pub mod reservations;

pub use admin::*;
pub use deposits::*;
pub use initialize::*;
pub use reservations::*;
