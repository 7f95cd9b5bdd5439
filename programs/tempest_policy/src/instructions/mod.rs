// programs/tempest_policy/src/instructions/mod.rs

pub mod collateral;
pub mod hazards;
pub mod initialize;
pub mod issuance;
pub mod release;
pub mod settlement;
pub mod surplus;
pub mod transfer;

pub use collateral::*;
pub use hazards::*;
pub use initialize::*;
pub use issuance::*;
pub use release::*;
pub use settlement::*;
pub use surplus::*;
pub use transfer::*;
