//! Application services - Use case implementations
//!
//! The dice reducer owns the roll lifecycle; the roll service drives it with
//! a random source for rolls made on the server.

pub mod dice_service;
pub mod roll_service;

pub use dice_service::{DiceAction, DiceError, DiceState, RollPhase};
pub use roll_service::{DieRequest, RollRequest, RollService};
