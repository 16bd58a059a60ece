//! Dice resolution engine.
//!
//! - `roller`: where faces come from
//! - `mode`: success floors and mode selection
//! - `resolve`: turning a pool into successes and complications
mod mode;
mod resolve;
mod roller;

pub use mode::{RollMode, determine_roll_mode};
pub use resolve::{
    Complication, ResolutionResult, ResolutionSource, RollRequest, equivalent_threshold, resolve,
};
pub use roller::{DiceRoller, PcgRoller, ScriptedRoller};
