//! Combat adjudication.
//!
//! Pure functions and a small state machine for attack exchanges. Nothing
//! here rolls dice or touches a wound track: rolls arrive as
//! [`ResolutionRecord`](crate::record::ResolutionRecord)s and damage leaves
//! as [`DamageRecord`](crate::record::DamageRecord)s for the caller to apply.
//!
//! # Core Functions
//!
//! - `check_range`: reject a band the item cannot be used at
//! - `defense_action`: what the defender rolls
//! - `select_counter_weapon`: best melee weapon, or bare hands
//! - `adjudicate_defense` / `adjudicate_counter`: compare successes

pub mod damage;
pub mod error;
pub mod exchange;
pub mod select;

pub use damage::{DamageAmount, DamageParseError, DamageValue, evaluate_damage};
pub use error::{CombatError, ExchangeRole};
pub use exchange::{
    AttackProfile, CounterResult, Exchange, ExchangeKind, ExchangeOutcome, ExchangeStage,
    adjudicate_counter, adjudicate_defense,
};
pub use select::{
    CounterWeapon, check_range, counter_weapon_named, defense_action, select_counter_weapon,
};
