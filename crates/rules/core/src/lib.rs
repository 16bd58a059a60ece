//! Deterministic rules for a dice-pool tabletop ruleset.
//!
//! `rules-core` assembles dice pools, aggregates risk reduction, resolves
//! rolls, adjudicates attack exchanges and applies damage to wound tracks.
//! It reads characters through [`CharacterOracle`] and draws dice through
//! [`DiceRoller`], so every result is reproducible from its inputs. Storage,
//! async orchestration and result delivery live in the `runtime` crate.
pub mod character;
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod names;
pub mod plan;
pub mod pool;
pub mod record;
pub mod risk;
pub mod wounds;

pub use character::{
    Attribute, AttributeSet, BonusKind, CharacterId, CharacterOracle, CharacterRecord,
    CharacterRecordBuilder, CharacterTrait, ItemKind, ItemProfile, RangeBand, RangeProfile,
    RangeSuitability, Skill, Specialization, TraitBonus,
};
pub use combat::{
    AttackProfile, CombatError, CounterResult, CounterWeapon, DamageAmount, DamageParseError,
    DamageValue, Exchange, ExchangeKind, ExchangeOutcome, ExchangeRole, ExchangeStage,
};
pub use config::RulesConfig;
pub use dice::{
    Complication, DiceRoller, PcgRoller, ResolutionResult, ResolutionSource, RollMode,
    RollRequest, ScriptedRoller,
};
pub use error::{ErrorSeverity, RulesError};
pub use plan::RollPlan;
pub use pool::{ActionRef, PoolBreakdown};
pub use record::{DamageRecord, ResolutionRecord};
pub use risk::{RiskReduction, RrSource, RrTarget};
pub use wounds::{
    WoundCapacity, WoundOutcome, WoundThresholds, WoundTier, WoundTrack, apply_damage,
};
