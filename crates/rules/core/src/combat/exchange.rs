//! Attack, defense and counter-attack exchanges.
//!
//! An exchange starts with a resolved attack. The defender then either
//! defends or counter-attacks:
//!
//! ```text
//!                  declare_counter
//! AwaitingDefense ─────────────────► AwaitingCounter
//!        │                                  │
//!        │ resolve_defense                  │ resolve_counter
//!        ▼                                  ▼
//!     Resolved ◄────────────────────────────┘
//! ```
//!
//! `Resolved` is final. Further defense or counter steps fail with
//! [`CombatError::UnexpectedStep`], so one attack settles damage once.

use crate::character::{CharacterId, CharacterOracle, ItemProfile, RangeBand};
use crate::config::RulesConfig;
use crate::dice::RollMode;
use crate::plan::RollPlan;
use crate::record::{DamageRecord, ResolutionRecord};

use super::damage::{DamageAmount, DamageValue, evaluate_damage};
use super::error::{CombatError, ExchangeRole};
use super::select::{CounterWeapon, defense_action};

/// Where an exchange stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeStage {
    #[default]
    AwaitingDefense,
    AwaitingCounter,
    Resolved,
}

/// How the defender answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeKind {
    Defense,
    Counter,
}

/// Damage and defense details an attack carries into its exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProfile {
    pub item: Option<String>,
    pub damage: DamageValue,
    pub damage_bonus: u32,
    pub band: Option<RangeBand>,
    pub defense_skill: Option<String>,
    pub defense_specialization: Option<String>,
}

impl AttackProfile {
    pub fn from_item(item: &ItemProfile, band: Option<RangeBand>) -> Self {
        Self {
            item: Some(item.name.clone()),
            damage: item.damage.clone(),
            damage_bonus: item.damage_bonus,
            band,
            defense_skill: item.defense_skill.clone(),
            defense_specialization: item.defense_specialization.clone(),
        }
    }

    /// Bare-handed melee attack.
    pub fn unarmed(config: &RulesConfig) -> Result<Self, CombatError> {
        Ok(Self {
            item: None,
            damage: DamageValue::parse(&config.unarmed_damage)?,
            damage_bonus: 0,
            band: Some(RangeBand::Melee),
            defense_skill: None,
            defense_specialization: None,
        })
    }
}

/// Result of one defense or counter-attack step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeOutcome {
    pub kind: ExchangeKind,
    pub attacker_successes: u32,
    pub defender_successes: u32,
    /// `None` when the defense held or a counter-attack tied.
    pub damage: Option<DamageRecord>,
}

/// Compares attack and defense successes.
///
/// `A >= D` inflicts the attack damage plus `A - D`; otherwise nothing.
pub fn adjudicate_defense(
    attacker: &(impl CharacterOracle + ?Sized),
    attack: &AttackProfile,
    attack_successes: u32,
    defense_successes: u32,
) -> Option<DamageAmount> {
    let margin = attack_successes.checked_sub(defense_successes)?;
    Some(evaluate_damage(
        &attack.damage,
        attacker,
        attack.damage_bonus,
        margin,
    ))
}

/// Winner of a counter-attack comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterResult {
    Attacker { margin: u32 },
    Defender { margin: u32 },
    Tie,
}

/// Higher successes win by the difference; equal successes tie.
pub fn adjudicate_counter(attacker_successes: u32, defender_successes: u32) -> CounterResult {
    use core::cmp::Ordering;
    match attacker_successes.cmp(&defender_successes) {
        Ordering::Greater => CounterResult::Attacker {
            margin: attacker_successes - defender_successes,
        },
        Ordering::Less => CounterResult::Defender {
            margin: defender_successes - attacker_successes,
        },
        Ordering::Equal => CounterResult::Tie,
    }
}

/// One attack and the defender's answer to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
    attacker: CharacterId,
    defender: Option<CharacterId>,
    attack: AttackProfile,
    attack_record: ResolutionRecord,
    stage: ExchangeStage,
    outcome: Option<ExchangeOutcome>,
}

impl Exchange {
    pub fn new(attack_record: ResolutionRecord, attack: AttackProfile) -> Self {
        Self {
            attacker: attack_record.actor.clone(),
            defender: None,
            attack,
            attack_record,
            stage: ExchangeStage::AwaitingDefense,
            outcome: None,
        }
    }

    #[must_use]
    pub fn against(mut self, defender: CharacterId) -> Self {
        self.defender = Some(defender);
        self
    }

    pub fn attacker(&self) -> &CharacterId {
        &self.attacker
    }

    pub fn defender(&self) -> Option<&CharacterId> {
        self.defender.as_ref()
    }

    pub fn attack(&self) -> &AttackProfile {
        &self.attack
    }

    pub fn attack_record(&self) -> &ResolutionRecord {
        &self.attack_record
    }

    pub fn stage(&self) -> ExchangeStage {
        self.stage
    }

    pub fn outcome(&self) -> Option<&ExchangeOutcome> {
        self.outcome.as_ref()
    }

    fn expect_defender(&self, actual: &CharacterId) -> Result<(), CombatError> {
        match &self.defender {
            None => Err(CombatError::MissingParticipant(ExchangeRole::Defender)),
            Some(defender) if defender != actual => Err(CombatError::WrongParticipant {
                role: ExchangeRole::Defender,
                actual: actual.clone(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn expect_attacker(&self, actual: &CharacterId) -> Result<(), CombatError> {
        if &self.attacker == actual {
            Ok(())
        } else {
            Err(CombatError::WrongParticipant {
                role: ExchangeRole::Attacker,
                actual: actual.clone(),
            })
        }
    }

    /// Checks that `defender` may roll a defense now.
    ///
    /// Only an exchange still awaiting its defense accepts one.
    pub fn check_defense(&self, defender: &CharacterId) -> Result<(), CombatError> {
        if self.stage != ExchangeStage::AwaitingDefense {
            return Err(CombatError::UnexpectedStep {
                step: "defend",
                stage: self.stage,
            });
        }
        self.expect_defender(defender)
    }

    /// Checks that `defender` may roll a counter-attack now.
    ///
    /// A resolved exchange accepts neither a defense nor a counter.
    pub fn check_counter(&self, defender: &CharacterId) -> Result<(), CombatError> {
        if self.stage == ExchangeStage::Resolved {
            return Err(CombatError::UnexpectedStep {
                step: "counter",
                stage: self.stage,
            });
        }
        self.expect_defender(defender)
    }

    /// Plans the defender's defense roll against this attack.
    pub fn defense_plan(
        &self,
        defender: &(impl CharacterOracle + ?Sized),
        requested: RollMode,
        config: &RulesConfig,
    ) -> Result<RollPlan, CombatError> {
        self.expect_defender(defender.id())?;
        let action = defense_action(
            defender,
            self.attack.defense_specialization.as_deref(),
            self.attack.defense_skill.as_deref(),
            self.attack.band,
            config,
        );
        Ok(RollPlan::for_action(defender, action, requested))
    }

    /// Plans the defender's counter-attack roll.
    pub fn counter_plan(
        &self,
        defender: &(impl CharacterOracle + ?Sized),
        weapon: &CounterWeapon,
        requested: RollMode,
        config: &RulesConfig,
    ) -> Result<RollPlan, CombatError> {
        self.expect_defender(defender.id())?;
        Ok(RollPlan::for_counter(defender, weapon, requested, config))
    }

    /// Commits the defender to a counter-attack.
    pub fn declare_counter(&mut self) -> Result<(), CombatError> {
        if self.defender.is_none() {
            return Err(CombatError::MissingParticipant(ExchangeRole::Defender));
        }
        if self.stage == ExchangeStage::Resolved {
            return Err(CombatError::UnexpectedStep {
                step: "counter",
                stage: self.stage,
            });
        }
        self.stage = ExchangeStage::AwaitingCounter;
        Ok(())
    }

    /// Settles the exchange against a defense roll.
    pub fn resolve_defense(
        &mut self,
        attacker: &(impl CharacterOracle + ?Sized),
        defense: &ResolutionRecord,
    ) -> Result<ExchangeOutcome, CombatError> {
        self.check_defense(&defense.actor)?;
        self.expect_attacker(attacker.id())?;

        let attacker_successes = self.attack_record.successes();
        let defender_successes = defense.successes();
        let damage = adjudicate_defense(
            attacker,
            &self.attack,
            attacker_successes,
            defender_successes,
        )
        .map(|amount| DamageRecord {
            inflicter: self.attacker.clone(),
            receiver: defense.actor.clone(),
            amount,
            margin: attacker_successes - defender_successes,
            winner: None,
            wound: None,
        });

        Ok(self.finish(ExchangeOutcome {
            kind: ExchangeKind::Defense,
            attacker_successes,
            defender_successes,
            damage,
        }))
    }

    /// Settles the exchange against a counter-attack roll.
    ///
    /// The winner inflicts their own damage plus the margin on the loser.
    pub fn resolve_counter(
        &mut self,
        attacker: &(impl CharacterOracle + ?Sized),
        defender: &(impl CharacterOracle + ?Sized),
        weapon: &CounterWeapon,
        counter: &ResolutionRecord,
        config: &RulesConfig,
    ) -> Result<ExchangeOutcome, CombatError> {
        self.check_counter(&counter.actor)?;
        self.check_counter(defender.id())?;
        self.expect_attacker(attacker.id())?;

        let attacker_successes = self.attack_record.successes();
        let defender_successes = counter.successes();

        let damage = match adjudicate_counter(attacker_successes, defender_successes) {
            CounterResult::Tie => None,
            CounterResult::Attacker { margin } => Some(DamageRecord {
                inflicter: attacker.id().clone(),
                receiver: defender.id().clone(),
                amount: evaluate_damage(
                    &self.attack.damage,
                    attacker,
                    self.attack.damage_bonus,
                    margin,
                ),
                margin,
                winner: Some(attacker.id().clone()),
                wound: None,
            }),
            CounterResult::Defender { margin } => Some(DamageRecord {
                inflicter: defender.id().clone(),
                receiver: attacker.id().clone(),
                amount: evaluate_damage(
                    &weapon.damage(config)?,
                    defender,
                    weapon.damage_bonus(),
                    margin,
                ),
                margin,
                winner: Some(defender.id().clone()),
                wound: None,
            }),
        };

        Ok(self.finish(ExchangeOutcome {
            kind: ExchangeKind::Counter,
            attacker_successes,
            defender_successes,
            damage,
        }))
    }

    fn finish(&mut self, outcome: ExchangeOutcome) -> ExchangeOutcome {
        self.stage = ExchangeStage::Resolved;
        self.outcome = Some(outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attribute, CharacterRecord, RangeProfile, RangeSuitability};
    use crate::dice::ResolutionResult;
    use crate::pool::PoolBreakdown;

    fn record(actor: &str, successes: u32) -> ResolutionRecord {
        ResolutionRecord {
            actor: CharacterId::new(actor),
            actor_name: actor.to_string(),
            action: "Close Combat".into(),
            item: None,
            band: Some(RangeBand::Melee),
            pool: PoolBreakdown::empty(),
            risk_sources: Vec::new(),
            risk_reduction: 0,
            mode: RollMode::Normal,
            risk_dice: 0,
            result: ResolutionResult::threshold(successes),
        }
    }

    fn character(id: &str, strength: u32) -> CharacterRecord {
        CharacterRecord::builder(id, id)
            .attribute(Attribute::Strength, strength)
            .skill("Close Combat", 2, Attribute::Strength)
            .skill("Athletics", 3, Attribute::Agility)
            .build()
    }

    fn sword_attack() -> AttackProfile {
        let sword = ItemProfile::weapon("Sword", DamageValue::strength(2)).with_damage_bonus(1);
        AttackProfile::from_item(&sword, Some(RangeBand::Melee))
    }

    fn exchange(attack_successes: u32) -> Exchange {
        Exchange::new(record("ash", attack_successes), sword_attack()).against("bram".into())
    }

    #[test]
    fn defense_hit_inflicts_value_plus_margin() {
        let ash = character("ash", 4);
        let mut exchange = exchange(4);
        let outcome = exchange.resolve_defense(&ash, &record("bram", 2)).unwrap();

        let damage = outcome.damage.unwrap();
        assert_eq!(damage.amount, DamageAmount::Points(7 + 2));
        assert_eq!(damage.margin, 2);
        assert_eq!(damage.receiver, CharacterId::new("bram"));
        assert_eq!(damage.winner, None);
        assert_eq!(exchange.stage(), ExchangeStage::Resolved);
    }

    #[test]
    fn equal_successes_still_hit() {
        let ash = character("ash", 4);
        let outcome = exchange(3).resolve_defense(&ash, &record("bram", 3)).unwrap();
        assert_eq!(outcome.damage.map(|d| d.amount), Some(DamageAmount::Points(7)));
    }

    #[test]
    fn successful_defense_inflicts_nothing() {
        let ash = character("ash", 4);
        let outcome = exchange(1).resolve_defense(&ash, &record("bram", 2)).unwrap();
        assert_eq!(outcome.damage, None);
    }

    #[test]
    fn defense_requires_the_declared_defender() {
        let ash = character("ash", 4);
        let mut open = Exchange::new(record("ash", 2), sword_attack());
        assert_eq!(
            open.resolve_defense(&ash, &record("bram", 0)),
            Err(CombatError::MissingParticipant(ExchangeRole::Defender))
        );

        let mut exchange = exchange(2);
        assert!(matches!(
            exchange.resolve_defense(&ash, &record("cole", 0)),
            Err(CombatError::WrongParticipant { .. })
        ));
        assert_eq!(exchange.stage(), ExchangeStage::AwaitingDefense);
        assert_eq!(exchange.outcome(), None);
    }

    #[test]
    fn counter_attack_is_symmetric() {
        let ash = character("ash", 4);
        let bram = character("bram", 3);
        let config = RulesConfig::default();
        let axe = CounterWeapon::Weapon(ItemProfile::weapon("Axe", DamageValue::Fixed(5)));

        let mut lost = exchange(2);
        lost.declare_counter().unwrap();
        let outcome = lost
            .resolve_counter(&ash, &bram, &axe, &record("bram", 5), &config)
            .unwrap();
        let damage = outcome.damage.unwrap();
        assert_eq!(damage.winner, Some(CharacterId::new("bram")));
        assert_eq!(damage.receiver, CharacterId::new("ash"));
        assert_eq!(damage.amount, DamageAmount::Points(5 + 3));

        let mut won = exchange(2);
        won.declare_counter().unwrap();
        let outcome = won
            .resolve_counter(&ash, &bram, &axe, &record("bram", 1), &config)
            .unwrap();
        let damage = outcome.damage.unwrap();
        assert_eq!(damage.winner, Some(CharacterId::new("ash")));
        assert_eq!(damage.receiver, CharacterId::new("bram"));
        assert_eq!(damage.amount, DamageAmount::Points(7 + 1));
    }

    #[test]
    fn counter_tie_inflicts_nothing() {
        let ash = character("ash", 4);
        let bram = character("bram", 3);
        let outcome = exchange(3)
            .resolve_counter(
                &ash,
                &bram,
                &CounterWeapon::Unarmed,
                &record("bram", 3),
                &RulesConfig::default(),
            )
            .unwrap();
        assert_eq!(outcome.damage, None);
        assert_eq!(outcome.kind, ExchangeKind::Counter);
    }

    #[test]
    fn unarmed_counter_uses_configured_damage() {
        let ash = character("ash", 4);
        let bram = character("bram", 3);
        let config = RulesConfig::default().with_unarmed_damage("STR+1");
        let outcome = exchange(0)
            .resolve_counter(&ash, &bram, &CounterWeapon::Unarmed, &record("bram", 2), &config)
            .unwrap();
        assert_eq!(outcome.damage.map(|d| d.amount), Some(DamageAmount::Points(4 + 2)));
    }

    #[test]
    fn resolved_exchange_refuses_further_steps() {
        let ash = character("ash", 4);
        let bram = character("bram", 3);
        let mut resolved = exchange(4);
        resolved.resolve_defense(&ash, &record("bram", 1)).unwrap();
        let settled = resolved.outcome().cloned();

        assert!(matches!(
            resolved.resolve_defense(&ash, &record("bram", 0)),
            Err(CombatError::UnexpectedStep { step: "defend", .. })
        ));
        assert!(matches!(
            resolved.declare_counter(),
            Err(CombatError::UnexpectedStep { step: "counter", .. })
        ));
        assert!(matches!(
            resolved.resolve_counter(
                &ash,
                &bram,
                &CounterWeapon::Unarmed,
                &record("bram", 6),
                &RulesConfig::default(),
            ),
            Err(CombatError::UnexpectedStep { step: "counter", .. })
        ));
        assert_eq!(resolved.stage(), ExchangeStage::Resolved);
        assert_eq!(resolved.outcome().cloned(), settled);
    }

    #[test]
    fn declared_counter_blocks_defense() {
        let ash = character("ash", 4);
        let mut exchange = exchange(2);
        exchange.declare_counter().unwrap();
        assert!(matches!(
            exchange.resolve_defense(&ash, &record("bram", 1)),
            Err(CombatError::UnexpectedStep { .. })
        ));
    }

    #[test]
    fn defense_plan_uses_fallback_skill_for_melee() {
        let bram = character("bram", 3);
        let exchange = exchange(2);
        let plan = exchange
            .defense_plan(&bram, RollMode::Normal, &RulesConfig::default())
            .unwrap();
        assert_eq!(plan.pool.skill.as_deref(), Some("Close Combat"));
    }

    #[test]
    fn defense_plan_uses_declared_defense_skill() {
        let bram = character("bram", 3);
        let bow = ItemProfile::weapon("Bow", DamageValue::Fixed(4))
            .with_range(RangeProfile::new(
                RangeSuitability::None,
                RangeSuitability::Ok,
                RangeSuitability::Ok,
                RangeSuitability::Ok,
            ))
            .with_defense_skill("athletics");
        let exchange = Exchange::new(
            record("ash", 2),
            AttackProfile::from_item(&bow, Some(RangeBand::Short)),
        )
        .against("bram".into());

        let plan = exchange
            .defense_plan(&bram, RollMode::Normal, &RulesConfig::default())
            .unwrap();
        assert_eq!(plan.pool.skill.as_deref(), Some("Athletics"));
    }

    #[test]
    fn external_damage_is_reported_not_applied() {
        let ash = character("ash", 4);
        let dart = ItemProfile::weapon("Dart", DamageValue::external("toxin"));
        let mut exchange = Exchange::new(
            record("ash", 3),
            AttackProfile::from_item(&dart, Some(RangeBand::Melee)),
        )
        .against("bram".into());

        let outcome = exchange.resolve_defense(&ash, &record("bram", 1)).unwrap();
        assert_eq!(
            outcome.damage.map(|d| d.amount),
            Some(DamageAmount::External {
                tag: "toxin".into(),
                margin: 2
            })
        );
    }
}
