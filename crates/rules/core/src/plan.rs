//! Roll planning.
//!
//! A [`RollPlan`] is everything decided before the dice hit the table: the
//! assembled pool, the gathered risk-reduction sources, the roll mode and
//! the number of risk dice. The player adjusts it (switches sources off,
//! picks risk dice, or swaps the roll for a fixed threshold) and then
//! resolves it into a [`ResolutionRecord`].

use crate::character::{CharacterId, CharacterOracle, ItemProfile, RangeBand, RangeSuitability};
use crate::combat::{CombatError, CounterWeapon, check_range};
use crate::config::RulesConfig;
use crate::dice::{
    DiceRoller, ResolutionResult, RollMode, RollRequest, determine_roll_mode,
    equivalent_threshold, resolve,
};
use crate::pool::{ActionRef, PoolBreakdown, assemble_pool, resolve_item_action};
use crate::record::ResolutionRecord;
use crate::risk::{RiskReduction, gather_for_action, gather_for_item};

/// A roll ready to be adjusted and resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollPlan {
    pub actor: CharacterId,
    pub actor_name: String,
    pub action: ActionRef,
    pub item: Option<String>,
    pub band: Option<RangeBand>,
    pub pool: PoolBreakdown,
    pub risk_reduction: RiskReduction,
    pub mode: RollMode,
    risk_dice: u32,
    threshold: Option<u32>,
}

impl RollPlan {
    /// Plans an attribute, skill or specialization roll.
    pub fn for_action(
        character: &(impl CharacterOracle + ?Sized),
        action: ActionRef,
        requested: RollMode,
    ) -> Self {
        let pool = assemble_pool(character, &action, 0);
        let risk_reduction = gather_for_action(character, &pool);
        let mode = determine_roll_mode(requested, None, character.has_severe_wound());
        Self::assemble(character, action, None, None, pool, risk_reduction, mode)
    }

    /// Plans an attack with a carried weapon or spell at a range band.
    ///
    /// Fails before anything is rolled when the item is unknown or cannot be
    /// used at `band`.
    pub fn for_item(
        character: &(impl CharacterOracle + ?Sized),
        item: &str,
        band: RangeBand,
        requested: RollMode,
        config: &RulesConfig,
    ) -> Result<Self, CombatError> {
        let item = character
            .item(item)
            .ok_or_else(|| CombatError::UnknownItem {
                character: character.id().clone(),
                item: item.to_string(),
            })?;
        let suitability = check_range(item, band)?;
        Ok(Self::with_item(
            character,
            item,
            Some(band),
            suitability,
            requested,
            config,
        ))
    }

    /// Plans a counter-attack. Counter-attacks are always in melee.
    pub fn for_counter(
        character: &(impl CharacterOracle + ?Sized),
        weapon: &CounterWeapon,
        requested: RollMode,
        config: &RulesConfig,
    ) -> Self {
        match weapon.item() {
            Some(item) => Self::with_item(
                character,
                item,
                Some(RangeBand::Melee),
                weapon.suitability(),
                requested,
                config,
            ),
            None => {
                let mut plan =
                    Self::for_action(character, weapon.action(character, config), requested);
                plan.band = Some(RangeBand::Melee);
                plan
            }
        }
    }

    fn with_item(
        character: &(impl CharacterOracle + ?Sized),
        item: &ItemProfile,
        band: Option<RangeBand>,
        suitability: RangeSuitability,
        requested: RollMode,
        config: &RulesConfig,
    ) -> Self {
        let action = resolve_item_action(character, item, config);
        let pool = assemble_pool(character, &action, item.pool_bonus);
        let risk_reduction = gather_for_item(character, item, &pool);
        let mode = determine_roll_mode(
            requested,
            Some(suitability),
            character.has_severe_wound(),
        );
        Self::assemble(
            character,
            action,
            Some(item.name.clone()),
            band,
            pool,
            risk_reduction,
            mode,
        )
    }

    fn assemble(
        character: &(impl CharacterOracle + ?Sized),
        action: ActionRef,
        item: Option<String>,
        band: Option<RangeBand>,
        pool: PoolBreakdown,
        risk_reduction: RiskReduction,
        mode: RollMode,
    ) -> Self {
        Self {
            actor: character.id().clone(),
            actor_name: character.name().to_string(),
            action,
            item,
            band,
            pool,
            risk_reduction,
            mode,
            risk_dice: 0,
            threshold: None,
        }
    }

    pub fn risk_dice(&self) -> u32 {
        self.risk_dice
    }

    pub fn threshold(&self) -> Option<u32> {
        self.threshold
    }

    /// Sets the number of risk dice, clamped to the pool.
    pub fn set_risk_dice(&mut self, risk_dice: u32) {
        self.risk_dice = risk_dice.min(self.pool.total);
    }

    #[must_use]
    pub fn with_risk_dice(mut self, risk_dice: u32) -> Self {
        self.set_risk_dice(risk_dice);
        self
    }

    /// Replaces the roll with a fixed number of successes, or restores the
    /// roll with `None`.
    pub fn use_threshold(&mut self, threshold: Option<u32>) {
        self.threshold = threshold;
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Threshold a non-rolling character would get for this plan.
    pub fn equivalent_threshold(&self) -> u32 {
        equivalent_threshold(self.pool.total, self.risk_dice, self.mode)
    }

    pub fn toggle_source(&mut self, index: usize) -> Option<bool> {
        self.risk_reduction.toggle(index)
    }

    pub fn set_source_enabled(&mut self, index: usize, enabled: bool) -> bool {
        self.risk_reduction.set_enabled(index, enabled)
    }

    pub fn request(&self) -> RollRequest {
        RollRequest::new(
            self.pool.total,
            self.risk_dice,
            self.mode,
            self.risk_reduction.total(),
        )
    }

    /// Rolls the plan, or applies its threshold when one is set.
    ///
    /// Threshold records report no risk dice and no risk reduction since
    /// nothing was rolled.
    pub fn resolve(&self, roller: &mut (impl DiceRoller + ?Sized)) -> ResolutionRecord {
        let (result, risk_dice, risk_reduction) = match self.threshold {
            Some(successes) => (ResolutionResult::threshold(successes), 0, 0),
            None => {
                let request = self.request();
                let result = resolve(&request, roller);
                (result, request.risk_dice, request.risk_reduction)
            }
        };

        ResolutionRecord {
            actor: self.actor.clone(),
            actor_name: self.actor_name.clone(),
            action: self.action.label(),
            item: self.item.clone(),
            band: self.band,
            pool: self.pool.clone(),
            risk_sources: self.risk_reduction.sources().to_vec(),
            risk_reduction,
            mode: self.mode,
            risk_dice,
            result,
        }
    }
}
