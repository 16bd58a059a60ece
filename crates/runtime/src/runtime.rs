//! Rules coordinator.
//!
//! [`RulesRuntime`] drives the full flow for one caller: load characters from
//! the repository, build roll plans, roll them with the shared dice roller,
//! adjudicate exchanges, write wound tracks back and hand every finished
//! record to the result sink.
use std::sync::{Arc, Mutex};

use rules_core::combat::{counter_weapon_named, select_counter_weapon};
use rules_core::{
    ActionRef, AttackProfile, CharacterId, CharacterOracle, CharacterRecord, CombatError,
    CounterWeapon, DamageAmount, DamageRecord, DiceRoller, Exchange, ExchangeOutcome,
    ExchangeRole, RangeBand, ResolutionRecord, RollMode, RollPlan, RulesConfig, WoundCapacity,
    WoundOutcome, WoundThresholds, WoundTier, WoundTrack,
};
use tracing::{debug, info, warn};

use crate::api::{Result, ResultSink, RuntimeError};
use crate::config::RuntimeConfig;
use crate::dice::RandRoller;
use crate::repository::{CharacterRepository, RecordPatch};

/// A planned counter-attack and the weapon it is made with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterPlan {
    pub weapon: CounterWeapon,
    pub plan: RollPlan,
}

/// Coordinates rolls and exchanges against a repository and a sink.
///
/// The only shared mutable state is the dice roller, held behind a mutex
/// that is never kept across an await.
pub struct RulesRuntime {
    config: RuntimeConfig,
    repository: Arc<dyn CharacterRepository>,
    sink: Arc<dyn ResultSink>,
    roller: Mutex<Box<dyn DiceRoller + Send>>,
}

impl RulesRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.config.rules
    }

    pub fn repository(&self) -> &Arc<dyn CharacterRepository> {
        &self.repository
    }

    pub fn character(&self, id: &CharacterId) -> Result<CharacterRecord> {
        self.repository
            .load(id)?
            .ok_or_else(|| RuntimeError::CharacterNotFound(id.clone()))
    }

    // ===== planning =====

    /// Plans an attribute, skill or specialization roll.
    pub fn plan_action(
        &self,
        actor: &CharacterId,
        action: ActionRef,
        mode: RollMode,
    ) -> Result<RollPlan> {
        let character = self.character(actor)?;
        let plan = RollPlan::for_action(&character, action, mode);
        log_plan(&plan);
        Ok(plan)
    }

    /// Plans an attack with a carried weapon or spell.
    pub fn plan_attack(
        &self,
        actor: &CharacterId,
        item: &str,
        band: RangeBand,
        mode: RollMode,
    ) -> Result<RollPlan> {
        let character = self.character(actor)?;
        let plan = RollPlan::for_item(&character, item, band, mode, self.rules()).inspect_err(
            |err| warn!(actor = %actor, item, band = %band, error = %err, "attack rejected"),
        )?;
        log_plan(&plan);
        Ok(plan)
    }

    /// Plans the defender's roll for an open exchange.
    pub fn plan_defense(&self, exchange: &Exchange, mode: RollMode) -> Result<RollPlan> {
        let defender = self.defender_of(exchange)?;
        let plan = exchange.defense_plan(&defender, mode, self.rules())?;
        log_plan(&plan);
        Ok(plan)
    }

    /// Plans a counter-attack with the named weapon, or the best melee weapon
    /// the defender carries.
    pub fn plan_counter(
        &self,
        exchange: &Exchange,
        weapon: Option<&str>,
        mode: RollMode,
    ) -> Result<CounterPlan> {
        let defender = self.defender_of(exchange)?;
        let weapon = match weapon {
            Some(name) => counter_weapon_named(&defender, name)?,
            None => select_counter_weapon(&defender),
        };
        let plan = exchange.counter_plan(&defender, &weapon, mode, self.rules())?;
        debug!(defender = %plan.actor, weapon = weapon.name(), "counter-attack planned");
        log_plan(&plan);
        Ok(CounterPlan { weapon, plan })
    }

    fn defender_of(&self, exchange: &Exchange) -> Result<CharacterRecord> {
        let id = exchange
            .defender()
            .ok_or(CombatError::MissingParticipant(ExchangeRole::Defender))?;
        self.character(id)
    }

    // ===== resolution =====

    /// Rolls a plan and publishes the record.
    pub async fn finalize(&self, plan: &RollPlan) -> Result<ResolutionRecord> {
        if !plan.pool.is_resolved() && plan.threshold().is_none() {
            warn!(
                actor = %plan.actor,
                action = %plan.action.label(),
                "action did not resolve on the character, rolling an empty pool"
            );
        }

        let record = {
            let mut roller = self
                .roller
                .lock()
                .map_err(|_| RuntimeError::RollerPoisoned)?;
            plan.resolve(&mut **roller)
        };

        info!(
            actor = %record.actor,
            action = %record.action,
            pool = record.pool.total,
            risk_dice = record.risk_dice,
            mode = %record.mode,
            successes = record.successes(),
            complication = %record.result.complication,
            "roll finalized"
        );
        self.sink.publish_resolution(&record).await?;
        Ok(record)
    }

    /// Rolls an attack plan and opens an exchange against `defender`.
    ///
    /// Plans without an item attack bare-handed.
    pub async fn attack(
        &self,
        plan: &RollPlan,
        defender: Option<&CharacterId>,
    ) -> Result<Exchange> {
        let attacker = self.character(&plan.actor)?;
        let profile = match &plan.item {
            Some(name) => {
                let item = attacker
                    .item(name)
                    .ok_or_else(|| CombatError::UnknownItem {
                        character: attacker.id.clone(),
                        item: name.clone(),
                    })?;
                AttackProfile::from_item(item, plan.band)
            }
            None => AttackProfile::unarmed(self.rules())?,
        };
        if let Some(missing) = defender.filter(|id| !self.repository.exists(id)) {
            return Err(RuntimeError::CharacterNotFound(missing.clone()));
        }

        let record = self.finalize(plan).await?;
        let exchange = Exchange::new(record, profile);
        Ok(match defender {
            Some(defender) => exchange.against(defender.clone()),
            None => exchange,
        })
    }

    /// Rolls the defense, adjudicates and applies any damage.
    pub async fn defend(
        &self,
        exchange: &mut Exchange,
        plan: &RollPlan,
    ) -> Result<ExchangeOutcome> {
        exchange.check_defense(&plan.actor)?;
        let attacker = self.character(exchange.attacker())?;

        let defense = self.finalize(plan).await?;
        let mut outcome = exchange.resolve_defense(&attacker, &defense)?;
        self.settle(&mut outcome).await?;
        Ok(outcome)
    }

    /// Rolls the counter-attack, adjudicates and applies any damage.
    pub async fn counter(
        &self,
        exchange: &mut Exchange,
        counter: &CounterPlan,
    ) -> Result<ExchangeOutcome> {
        exchange.check_counter(&counter.plan.actor)?;
        let attacker = self.character(exchange.attacker())?;
        let defender = self.character(&counter.plan.actor)?;

        let record = self.finalize(&counter.plan).await?;
        exchange.declare_counter()?;
        let mut outcome = exchange.resolve_counter(
            &attacker,
            &defender,
            &counter.weapon,
            &record,
            self.rules(),
        )?;
        self.settle(&mut outcome).await?;
        Ok(outcome)
    }

    async fn settle(&self, outcome: &mut ExchangeOutcome) -> Result<()> {
        match outcome.damage.as_mut() {
            Some(damage) => {
                self.apply_damage(damage).await?;
            }
            None => info!(
                kind = %outcome.kind,
                attacker = outcome.attacker_successes,
                defender = outcome.defender_successes,
                "exchange resolved without damage"
            ),
        }
        Ok(())
    }

    // ===== wounds =====

    /// Applies a damage record to its receiver and publishes it.
    ///
    /// The receiver's track is first sized to the configured box counts.
    /// External damage is published without marking the wound track.
    pub async fn apply_damage(&self, damage: &mut DamageRecord) -> Result<Option<WoundOutcome>> {
        let receiver = self.character(&damage.receiver)?;
        let thresholds = WoundThresholds::for_character(&receiver);
        let capacity = WoundCapacity::for_character(&receiver, self.rules());
        let mut track = receiver.wounds.clone();
        let resized = track.capacity() != capacity;
        track.resize(capacity);

        let wound = damage.apply(&mut track, &thresholds);
        let marked = matches!(
            wound,
            Some(WoundOutcome::Marked { .. } | WoundOutcome::Incapacitated { .. })
        );
        if resized || marked {
            self.repository.replace_wounds(&damage.receiver, track)?;
        }

        match (&damage.amount, wound) {
            (_, Some(WoundOutcome::NoEffect)) => {
                info!(
                    receiver = %damage.receiver,
                    amount = %damage.amount,
                    "damage below light threshold"
                )
            }
            (_, Some(outcome)) => {
                info!(
                    receiver = %damage.receiver,
                    amount = %damage.amount,
                    tier = ?outcome.tier(),
                    "wound applied"
                );
            }
            (DamageAmount::External { tag, margin }, None) => {
                info!(
                    receiver = %damage.receiver,
                    tag = tag.as_str(),
                    margin = *margin,
                    "external damage reported"
                )
            }
            (DamageAmount::Points(_), None) => {}
        }

        self.sink.publish_damage(damage).await?;
        Ok(wound)
    }

    /// Clears one wound tier.
    pub fn heal(&self, id: &CharacterId, tier: WoundTier) -> Result<WoundTrack> {
        let mut track = self.character(id)?.wounds;
        track.heal(tier);
        self.repository.replace_wounds(id, track.clone())?;
        info!(character = %id, tier = %tier, "wounds healed");
        Ok(track)
    }

    /// Clears every wound and the incapacitated flag.
    pub fn recover(&self, id: &CharacterId) -> Result<WoundTrack> {
        let mut track = self.character(id)?.wounds;
        track.recover();
        self.repository.replace_wounds(id, track.clone())?;
        info!(character = %id, "character recovered");
        Ok(track)
    }

    // ===== records =====

    /// Applies a host patch, then resizes the wound track if the patch
    /// changed the box counts.
    pub fn patch_character(
        &self,
        id: &CharacterId,
        patch: &RecordPatch,
    ) -> Result<CharacterRecord> {
        let mut record = self.repository.apply_patch(id, patch)?;
        debug!(character = %id, fields = patch.len(), "character patched");

        let capacity = WoundCapacity::for_character(&record, self.rules());
        if record.wounds.capacity() != capacity {
            record.wounds.resize(capacity);
            self.repository.replace_wounds(id, record.wounds.clone())?;
            debug!(
                character = %id,
                light = capacity.light,
                severe = capacity.severe,
                "wound track resized"
            );
        }
        Ok(record)
    }
}

fn log_plan(plan: &RollPlan) {
    debug!(
        actor = %plan.actor,
        action = %plan.action.label(),
        item = plan.item.as_deref(),
        pool = plan.pool.total,
        rr_sources = plan.risk_reduction.sources().len(),
        rr = plan.risk_reduction.total(),
        mode = %plan.mode,
        "roll planned"
    );
}

/// Builder for [`RulesRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn CharacterRepository>>,
    sink: Option<Arc<dyn ResultSink>>,
    roller: Option<Box<dyn DiceRoller + Send>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            sink: None,
            roller: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required character repository
    pub fn repository(mut self, repository: impl CharacterRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Share a repository the caller keeps a handle to
    pub fn shared_repository(mut self, repository: Arc<dyn CharacterRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the required result sink
    pub fn sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Share a sink the caller keeps a handle to
    pub fn shared_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the default `rand` roller (seeded from the config when it
    /// carries a seed)
    pub fn roller(mut self, roller: impl DiceRoller + Send + 'static) -> Self {
        self.roller = Some(Box::new(roller));
        self
    }

    pub fn build(self) -> Result<RulesRuntime> {
        self.config.validate()?;
        let repository = self
            .repository
            .ok_or(RuntimeError::MissingComponent("character repository"))?;
        let sink = self
            .sink
            .ok_or(RuntimeError::MissingComponent("result sink"))?;
        let roller = self
            .roller
            .unwrap_or_else(|| Box::new(RandRoller::from_seed_option(self.config.seed)));

        Ok(RulesRuntime {
            config: self.config,
            repository,
            sink,
            roller: Mutex::new(roller),
        })
    }
}
