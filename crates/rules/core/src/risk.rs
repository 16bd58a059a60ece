//! Risk-reduction aggregation.
//!
//! Active traits (and an item's intrinsic bonuses) may reduce the
//! complications caused by critical failures on risk dice. Every matching
//! bonus becomes an [`RrSource`] the player can switch off before rolling;
//! the applied total is the sum of enabled sources capped at
//! [`RulesConfig::RISK_REDUCTION_CAP`].

use crate::character::{Attribute, BonusKind, CharacterOracle, ItemProfile, TraitBonus};
use crate::config::RulesConfig;
use crate::names::{names_match, normalize};
use crate::pool::PoolBreakdown;

/// What an RR bonus is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RrTarget {
    Skill,
    Specialization,
    Attribute,
}

impl RrTarget {
    pub const fn bonus_kind(self) -> BonusKind {
        match self {
            RrTarget::Skill => BonusKind::SkillRiskReduction,
            RrTarget::Specialization => BonusKind::SpecializationRiskReduction,
            RrTarget::Attribute => BonusKind::AttributeRiskReduction,
        }
    }

    pub const fn from_bonus_kind(kind: BonusKind) -> Option<Self> {
        match kind {
            BonusKind::SkillRiskReduction => Some(RrTarget::Skill),
            BonusKind::SpecializationRiskReduction => Some(RrTarget::Specialization),
            BonusKind::AttributeRiskReduction => Some(RrTarget::Attribute),
            _ => None,
        }
    }
}

/// One contribution to a roll's risk reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RrSource {
    /// Trait or item the bonus comes from.
    pub origin: String,
    pub target: RrTarget,
    /// Skill, specialization or attribute name as written on the bonus.
    pub target_name: String,
    pub value: u32,
    pub enabled: bool,
}

impl RrSource {
    pub fn new(
        origin: impl Into<String>,
        target: RrTarget,
        target_name: impl Into<String>,
        value: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            target,
            target_name: target_name.into(),
            value,
            enabled: true,
        }
    }

    fn same_source(&self, other: &RrSource) -> bool {
        self.target == other.target
            && normalize(&self.origin) == normalize(&other.origin)
            && normalize(&self.target_name) == normalize(&other.target_name)
    }
}

/// Risk-reduction sources gathered for one roll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskReduction {
    sources: Vec<RrSource>,
}

impl RiskReduction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources(sources: impl IntoIterator<Item = RrSource>) -> Self {
        let mut rr = Self::new();
        for source in sources {
            rr.push(source);
        }
        rr
    }

    pub fn sources(&self) -> &[RrSource] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Adds a source unless an equivalent one is already present.
    ///
    /// Sources with a zero value are dropped.
    pub fn push(&mut self, source: RrSource) {
        if source.value == 0 || self.sources.iter().any(|s| s.same_source(&source)) {
            return;
        }
        self.sources.push(source);
    }

    pub fn merge(&mut self, other: RiskReduction) {
        for source in other.sources {
            self.push(source);
        }
    }

    /// Sum of enabled sources before the cap.
    pub fn uncapped(&self) -> u32 {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.value)
            .sum()
    }

    /// Risk reduction applied to the roll.
    pub fn total(&self) -> u32 {
        self.uncapped().min(RulesConfig::RISK_REDUCTION_CAP)
    }

    /// Flips a source and returns its new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let source = self.sources.get_mut(index)?;
        source.enabled = !source.enabled;
        Some(source.enabled)
    }

    /// Returns false when no source exists at `index`.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.sources.get_mut(index) {
            Some(source) => {
                source.enabled = enabled;
                true
            }
            None => false,
        }
    }
}

fn matches_target(target: RrTarget, bonus_target: &str, query: &str) -> bool {
    match target {
        RrTarget::Attribute => match (Attribute::lookup(bonus_target), Attribute::lookup(query)) {
            (Some(left), Some(right)) => left == right,
            _ => names_match(bonus_target, query),
        },
        RrTarget::Skill | RrTarget::Specialization => names_match(bonus_target, query),
    }
}

fn source_from_bonus(origin: &str, bonus: &TraitBonus, target: RrTarget) -> Option<RrSource> {
    let value = u32::try_from(bonus.value).ok()?;
    Some(RrSource::new(origin, target, bonus.target.clone(), value))
}

/// Collects active-trait bonuses of one target kind matching `name`.
pub fn gather(
    character: &(impl CharacterOracle + ?Sized),
    target: RrTarget,
    name: &str,
) -> RiskReduction {
    let kind = target.bonus_kind();
    let mut rr = RiskReduction::new();

    for character_trait in character.active_traits() {
        for bonus in &character_trait.bonuses {
            if bonus.kind != kind || !matches_target(target, &bonus.target, name) {
                continue;
            }
            if let Some(source) = source_from_bonus(&character_trait.name, bonus, target) {
                rr.push(source);
            }
        }
    }
    rr
}

/// Collects trait sources for every component of an assembled pool: the
/// skill, the specialization when one was used, and the linked attribute.
pub fn gather_for_action(
    character: &(impl CharacterOracle + ?Sized),
    pool: &PoolBreakdown,
) -> RiskReduction {
    let mut rr = RiskReduction::new();
    if let Some(skill) = &pool.skill {
        rr.merge(gather(character, RrTarget::Skill, skill));
    }
    if let Some(specialization) = &pool.specialization {
        rr.merge(gather(character, RrTarget::Specialization, specialization));
    }
    if let Some(attribute) = pool.attribute {
        rr.merge(gather(character, RrTarget::Attribute, attribute.as_ref()));
    }
    rr
}

/// Trait sources for the pool, merged with the item's intrinsic bonuses.
///
/// An intrinsic bonus with an empty target applies to whatever the item is
/// rolled with.
pub fn gather_for_item(
    character: &(impl CharacterOracle + ?Sized),
    item: &ItemProfile,
    pool: &PoolBreakdown,
) -> RiskReduction {
    let mut rr = gather_for_action(character, pool);

    for bonus in &item.bonuses {
        let Some(target) = RrTarget::from_bonus_kind(bonus.kind) else {
            continue;
        };
        let resolved = match target {
            RrTarget::Skill => pool.skill.clone(),
            RrTarget::Specialization => pool.specialization.clone(),
            RrTarget::Attribute => pool.attribute.map(|a| a.to_string()),
        };
        let Some(resolved) = resolved else {
            continue;
        };

        let applies = bonus.target.trim().is_empty()
            || matches_target(target, &bonus.target, &resolved);
        if !applies {
            continue;
        }

        let value = match u32::try_from(bonus.value) {
            Ok(value) => value,
            Err(_) => continue,
        };
        rr.push(RrSource::new(item.name.clone(), target, resolved, value));
    }
    rr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterRecord, CharacterTrait, Specialization};
    use crate::combat::DamageValue;
    use crate::pool::{ActionRef, assemble_pool};

    fn adept() -> CharacterRecord {
        CharacterRecord::builder("adept", "Adept")
            .attribute(Attribute::Agility, 4)
            .skill("Combat Rapproché", 3, Attribute::Agility)
            .specialization(Specialization::new("Lames", "Combat Rapproché"))
            .with_trait(
                CharacterTrait::new("Maître d'armes")
                    .bonus(TraitBonus::skill_rr("combat rapproche", 1))
                    .bonus(TraitBonus::specialization_rr("LAMES", 1)),
            )
            .with_trait(CharacterTrait::new("Reflexes").bonus(TraitBonus::attribute_rr("AGI", 2)))
            .with_trait(
                CharacterTrait::new("Dormant")
                    .inactive()
                    .bonus(TraitBonus::skill_rr("Combat Rapproché", 3)),
            )
            .build()
    }

    #[test]
    fn gathers_matching_active_sources() {
        let adept = adept();
        let rr = gather(&adept, RrTarget::Skill, "Combat Rapproché");
        assert_eq!(rr.sources().len(), 1);
        assert_eq!(rr.sources()[0].origin, "Maître d'armes");
        assert_eq!(rr.total(), 1);

        let rr = gather(&adept, RrTarget::Attribute, "agility");
        assert_eq!(rr.total(), 2);
    }

    #[test]
    fn total_is_capped_but_sources_stay_visible() {
        let adept = adept();
        let pool = assemble_pool(&adept, &ActionRef::specialization("lames"), 0);
        let rr = gather_for_action(&adept, &pool);

        assert_eq!(rr.sources().len(), 3);
        assert_eq!(rr.uncapped(), 4);
        assert_eq!(rr.total(), 3);
    }

    #[test]
    fn toggling_recomputes_the_cap() {
        let adept = adept();
        let pool = assemble_pool(&adept, &ActionRef::specialization("lames"), 0);
        let mut rr = gather_for_action(&adept, &pool);

        assert_eq!(rr.toggle(2), Some(false));
        assert_eq!(rr.total(), 2);
        assert!(rr.set_enabled(2, true));
        assert_eq!(rr.total(), 3);
        assert_eq!(rr.toggle(9), None);
        assert!(!rr.set_enabled(9, false));
    }

    #[test]
    fn merge_deduplicates_same_origin_and_target() {
        let mut rr = RiskReduction::from_sources([RrSource::new(
            "Focus",
            RrTarget::Skill,
            "Sorcery",
            1,
        )]);
        rr.merge(RiskReduction::from_sources([
            RrSource::new("focus", RrTarget::Skill, "SORCERY", 1),
            RrSource::new("Focus", RrTarget::Attribute, "Willpower", 1),
            RrSource::new("Broken", RrTarget::Skill, "Sorcery", 0),
        ]));
        assert_eq!(rr.sources().len(), 2);
    }

    #[test]
    fn negative_bonuses_are_ignored() {
        let cursed = CharacterRecord::builder("c", "Cursed")
            .skill("Sorcery", 2, Attribute::Willpower)
            .with_trait(CharacterTrait::new("Hex").bonus(TraitBonus::skill_rr("Sorcery", -1)))
            .build();
        assert!(gather(&cursed, RrTarget::Skill, "Sorcery").is_empty());
    }

    #[test]
    fn item_bonuses_merge_with_trait_sources() {
        let adept = adept();
        let blade = ItemProfile::weapon("Monofilament", DamageValue::strength(2))
            .with_skill("Combat Rapproché")
            .with_bonus(TraitBonus::skill_rr("", 1))
            .with_bonus(TraitBonus::attribute_rr("Logic", 1));
        let pool = assemble_pool(&adept, &ActionRef::skill("Combat Rapproché"), 0);
        let rr = gather_for_item(&adept, &blade, &pool);

        let origins: Vec<_> = rr.sources().iter().map(|s| s.origin.as_str()).collect();
        assert_eq!(origins, ["Maître d'armes", "Reflexes", "Monofilament"]);
        assert_eq!(rr.total(), 3);
    }
}
