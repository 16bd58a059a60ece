//! Dice pool assembly.
//!
//! ```text
//! attribute action       pool = attribute
//! skill action           pool = attribute(skill) + rating
//! specialization action  pool = attribute(spec, else skill) + rating(skill) + 2
//! item action            + item pool bonus, on whichever of the above resolved
//! ```
//!
//! A reference that cannot be resolved on the character yields an empty
//! pool. The roll still happens and simply produces no successes.

use crate::character::{Attribute, CharacterOracle, ItemKind, ItemProfile};
use crate::config::RulesConfig;

/// What the character rolls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionRef {
    Attribute(Attribute),
    Skill(String),
    Specialization(String),
}

impl ActionRef {
    pub fn skill(name: impl Into<String>) -> Self {
        ActionRef::Skill(name.into())
    }

    pub fn specialization(name: impl Into<String>) -> Self {
        ActionRef::Specialization(name.into())
    }

    /// Display label of the reference.
    pub fn label(&self) -> String {
        match self {
            ActionRef::Attribute(attribute) => attribute.to_string(),
            ActionRef::Skill(name) | ActionRef::Specialization(name) => name.clone(),
        }
    }
}

/// How a dice pool was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolBreakdown {
    /// Linked attribute, `None` when nothing resolved.
    pub attribute: Option<Attribute>,
    pub attribute_value: u32,
    /// Skill as named on the character.
    pub skill: Option<String>,
    pub skill_rating: u32,
    /// Specialization as named on the character.
    pub specialization: Option<String>,
    /// Specialization dice added on top of the skill rating.
    pub specialization_bonus: u32,
    pub item_bonus: u32,
    pub total: u32,
}

impl PoolBreakdown {
    /// Pool of an unresolvable reference.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.attribute.is_some()
    }

    /// Rating used in the pool: skill rating plus specialization bonus.
    pub fn effective_rating(&self) -> u32 {
        self.skill_rating + self.specialization_bonus
    }

    fn finish(mut self, item_bonus: u32) -> Self {
        self.item_bonus = item_bonus;
        self.total = self.attribute_value + self.effective_rating() + item_bonus;
        self
    }
}

/// Assembles the dice pool for an action.
///
/// `item_bonus` is added only when the reference resolves.
pub fn assemble_pool(
    character: &(impl CharacterOracle + ?Sized),
    action: &ActionRef,
    item_bonus: u32,
) -> PoolBreakdown {
    let breakdown = match action {
        ActionRef::Attribute(attribute) => PoolBreakdown {
            attribute: Some(*attribute),
            attribute_value: character.attribute(*attribute),
            ..PoolBreakdown::default()
        },

        ActionRef::Skill(name) => match character.skill(name) {
            Some(skill) => PoolBreakdown {
                attribute: Some(skill.attribute),
                attribute_value: character.attribute(skill.attribute),
                skill: Some(skill.name.clone()),
                skill_rating: skill.rating,
                ..PoolBreakdown::default()
            },
            None => return PoolBreakdown::empty(),
        },

        ActionRef::Specialization(name) => {
            let Some(specialization) = character.specialization(name) else {
                return PoolBreakdown::empty();
            };
            let parent = character.skill(&specialization.skill);
            let Some(attribute) = specialization
                .attribute
                .or_else(|| parent.map(|skill| skill.attribute))
            else {
                return PoolBreakdown::empty();
            };

            PoolBreakdown {
                attribute: Some(attribute),
                attribute_value: character.attribute(attribute),
                skill: Some(
                    parent
                        .map(|skill| skill.name.clone())
                        .unwrap_or_else(|| specialization.skill.clone()),
                ),
                skill_rating: parent.map(|skill| skill.rating).unwrap_or(0),
                specialization: Some(specialization.name.clone()),
                specialization_bonus: RulesConfig::SPECIALIZATION_BONUS,
                ..PoolBreakdown::default()
            }
        }
    };

    breakdown.finish(item_bonus)
}

/// Resolves the skill or specialization a weapon or spell rolls with.
///
/// Order: the item's specialization if the character has it, then the
/// item's skill if the character has it, then the configured default skill
/// for the item kind.
pub fn resolve_item_action(
    character: &(impl CharacterOracle + ?Sized),
    item: &ItemProfile,
    config: &RulesConfig,
) -> ActionRef {
    if let Some(name) = &item.specialization
        && character.specialization(name).is_some()
    {
        return ActionRef::Specialization(name.clone());
    }

    if let Some(name) = &item.skill
        && character.skill(name).is_some()
    {
        return ActionRef::Skill(name.clone());
    }

    let fallback = match item.kind {
        ItemKind::Weapon => &config.default_weapon_skill,
        ItemKind::Spell => &config.default_spell_skill,
    };
    ActionRef::Skill(fallback.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterRecord, RangeProfile, Specialization};
    use crate::combat::DamageValue;

    fn runner() -> CharacterRecord {
        CharacterRecord::builder("runner", "Runner")
            .attribute(Attribute::Strength, 4)
            .attribute(Attribute::Agility, 5)
            .attribute(Attribute::Logic, 2)
            .skill("Firearms", 3, Attribute::Agility)
            .skill("Close Combat", 2, Attribute::Strength)
            .specialization(Specialization::new("Pistols", "Firearms"))
            .specialization(
                Specialization::new("Blades", "Close Combat").with_attribute(Attribute::Agility),
            )
            .specialization(Specialization::new("Hacking", "Electronics"))
            .build()
    }

    #[test]
    fn attribute_pool_is_attribute_value() {
        let pool = assemble_pool(&runner(), &ActionRef::Attribute(Attribute::Agility), 0);
        assert_eq!(pool.total, 5);
        assert_eq!(pool.attribute, Some(Attribute::Agility));
    }

    #[test]
    fn skill_pool_adds_linked_attribute() {
        let pool = assemble_pool(&runner(), &ActionRef::skill("firearms"), 0);
        assert_eq!(pool.total, 5 + 3);
        assert_eq!(pool.skill.as_deref(), Some("Firearms"));
    }

    #[test]
    fn specialization_pool_uses_parent_rating_plus_two() {
        let pool = assemble_pool(&runner(), &ActionRef::specialization("Pistols"), 0);
        assert_eq!(pool.effective_rating(), 5);
        assert_eq!(pool.total, 5 + 3 + 2);
    }

    #[test]
    fn specialization_attribute_overrides_parent_attribute() {
        let pool = assemble_pool(&runner(), &ActionRef::specialization("Blades"), 0);
        assert_eq!(pool.attribute, Some(Attribute::Agility));
        assert_eq!(pool.total, 5 + 2 + 2);
    }

    #[test]
    fn unresolvable_references_yield_empty_pool() {
        let runner = runner();
        let pool = assemble_pool(&runner, &ActionRef::skill("Piloting"), 2);
        assert_eq!(pool, PoolBreakdown::empty());
        assert!(!pool.is_resolved());

        // Parent skill missing and no own attribute.
        let pool = assemble_pool(&runner, &ActionRef::specialization("Hacking"), 0);
        assert_eq!(pool.total, 0);
    }

    #[test]
    fn item_bonus_is_added_to_resolved_pool() {
        let pool = assemble_pool(&runner(), &ActionRef::skill("Firearms"), 2);
        assert_eq!(pool.item_bonus, 2);
        assert_eq!(pool.total, 10);
    }

    #[test]
    fn item_action_prefers_specialization_then_skill_then_default() {
        let runner = runner();
        let config = RulesConfig::default();
        let pistol = ItemProfile::weapon("Pistol", DamageValue::Fixed(3))
            .with_range(RangeProfile::default())
            .with_skill("Firearms")
            .with_specialization("Pistols");
        assert_eq!(
            resolve_item_action(&runner, &pistol, &config),
            ActionRef::specialization("Pistols")
        );

        let rifle = ItemProfile::weapon("Rifle", DamageValue::Fixed(5))
            .with_skill("Firearms")
            .with_specialization("Rifles");
        assert_eq!(
            resolve_item_action(&runner, &rifle, &config),
            ActionRef::skill("Firearms")
        );

        let club = ItemProfile::weapon("Club", DamageValue::strength(1));
        assert_eq!(
            resolve_item_action(&runner, &club, &config),
            ActionRef::skill(RulesConfig::DEFAULT_WEAPON_SKILL)
        );
    }
}
