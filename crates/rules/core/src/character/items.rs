//! Weapons and spells a character can act with.

use crate::combat::DamageValue;

use super::traits::TraitBonus;

/// Item type, which decides the fallback skill when none is linked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Weapon,
    Spell,
}

/// Distance band between attacker and target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RangeBand {
    Melee,
    Short,
    Medium,
    Long,
}

/// How usable an item is at a given band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RangeSuitability {
    /// Cannot be used at this band.
    #[default]
    None,
    /// Usable without penalty.
    Ok,
    /// Usable, but rolled with disadvantage.
    Disadvantage,
}

impl RangeSuitability {
    pub const fn is_usable(self) -> bool {
        !matches!(self, RangeSuitability::None)
    }
}

/// Suitability of an item over the four range bands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RangeProfile {
    pub melee: RangeSuitability,
    pub short: RangeSuitability,
    pub medium: RangeSuitability,
    pub long: RangeSuitability,
}

impl RangeProfile {
    pub const fn new(
        melee: RangeSuitability,
        short: RangeSuitability,
        medium: RangeSuitability,
        long: RangeSuitability,
    ) -> Self {
        Self {
            melee,
            short,
            medium,
            long,
        }
    }

    /// Usable in melee only.
    pub const fn melee_only() -> Self {
        Self::new(
            RangeSuitability::Ok,
            RangeSuitability::None,
            RangeSuitability::None,
            RangeSuitability::None,
        )
    }

    pub const fn get(&self, band: RangeBand) -> RangeSuitability {
        match band {
            RangeBand::Melee => self.melee,
            RangeBand::Short => self.short,
            RangeBand::Medium => self.medium,
            RangeBand::Long => self.long,
        }
    }

    pub const fn is_melee_capable(&self) -> bool {
        self.melee.is_usable()
    }
}

/// Rules-relevant fields of a weapon or spell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemProfile {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ItemKind,
    pub damage: DamageValue,
    /// Flat damage added on top of the damage expression.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_bonus: u32,
    /// Extra dice added to the pool when acting with this item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pool_bonus: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: RangeProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub specialization: Option<String>,
    /// Skill the target rolls to defend against this item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_skill: Option<String>,
    /// Specialization the target rolls to defend, preferred over the skill.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_specialization: Option<String>,
    /// Intrinsic bonus list, merged into the roll's risk reduction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<TraitBonus>,
}

impl ItemProfile {
    pub fn new(name: impl Into<String>, kind: ItemKind, damage: DamageValue) -> Self {
        Self {
            name: name.into(),
            kind,
            damage,
            damage_bonus: 0,
            pool_bonus: 0,
            range: RangeProfile::melee_only(),
            skill: None,
            specialization: None,
            defense_skill: None,
            defense_specialization: None,
            bonuses: Vec::new(),
        }
    }

    pub fn weapon(name: impl Into<String>, damage: DamageValue) -> Self {
        Self::new(name, ItemKind::Weapon, damage)
    }

    pub fn spell(name: impl Into<String>, damage: DamageValue) -> Self {
        Self::new(name, ItemKind::Spell, damage)
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeProfile) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    #[must_use]
    pub fn with_defense_skill(mut self, skill: impl Into<String>) -> Self {
        self.defense_skill = Some(skill.into());
        self
    }

    #[must_use]
    pub fn with_defense_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.defense_specialization = Some(specialization.into());
        self
    }

    #[must_use]
    pub fn with_damage_bonus(mut self, bonus: u32) -> Self {
        self.damage_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_pool_bonus(mut self, bonus: u32) -> Self {
        self.pool_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_bonus(mut self, bonus: TraitBonus) -> Self {
        self.bonuses.push(bonus);
        self
    }
}
