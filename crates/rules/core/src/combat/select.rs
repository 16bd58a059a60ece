//! Range gating, defense skill choice and counter-attack weapon choice.

use crate::character::{
    CharacterOracle, ItemKind, ItemProfile, RangeBand, RangeSuitability, TraitBonus,
};
use crate::config::RulesConfig;
use crate::pool::{ActionRef, resolve_item_action};

use super::damage::{DamageValue, evaluate_damage};
use super::error::CombatError;

/// Rejects a band the item cannot be used at.
pub fn check_range(item: &ItemProfile, band: RangeBand) -> Result<RangeSuitability, CombatError> {
    let suitability = item.range.get(band);
    if suitability.is_usable() {
        Ok(suitability)
    } else {
        Err(CombatError::RangeNotUsable {
            item: item.name.clone(),
            band,
        })
    }
}

/// Picks what the defender rolls against an attack.
///
/// The attack's declared defense specialization wins when the defender has
/// it, then its defense skill. Otherwise melee attacks (and attacks with no
/// band) fall back to the contact-combat skill and ranged ones to the
/// default defense skill.
pub fn defense_action(
    defender: &(impl CharacterOracle + ?Sized),
    defense_specialization: Option<&str>,
    defense_skill: Option<&str>,
    band: Option<RangeBand>,
    config: &RulesConfig,
) -> ActionRef {
    if let Some(name) = defense_specialization
        && defender.specialization(name).is_some()
    {
        return ActionRef::specialization(name);
    }
    if let Some(name) = defense_skill
        && defender.skill(name).is_some()
    {
        return ActionRef::skill(name);
    }

    match band {
        None | Some(RangeBand::Melee) => ActionRef::skill(config.contact_combat_skill.clone()),
        Some(_) => ActionRef::skill(config.default_defense_skill.clone()),
    }
}

/// Weapon a defender counter-attacks with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CounterWeapon {
    Weapon(ItemProfile),
    /// Bare hands: configured unarmed skill and damage.
    Unarmed,
}

impl CounterWeapon {
    pub fn name(&self) -> &str {
        match self {
            CounterWeapon::Weapon(item) => &item.name,
            CounterWeapon::Unarmed => "unarmed",
        }
    }

    pub fn item(&self) -> Option<&ItemProfile> {
        match self {
            CounterWeapon::Weapon(item) => Some(item),
            CounterWeapon::Unarmed => None,
        }
    }

    pub fn damage(&self, config: &RulesConfig) -> Result<DamageValue, CombatError> {
        match self {
            CounterWeapon::Weapon(item) => Ok(item.damage.clone()),
            CounterWeapon::Unarmed => Ok(DamageValue::parse(&config.unarmed_damage)?),
        }
    }

    pub fn damage_bonus(&self) -> u32 {
        self.item().map(|item| item.damage_bonus).unwrap_or(0)
    }

    pub fn pool_bonus(&self) -> u32 {
        self.item().map(|item| item.pool_bonus).unwrap_or(0)
    }

    pub fn bonuses(&self) -> &[TraitBonus] {
        self.item().map(|item| item.bonuses.as_slice()).unwrap_or(&[])
    }

    /// Skill or specialization the counter-attack rolls with.
    pub fn action(
        &self,
        character: &(impl CharacterOracle + ?Sized),
        config: &RulesConfig,
    ) -> ActionRef {
        match self {
            CounterWeapon::Weapon(item) => resolve_item_action(character, item, config),
            CounterWeapon::Unarmed => ActionRef::skill(config.unarmed_skill.clone()),
        }
    }

    /// Melee suitability, `Ok` for bare hands.
    pub fn suitability(&self) -> RangeSuitability {
        match self {
            CounterWeapon::Weapon(item) => item.range.melee,
            CounterWeapon::Unarmed => RangeSuitability::Ok,
        }
    }
}

fn is_counter_capable(item: &ItemProfile) -> bool {
    item.kind == ItemKind::Weapon && item.range.is_melee_capable()
}

/// Picks the melee-capable weapon with the highest damage, falling back to
/// unarmed combat.
///
/// External damage ranks below any numeric damage. On a tie the weapon
/// listed first wins.
pub fn select_counter_weapon(character: &(impl CharacterOracle + ?Sized)) -> CounterWeapon {
    let mut best: Option<(&ItemProfile, Option<u32>)> = None;

    for item in character.items().iter().filter(|item| is_counter_capable(item)) {
        let rank = evaluate_damage(&item.damage, character, item.damage_bonus, 0).points();
        let better = match best {
            None => true,
            Some((_, best_rank)) => rank > best_rank,
        };
        if better {
            best = Some((item, rank));
        }
    }

    match best {
        Some((item, _)) => CounterWeapon::Weapon(item.clone()),
        None => CounterWeapon::Unarmed,
    }
}

/// Looks up an explicitly chosen counter-attack weapon.
pub fn counter_weapon_named(
    character: &(impl CharacterOracle + ?Sized),
    name: &str,
) -> Result<CounterWeapon, CombatError> {
    let item = character
        .item(name)
        .ok_or_else(|| CombatError::UnknownItem {
            character: character.id().clone(),
            item: name.to_string(),
        })?;

    if !is_counter_capable(item) {
        return Err(CombatError::NotMeleeCapable {
            item: item.name.clone(),
        });
    }
    Ok(CounterWeapon::Weapon(item.clone()))
}
