//! Wound tracks and damage application.
//!
//! Damage never reduces a pool of hit points. It is compared against three
//! thresholds and marks at most one box per application:
//!
//! ```text
//! damage >  severe    → incapacitated
//! damage >  moderate  → severe box   → (full) incapacitated
//! damage >  light     → light box    → (full) severe box → (full) incapacitated
//! damage <= light     → no effect
//! ```

use crate::character::{Attribute, BonusKind, CharacterOracle};
use crate::config::RulesConfig;

/// Wound tiers in overflow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum WoundTier {
    Light,
    Severe,
    Incapacitated,
}

/// Damage thresholds of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WoundThresholds {
    pub light: u32,
    pub moderate: u32,
    pub severe: u32,
}

impl WoundThresholds {
    pub const fn new(light: u32, moderate: u32, severe: u32) -> Self {
        Self {
            light,
            moderate,
            severe,
        }
    }

    /// Computes thresholds from a base attribute value, armor and per-tier
    /// bonuses.
    ///
    /// # Formula
    ///
    /// ```text
    /// light    = base     + armor + light_bonus
    /// moderate = 2 × base + armor + moderate_bonus
    /// severe   = 3 × base + armor + severe_bonus
    /// ```
    pub fn compute(base: u32, armor: u32, bonuses: [i32; 3]) -> Self {
        let tier = |multiplier: u32, bonus: i32| {
            (base * multiplier + armor).saturating_add_signed(bonus)
        };
        Self {
            light: tier(1, bonuses[0]),
            moderate: tier(2, bonuses[1]),
            severe: tier(3, bonuses[2]),
        }
    }

    /// Thresholds of a character: strength as base, record armor plus armor
    /// bonuses, and threshold bonuses from active traits.
    pub fn for_character(character: &(impl CharacterOracle + ?Sized)) -> Self {
        let armor = character
            .armor()
            .saturating_add_signed(character.bonus_total(BonusKind::Armor));
        Self::compute(
            character.attribute(Attribute::Strength),
            armor,
            [
                character.bonus_total(BonusKind::LightThreshold),
                character.bonus_total(BonusKind::ModerateThreshold),
                character.bonus_total(BonusKind::SevereThreshold),
            ],
        )
    }
}

/// Number of boxes in each tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WoundCapacity {
    pub light: usize,
    pub severe: usize,
}

impl WoundCapacity {
    pub const fn new(light: usize, severe: usize) -> Self {
        Self { light, severe }
    }

    /// Base box counts plus extra boxes granted by active traits.
    pub fn for_character(
        character: &(impl CharacterOracle + ?Sized),
        config: &RulesConfig,
    ) -> Self {
        let extra = |kind| usize::try_from(character.bonus_total(kind).max(0)).unwrap_or(0);
        Self {
            light: config.base_light_boxes + extra(BonusKind::LightWoundBoxes),
            severe: config.base_severe_boxes + extra(BonusKind::SevereWoundBoxes),
        }
    }
}

/// Marked wound boxes of a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WoundTrack {
    pub light: Vec<bool>,
    pub severe: Vec<bool>,
    pub incapacitated: bool,
}

impl WoundTrack {
    /// Creates an unmarked track with the given box counts.
    pub fn with_capacity(capacity: WoundCapacity) -> Self {
        Self {
            light: vec![false; capacity.light],
            severe: vec![false; capacity.severe],
            incapacitated: false,
        }
    }

    pub fn capacity(&self) -> WoundCapacity {
        WoundCapacity::new(self.light.len(), self.severe.len())
    }

    /// Grows each tier by appending open boxes, shrinks it by truncating
    /// from the end.
    ///
    /// Marks in truncated boxes are dropped, not carried to the next tier.
    pub fn resize(&mut self, capacity: WoundCapacity) {
        self.light.resize(capacity.light, false);
        self.severe.resize(capacity.severe, false);
    }

    pub fn has_severe_wound(&self) -> bool {
        self.incapacitated || self.severe.iter().any(|marked| *marked)
    }

    pub fn marked(&self, tier: WoundTier) -> usize {
        match tier {
            WoundTier::Light => self.light.iter().filter(|m| **m).count(),
            WoundTier::Severe => self.severe.iter().filter(|m| **m).count(),
            WoundTier::Incapacitated => usize::from(self.incapacitated),
        }
    }

    /// Marks the first open box of a tier, returning its index.
    ///
    /// Marking [`WoundTier::Incapacitated`] always succeeds and returns 0.
    pub fn mark_first_open(&mut self, tier: WoundTier) -> Option<usize> {
        let boxes = match tier {
            WoundTier::Light => &mut self.light,
            WoundTier::Severe => &mut self.severe,
            WoundTier::Incapacitated => {
                self.incapacitated = true;
                return Some(0);
            }
        };
        let index = boxes.iter().position(|marked| !*marked)?;
        boxes[index] = true;
        Some(index)
    }

    /// Clears every box of a tier.
    pub fn heal(&mut self, tier: WoundTier) {
        match tier {
            WoundTier::Light => self.light.iter_mut().for_each(|m| *m = false),
            WoundTier::Severe => self.severe.iter_mut().for_each(|m| *m = false),
            WoundTier::Incapacitated => self.incapacitated = false,
        }
    }

    /// Clears the whole track.
    pub fn recover(&mut self) {
        self.heal(WoundTier::Light);
        self.heal(WoundTier::Severe);
        self.heal(WoundTier::Incapacitated);
    }
}

/// Effect of one damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WoundOutcome {
    /// Damage did not exceed the light threshold.
    NoEffect,
    /// A box was marked. `overflow` is set when the tier the damage called
    /// for was full and the mark cascaded to this one.
    Marked {
        tier: WoundTier,
        index: usize,
        overflow: bool,
    },
    /// The character is incapacitated.
    Incapacitated { overflow: bool },
}

impl WoundOutcome {
    pub const fn tier(&self) -> Option<WoundTier> {
        match self {
            WoundOutcome::NoEffect => None,
            WoundOutcome::Marked { tier, .. } => Some(*tier),
            WoundOutcome::Incapacitated { .. } => Some(WoundTier::Incapacitated),
        }
    }
}

/// Applies resolved damage to a wound track.
pub fn apply_damage(
    track: &mut WoundTrack,
    damage: u32,
    thresholds: &WoundThresholds,
) -> WoundOutcome {
    let entry = if damage > thresholds.severe {
        WoundTier::Incapacitated
    } else if damage > thresholds.moderate {
        WoundTier::Severe
    } else if damage > thresholds.light {
        WoundTier::Light
    } else {
        return WoundOutcome::NoEffect;
    };

    let cascade: &[WoundTier] = match entry {
        WoundTier::Light => &[WoundTier::Light, WoundTier::Severe],
        WoundTier::Severe => &[WoundTier::Severe],
        WoundTier::Incapacitated => &[],
    };

    for tier in cascade {
        if let Some(index) = track.mark_first_open(*tier) {
            return WoundOutcome::Marked {
                tier: *tier,
                index,
                overflow: *tier != entry,
            };
        }
    }

    track.incapacitated = true;
    WoundOutcome::Incapacitated {
        overflow: entry != WoundTier::Incapacitated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterRecord, CharacterTrait, TraitBonus};

    const THRESHOLDS: WoundThresholds = WoundThresholds::new(3, 6, 9);

    fn track() -> WoundTrack {
        WoundTrack::with_capacity(WoundCapacity::new(2, 1))
    }

    #[test]
    fn damage_between_moderate_and_severe_marks_severe_box() {
        let mut track = track();
        let outcome = apply_damage(&mut track, 7, &THRESHOLDS);

        assert_eq!(
            outcome,
            WoundOutcome::Marked {
                tier: WoundTier::Severe,
                index: 0,
                overflow: false
            }
        );
        assert_eq!(track.light, vec![false, false]);
        assert_eq!(track.severe, vec![true]);
        assert!(!track.incapacitated);
    }

    #[test]
    fn damage_at_light_threshold_has_no_effect() {
        let mut track = track();
        assert_eq!(apply_damage(&mut track, 3, &THRESHOLDS), WoundOutcome::NoEffect);
        assert_eq!(track, self::track());
    }

    #[test]
    fn damage_above_severe_threshold_incapacitates() {
        let mut track = track();
        let outcome = apply_damage(&mut track, 10, &THRESHOLDS);
        assert_eq!(outcome, WoundOutcome::Incapacitated { overflow: false });
        assert!(track.incapacitated);
        assert_eq!(track.marked(WoundTier::Severe), 0);
    }

    #[test]
    fn light_damage_cascades_light_then_severe_then_incapacitated() {
        let mut track = track();
        let tiers: Vec<_> = (0..4)
            .map(|_| apply_damage(&mut track, 4, &THRESHOLDS))
            .collect();

        assert_eq!(
            tiers,
            vec![
                WoundOutcome::Marked {
                    tier: WoundTier::Light,
                    index: 0,
                    overflow: false
                },
                WoundOutcome::Marked {
                    tier: WoundTier::Light,
                    index: 1,
                    overflow: false
                },
                WoundOutcome::Marked {
                    tier: WoundTier::Severe,
                    index: 0,
                    overflow: true
                },
                WoundOutcome::Incapacitated { overflow: true },
            ]
        );
    }

    #[test]
    fn full_severe_track_overflows_to_incapacitated() {
        let mut track = track();
        track.severe[0] = true;
        let outcome = apply_damage(&mut track, 8, &THRESHOLDS);
        assert_eq!(outcome, WoundOutcome::Incapacitated { overflow: true });
        assert_eq!(track.marked(WoundTier::Light), 0);
    }

    #[test]
    fn resize_appends_open_boxes_and_truncates_marks() {
        let mut track = track();
        track.light = vec![true, true];

        track.resize(WoundCapacity::new(3, 2));
        assert_eq!(track.light, vec![true, true, false]);
        assert_eq!(track.severe, vec![false, false]);

        track.resize(WoundCapacity::new(1, 1));
        assert_eq!(track.light, vec![true]);
        assert_eq!(track.marked(WoundTier::Light), 1);
    }

    #[test]
    fn thresholds_scale_with_strength_and_armor() {
        assert_eq!(WoundThresholds::compute(3, 0, [0; 3]), THRESHOLDS);
        assert_eq!(
            WoundThresholds::compute(3, 2, [1, 0, -1]),
            WoundThresholds::new(6, 8, 10)
        );
    }

    #[test]
    fn character_thresholds_and_capacity_include_trait_bonuses() {
        let record = CharacterRecord::builder("kat", "Kat")
            .attribute(Attribute::Strength, 3)
            .armor(1)
            .with_trait(
                CharacterTrait::new("Dermal Plating")
                    .bonus(TraitBonus::new(BonusKind::Armor, 1, ""))
                    .bonus(TraitBonus::new(BonusKind::SevereWoundBoxes, 1, "")),
            )
            .build();

        assert_eq!(
            WoundThresholds::for_character(&record),
            WoundThresholds::new(5, 8, 11)
        );
        assert_eq!(record.wounds.capacity(), WoundCapacity::new(2, 2));
    }

    #[test]
    fn heal_clears_a_single_tier() {
        let mut track = track();
        apply_damage(&mut track, 4, &THRESHOLDS);
        apply_damage(&mut track, 7, &THRESHOLDS);
        assert!(track.has_severe_wound());

        track.heal(WoundTier::Severe);
        assert!(!track.has_severe_wound());
        assert_eq!(track.marked(WoundTier::Light), 1);

        track.recover();
        assert_eq!(track, self::track());
    }
}
