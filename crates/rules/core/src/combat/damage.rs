//! Damage expressions and their evaluation.
//!
//! Items store damage as a tagged value. Legacy records carry strings, which
//! [`DamageValue::parse`] converts:
//!
//! ```text
//! "4"      → Fixed(4)
//! "STR"    → AttributeLinked { Strength, 0 }
//! "STR+2"  → AttributeLinked { Strength, 2 }
//! "toxin"  → External("toxin")
//! ```

use core::fmt;
use core::str::FromStr;

use crate::character::{Attribute, CharacterOracle};

/// Damage expression of a weapon, spell or unarmed strike.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageValue {
    Fixed(u32),
    /// Current attribute value plus a modifier, floored at zero.
    AttributeLinked { attribute: Attribute, modifier: i32 },
    /// Effect handled outside the wound track (poison, toxin, drain).
    External(String),
}

/// Damage string that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DamageParseError {
    #[error("damage expression is empty")]
    Empty,

    #[error("invalid modifier in damage expression `{0}`")]
    InvalidModifier(String),
}

impl DamageValue {
    /// Strength plus `modifier`.
    pub const fn strength(modifier: i32) -> Self {
        DamageValue::AttributeLinked {
            attribute: Attribute::Strength,
            modifier,
        }
    }

    pub fn external(tag: impl Into<String>) -> Self {
        DamageValue::External(tag.into())
    }

    pub fn parse(input: &str) -> Result<Self, DamageParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DamageParseError::Empty);
        }

        if let Ok(points) = trimmed.parse::<u32>() {
            return Ok(DamageValue::Fixed(points));
        }

        let split = trimmed.find(['+', '-']);
        let (head, tail) = match split {
            Some(at) => trimmed.split_at(at),
            None => (trimmed, ""),
        };

        let Some(attribute) = Attribute::lookup(head) else {
            return Ok(DamageValue::External(trimmed.to_string()));
        };

        let modifier = if tail.is_empty() {
            0
        } else {
            let compact: String = tail.chars().filter(|c| !c.is_whitespace()).collect();
            compact
                .parse::<i32>()
                .map_err(|_| DamageParseError::InvalidModifier(trimmed.to_string()))?
        };

        Ok(DamageValue::AttributeLinked {
            attribute,
            modifier,
        })
    }

    pub fn is_external(&self) -> bool {
        matches!(self, DamageValue::External(_))
    }

    /// Base points before bonus and margin, `None` for external damage.
    pub fn base_points(&self, character: &(impl CharacterOracle + ?Sized)) -> Option<u32> {
        match self {
            DamageValue::Fixed(points) => Some(*points),
            DamageValue::AttributeLinked {
                attribute,
                modifier,
            } => {
                let value = i64::from(character.attribute(*attribute)) + i64::from(*modifier);
                Some(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
            }
            DamageValue::External(_) => None,
        }
    }
}

impl FromStr for DamageValue {
    type Err = DamageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DamageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageValue::Fixed(points) => write!(f, "{points}"),
            DamageValue::AttributeLinked {
                attribute,
                modifier,
            } => match modifier {
                0 => f.write_str(attribute.code()),
                m if *m > 0 => write!(f, "{}+{m}", attribute.code()),
                m => write!(f, "{}{m}", attribute.code()),
            },
            DamageValue::External(tag) => f.write_str(tag),
        }
    }
}

/// Damage dealt by a winning action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageAmount {
    Points(u32),
    /// Not applied to the wound track. The margin is kept for whoever
    /// handles the effect.
    External { tag: String, margin: u32 },
}

impl DamageAmount {
    pub const fn points(&self) -> Option<u32> {
        match self {
            DamageAmount::Points(points) => Some(*points),
            DamageAmount::External { .. } => None,
        }
    }
}

impl fmt::Display for DamageAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageAmount::Points(points) => write!(f, "{points}"),
            DamageAmount::External { tag, margin } => write!(f, "{tag} (+{margin})"),
        }
    }
}

/// Evaluates a damage expression for `character`:
/// `base + bonus + margin`, or the external tag with the margin.
pub fn evaluate_damage(
    value: &DamageValue,
    character: &(impl CharacterOracle + ?Sized),
    bonus: u32,
    margin: u32,
) -> DamageAmount {
    if let DamageValue::External(tag) = value {
        return DamageAmount::External {
            tag: tag.clone(),
            margin,
        };
    }

    let base = value.base_points(character).unwrap_or(0);
    DamageAmount::Points(base.saturating_add(bonus).saturating_add(margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterRecord;

    fn brute(strength: u32) -> CharacterRecord {
        CharacterRecord::builder("brute", "Brute")
            .attribute(Attribute::Strength, strength)
            .build()
    }

    #[test]
    fn parses_legacy_strings() {
        assert_eq!(DamageValue::parse("4"), Ok(DamageValue::Fixed(4)));
        assert_eq!(DamageValue::parse("STR"), Ok(DamageValue::strength(0)));
        assert_eq!(DamageValue::parse("str+2"), Ok(DamageValue::strength(2)));
        assert_eq!(DamageValue::parse(" STR - 1 "), Ok(DamageValue::strength(-1)));
        assert_eq!(
            DamageValue::parse("AGI+1"),
            Ok(DamageValue::AttributeLinked {
                attribute: Attribute::Agility,
                modifier: 1
            })
        );
        assert_eq!("toxin".parse::<DamageValue>(), Ok(DamageValue::external("toxin")));
    }

    #[test]
    fn rejects_empty_and_bad_modifiers() {
        assert_eq!(DamageValue::parse("  "), Err(DamageParseError::Empty));
        assert!(matches!(
            DamageValue::parse("STR+x"),
            Err(DamageParseError::InvalidModifier(_))
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["3", "STR", "STR+2", "WIL-1", "toxin"] {
            let value = DamageValue::parse(text).unwrap();
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn strength_linked_damage_uses_current_strength() {
        // STR+2 with a +1 bonus at strength 4.
        let amount = evaluate_damage(&DamageValue::strength(2), &brute(4), 1, 0);
        assert_eq!(amount, DamageAmount::Points(7));

        let amount = evaluate_damage(&DamageValue::strength(2), &brute(4), 1, 3);
        assert_eq!(amount.points(), Some(10));
    }

    #[test]
    fn negative_modifiers_floor_at_zero() {
        let amount = evaluate_damage(&DamageValue::strength(-5), &brute(2), 0, 1);
        assert_eq!(amount, DamageAmount::Points(1));
    }

    #[test]
    fn external_damage_keeps_tag_and_margin() {
        let amount = evaluate_damage(&DamageValue::external("toxin"), &brute(4), 2, 3);
        assert_eq!(
            amount,
            DamageAmount::External {
                tag: "toxin".into(),
                margin: 3
            }
        );
        assert_eq!(amount.points(), None);
    }
}
