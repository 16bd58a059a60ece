//! Character query interface.
//!
//! The rules never own character storage. They read a character through
//! [`CharacterOracle`], which exposes attributes, skills, specializations,
//! active traits, carried items and the wound track. [`CharacterRecord`] is
//! the in-crate implementation used by the runtime repository and by tests.
mod items;
mod record;
mod traits;

use core::fmt;

pub use items::{ItemKind, ItemProfile, RangeBand, RangeProfile, RangeSuitability};
pub use record::{AttributeSet, CharacterRecord, CharacterRecordBuilder};
pub use traits::{BonusKind, CharacterTrait, TraitBonus};

use crate::names::{names_match, normalize};
use crate::wounds::WoundTrack;

/// Identifier of a character record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The five attributes every character carries.
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
pub enum Attribute {
    Strength,
    Agility,
    Willpower,
    Logic,
    Charisma,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Strength,
        Attribute::Agility,
        Attribute::Willpower,
        Attribute::Logic,
        Attribute::Charisma,
    ];

    /// Three-letter code used in damage expressions (`STR+2`).
    pub const fn code(self) -> &'static str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Agility => "AGI",
            Attribute::Willpower => "WIL",
            Attribute::Logic => "LOG",
            Attribute::Charisma => "CHA",
        }
    }

    /// Resolves an attribute from its code or full name, ignoring case and
    /// diacritics.
    pub fn lookup(name: &str) -> Option<Self> {
        let key = normalize(name);
        if let Ok(attribute) = key.parse::<Attribute>() {
            return Some(attribute);
        }
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.code().eq_ignore_ascii_case(&key))
    }
}

/// A rated skill and the attribute it rolls with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub rating: u32,
    pub attribute: Attribute,
}

impl Skill {
    pub fn new(name: impl Into<String>, rating: u32, attribute: Attribute) -> Self {
        Self {
            name: name.into(),
            rating,
            attribute,
        }
    }
}

/// A narrower variant of a skill.
///
/// Its effective rating is the parent skill's rating plus
/// [`RulesConfig::SPECIALIZATION_BONUS`](crate::RulesConfig::SPECIALIZATION_BONUS).
/// When `attribute` is `None` the parent skill's attribute is used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specialization {
    pub name: String,
    pub skill: String,
    pub attribute: Option<Attribute>,
}

impl Specialization {
    pub fn new(name: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skill: skill.into(),
            attribute: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = Some(attribute);
        self
    }
}

/// Read access to a character, as consumed by every rules component.
///
/// Implementors provide the raw lists; lookups by name are provided methods
/// that match names through [`normalize`].
pub trait CharacterOracle: Send + Sync {
    fn id(&self) -> &CharacterId;

    fn name(&self) -> &str;

    fn attribute(&self, attribute: Attribute) -> u32;

    fn skills(&self) -> &[Skill];

    fn specializations(&self) -> &[Specialization];

    /// All traits, active or not.
    fn traits(&self) -> &[CharacterTrait];

    /// Weapons and spells the character can act with.
    fn items(&self) -> &[ItemProfile];

    fn wounds(&self) -> &WoundTrack;

    /// Armor rating before trait bonuses.
    fn armor(&self) -> u32;

    fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills()
            .iter()
            .find(|skill| names_match(&skill.name, name))
    }

    fn specialization(&self, name: &str) -> Option<&Specialization> {
        self.specializations()
            .iter()
            .find(|specialization| names_match(&specialization.name, name))
    }

    fn item(&self, name: &str) -> Option<&ItemProfile> {
        self.items().iter().find(|item| names_match(&item.name, name))
    }

    fn active_traits(&self) -> Vec<&CharacterTrait> {
        self.traits().iter().filter(|t| t.active).collect()
    }

    /// Sum of active trait bonuses of the given kind, regardless of target.
    fn bonus_total(&self, kind: BonusKind) -> i32 {
        self.active_traits()
            .into_iter()
            .flat_map(|t| t.bonuses.iter())
            .filter(|bonus| bonus.kind == kind)
            .map(|bonus| bonus.value)
            .sum()
    }

    /// True while any severe box is marked or the character is incapacitated.
    fn has_severe_wound(&self) -> bool {
        self.wounds().has_severe_wound()
    }
}
