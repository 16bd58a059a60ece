//! Concrete character record implementing [`CharacterOracle`].

use crate::config::RulesConfig;
use crate::wounds::{WoundCapacity, WoundTrack};

use super::items::ItemProfile;
use super::traits::CharacterTrait;
use super::{Attribute, CharacterId, CharacterOracle, Skill, Specialization};

/// Attribute values of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeSet {
    pub strength: u32,
    pub agility: u32,
    pub willpower: u32,
    pub logic: u32,
    pub charisma: u32,
}

impl AttributeSet {
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Willpower => self.willpower,
            Attribute::Logic => self.logic,
            Attribute::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: u32) {
        let slot = match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Agility => &mut self.agility,
            Attribute::Willpower => &mut self.willpower,
            Attribute::Logic => &mut self.logic,
            Attribute::Charisma => &mut self.charisma,
        };
        *slot = value;
    }
}

/// A character as stored by the host application.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: AttributeSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<Skill>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub specializations: Vec<Specialization>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<CharacterTrait>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<ItemProfile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wounds: WoundTrack,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: u32,
}

impl CharacterRecord {
    /// Create a builder for constructing character records.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> CharacterRecordBuilder {
        CharacterRecordBuilder::new(id, name)
    }

    /// Resizes the wound track to the box counts implied by the current
    /// traits.
    pub fn refresh_wound_capacity(&mut self, config: &RulesConfig) {
        let capacity = WoundCapacity::for_character(self, config);
        self.wounds.resize(capacity);
    }
}

impl CharacterOracle for CharacterRecord {
    fn id(&self) -> &CharacterId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, attribute: Attribute) -> u32 {
        self.attributes.get(attribute)
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }

    fn specializations(&self) -> &[Specialization] {
        &self.specializations
    }

    fn traits(&self) -> &[CharacterTrait] {
        &self.traits
    }

    fn items(&self) -> &[ItemProfile] {
        &self.items
    }

    fn wounds(&self) -> &WoundTrack {
        &self.wounds
    }

    fn armor(&self) -> u32 {
        self.armor
    }
}

/// Builder for constructing character records.
///
/// Unless a wound track is supplied explicitly, [`build`](Self::build) sizes
/// an empty track from the default box counts plus trait bonuses.
pub struct CharacterRecordBuilder {
    id: CharacterId,
    name: String,
    attributes: AttributeSet,
    skills: Vec<Skill>,
    specializations: Vec<Specialization>,
    traits: Vec<CharacterTrait>,
    items: Vec<ItemProfile>,
    wounds: Option<WoundTrack>,
    armor: u32,
}

impl CharacterRecordBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            attributes: AttributeSet::default(),
            skills: Vec::new(),
            specializations: Vec::new(),
            traits: Vec::new(),
            items: Vec::new(),
            wounds: None,
            armor: 0,
        }
    }

    /// Set one attribute value
    pub fn attribute(mut self, attribute: Attribute, value: u32) -> Self {
        self.attributes.set(attribute, value);
        self
    }

    /// Set all attribute values
    pub fn attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a rated skill
    pub fn skill(mut self, name: impl Into<String>, rating: u32, attribute: Attribute) -> Self {
        self.skills.push(Skill::new(name, rating, attribute));
        self
    }

    /// Add a specialization
    pub fn specialization(mut self, specialization: Specialization) -> Self {
        self.specializations.push(specialization);
        self
    }

    /// Add a trait
    pub fn with_trait(mut self, character_trait: CharacterTrait) -> Self {
        self.traits.push(character_trait);
        self
    }

    /// Add a weapon or spell
    pub fn item(mut self, item: ItemProfile) -> Self {
        self.items.push(item);
        self
    }

    /// Use an explicit wound track
    pub fn wounds(mut self, wounds: WoundTrack) -> Self {
        self.wounds = Some(wounds);
        self
    }

    /// Set base armor
    pub fn armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    pub fn build(self) -> CharacterRecord {
        let explicit_wounds = self.wounds;
        let mut record = CharacterRecord {
            id: self.id,
            name: self.name,
            attributes: self.attributes,
            skills: self.skills,
            specializations: self.specializations,
            traits: self.traits,
            items: self.items,
            wounds: WoundTrack::default(),
            armor: self.armor,
        };

        match explicit_wounds {
            Some(wounds) => record.wounds = wounds,
            None => record.refresh_wound_capacity(&RulesConfig::default()),
        }
        record
    }
}
