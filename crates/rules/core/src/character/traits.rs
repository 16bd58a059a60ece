//! Character traits and the bonus entries they carry.

/// What a trait bonus modifies.
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
pub enum BonusKind {
    /// Risk reduction on rolls using the named skill.
    SkillRiskReduction,
    /// Risk reduction on rolls using the named specialization.
    SpecializationRiskReduction,
    /// Risk reduction on rolls linked to the named attribute.
    AttributeRiskReduction,
    /// Extra light wound boxes.
    LightWoundBoxes,
    /// Extra severe wound boxes.
    SevereWoundBoxes,
    /// Raises the light wound threshold.
    LightThreshold,
    /// Raises the moderate wound threshold.
    ModerateThreshold,
    /// Raises the severe wound threshold.
    SevereThreshold,
    /// Adds to the character's armor.
    Armor,
}

impl BonusKind {
    /// True for the three kinds collected by the risk-reduction aggregator.
    pub const fn is_risk_reduction(self) -> bool {
        matches!(
            self,
            BonusKind::SkillRiskReduction
                | BonusKind::SpecializationRiskReduction
                | BonusKind::AttributeRiskReduction
        )
    }
}

/// One entry of a trait's bonus list.
///
/// `target` names the skill, specialization or attribute the bonus applies
/// to; kinds that apply to the whole character leave it empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitBonus {
    pub kind: BonusKind,
    pub value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: String,
}

impl TraitBonus {
    pub fn new(kind: BonusKind, value: i32, target: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            target: target.into(),
        }
    }

    pub fn skill_rr(target: impl Into<String>, value: i32) -> Self {
        Self::new(BonusKind::SkillRiskReduction, value, target)
    }

    pub fn specialization_rr(target: impl Into<String>, value: i32) -> Self {
        Self::new(BonusKind::SpecializationRiskReduction, value, target)
    }

    pub fn attribute_rr(target: impl Into<String>, value: i32) -> Self {
        Self::new(BonusKind::AttributeRiskReduction, value, target)
    }
}

/// A feat, quality or augmentation on the character.
///
/// Only active traits contribute bonuses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterTrait {
    pub name: String,
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<TraitBonus>,
}

impl CharacterTrait {
    /// Creates an active trait with no bonuses.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            bonuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[must_use]
    pub fn bonus(mut self, bonus: TraitBonus) -> Self {
        self.bonuses.push(bonus);
        self
    }
}
