use crate::character::RangeSuitability;

/// How generous the success threshold of a roll is.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum RollMode {
    /// 5 or 6 succeeds.
    #[default]
    Normal,
    /// 4, 5 or 6 succeeds.
    Advantage,
    /// Only 6 succeeds.
    Disadvantage,
}

impl RollMode {
    /// Lowest succeeding face.
    pub const fn success_floor(self) -> u8 {
        match self {
            RollMode::Normal => 5,
            RollMode::Advantage => 4,
            RollMode::Disadvantage => 6,
        }
    }

    pub const fn is_success(self, face: u8) -> bool {
        face >= self.success_floor()
    }

    /// Succeeding faces out of six.
    pub const fn success_faces(self) -> u32 {
        7 - self.success_floor() as u32
    }
}

/// Picks the mode a roll is made with.
///
/// A range band marked `Disadvantage` for the item forces disadvantage, and
/// so does an unhealed severe wound on the actor. Otherwise the requested
/// mode stands.
pub fn determine_roll_mode(
    requested: RollMode,
    suitability: Option<RangeSuitability>,
    severe_wound: bool,
) -> RollMode {
    if severe_wound || suitability == Some(RangeSuitability::Disadvantage) {
        return RollMode::Disadvantage;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_faces_per_mode() {
        let succeeding = |mode: RollMode| (1..=6u8).filter(|f| mode.is_success(*f)).count() as u32;
        for mode in [RollMode::Normal, RollMode::Advantage, RollMode::Disadvantage] {
            assert_eq!(succeeding(mode), mode.success_faces());
        }
        assert!(!RollMode::Disadvantage.is_success(5));
        assert!(RollMode::Advantage.is_success(4));
    }

    #[test]
    fn severe_wound_overrides_everything() {
        assert_eq!(
            determine_roll_mode(RollMode::Advantage, Some(RangeSuitability::Ok), true),
            RollMode::Disadvantage
        );
    }

    #[test]
    fn range_disadvantage_overrides_request() {
        assert_eq!(
            determine_roll_mode(RollMode::Advantage, Some(RangeSuitability::Disadvantage), false),
            RollMode::Disadvantage
        );
        assert_eq!(
            determine_roll_mode(RollMode::Advantage, Some(RangeSuitability::Ok), false),
            RollMode::Advantage
        );
        assert_eq!(determine_roll_mode(RollMode::Normal, None, false), RollMode::Normal);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("ADVANTAGE".parse::<RollMode>(), Ok(RollMode::Advantage));
    }
}
