use crate::character::{CharacterId, RangeBand};
use crate::error::{ErrorSeverity, RulesError};

use super::damage::DamageParseError;
use super::exchange::ExchangeStage;

/// Which side of an exchange a participant plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeRole {
    Attacker,
    Defender,
}

/// Errors that reject a combat step before any dice are rolled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("{character} carries no item named `{item}`")]
    UnknownItem { character: CharacterId, item: String },

    #[error("`{item}` cannot be used at {band} range")]
    RangeNotUsable { item: String, band: RangeBand },

    #[error("`{item}` cannot be used for a counter-attack")]
    NotMeleeCapable { item: String },

    #[error("exchange has no {0}")]
    MissingParticipant(ExchangeRole),

    #[error("{actual} is not the {role} of this exchange")]
    WrongParticipant {
        role: ExchangeRole,
        actual: CharacterId,
    },

    #[error("cannot {step} while the exchange is {stage}")]
    UnexpectedStep {
        step: &'static str,
        stage: ExchangeStage,
    },

    #[error(transparent)]
    InvalidDamage(#[from] DamageParseError),
}

impl RulesError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            UnknownItem { .. } | MissingParticipant(_) | WrongParticipant { .. } => {
                ErrorSeverity::Validation
            }
            RangeNotUsable { .. } | NotMeleeCapable { .. } | UnexpectedStep { .. } => {
                ErrorSeverity::Recoverable
            }
            InvalidDamage(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            UnknownItem { .. } => "COMBAT_UNKNOWN_ITEM",
            RangeNotUsable { .. } => "COMBAT_RANGE_NOT_USABLE",
            NotMeleeCapable { .. } => "COMBAT_NOT_MELEE_CAPABLE",
            MissingParticipant(_) => "COMBAT_MISSING_PARTICIPANT",
            WrongParticipant { .. } => "COMBAT_WRONG_PARTICIPANT",
            UnexpectedStep { .. } => "COMBAT_UNEXPECTED_STEP",
            InvalidDamage(_) => "COMBAT_INVALID_DAMAGE",
        }
    }
}
