//! What a finished roll or exchange hands to the result sink.

use crate::character::{CharacterId, RangeBand};
use crate::combat::DamageAmount;
use crate::dice::{ResolutionResult, RollMode};
use crate::pool::PoolBreakdown;
use crate::risk::RrSource;
use crate::wounds::{WoundOutcome, WoundThresholds, WoundTrack, apply_damage};

/// A resolved roll with everything needed to display how it was built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionRecord {
    pub actor: CharacterId,
    pub actor_name: String,
    /// Attribute, skill or specialization label.
    pub action: String,
    pub item: Option<String>,
    pub band: Option<RangeBand>,
    pub pool: PoolBreakdown,
    /// Every gathered source, enabled or not.
    pub risk_sources: Vec<RrSource>,
    /// Applied risk reduction, capped.
    pub risk_reduction: u32,
    pub mode: RollMode,
    pub risk_dice: u32,
    pub result: ResolutionResult,
}

impl ResolutionRecord {
    pub fn successes(&self) -> u32 {
        self.result.total_successes
    }
}

/// Damage inflicted by one side of an exchange on the other.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRecord {
    pub inflicter: CharacterId,
    pub receiver: CharacterId,
    pub amount: DamageAmount,
    /// Success margin included in `amount`.
    pub margin: u32,
    /// Set for counter-attacks only.
    pub winner: Option<CharacterId>,
    /// Filled in once the damage has been applied to the receiver.
    pub wound: Option<WoundOutcome>,
}

impl DamageRecord {
    /// Applies numeric damage to the receiver's track and records the
    /// outcome. External damage leaves the track untouched.
    pub fn apply(
        &mut self,
        track: &mut WoundTrack,
        thresholds: &WoundThresholds,
    ) -> Option<WoundOutcome> {
        let points = self.amount.points()?;
        let outcome = apply_damage(track, points, thresholds);
        self.wound = Some(outcome);
        Some(outcome)
    }
}
