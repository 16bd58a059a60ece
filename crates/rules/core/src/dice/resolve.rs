//! Dice resolution.
//!
//! # Random path
//!
//! ```text
//! normal dice = pool - risk dice        risk dice = risk dice
//! success     = face meets the roll mode floor
//! normal die  : success counts 1
//! risk die    : face 1 is a critical failure, success counts 2
//! remaining   = max(0, critical failures - risk reduction)
//! complication: 0 none, 1 minor, 2 critical, 3+ disaster
//! ```
//!
//! Normal dice are drawn before risk dice.
//!
//! # Threshold path
//!
//! Secondary characters skip the dice and succeed a fixed number of times
//! with no complication.

use crate::config::RulesConfig;

use super::mode::RollMode;
use super::roller::DiceRoller;

/// Severity of uncancelled critical failures.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Complication {
    #[default]
    None,
    Minor,
    Critical,
    Disaster,
}

impl Complication {
    pub const fn from_remaining(remaining: u32) -> Self {
        match remaining {
            0 => Complication::None,
            1 => Complication::Minor,
            2 => Complication::Critical,
            _ => Complication::Disaster,
        }
    }
}

/// Parameters of one roll, clamped on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollRequest {
    pub pool: u32,
    pub risk_dice: u32,
    pub mode: RollMode,
    pub risk_reduction: u32,
}

impl RollRequest {
    /// Risk dice are clamped to the pool and risk reduction to the cap.
    pub fn new(pool: u32, risk_dice: u32, mode: RollMode, risk_reduction: u32) -> Self {
        Self {
            pool,
            risk_dice: risk_dice.min(pool),
            mode,
            risk_reduction: risk_reduction.min(RulesConfig::RISK_REDUCTION_CAP),
        }
    }

    /// Re-applies the clamps of [`new`](Self::new) to a request built
    /// field by field.
    pub fn clamped(&self) -> Self {
        Self::new(self.pool, self.risk_dice, self.mode, self.risk_reduction)
    }

    pub const fn normal_dice(&self) -> u32 {
        self.pool.saturating_sub(self.risk_dice)
    }
}

/// Where a result's successes came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionSource {
    #[default]
    Rolled,
    Threshold,
}

/// Outcome of a roll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionResult {
    pub normal_successes: u32,
    /// Successes contributed by risk dice, already doubled.
    pub risk_successes: u32,
    pub total_successes: u32,
    /// Risk dice showing 1.
    pub critical_failures: u32,
    /// Critical failures left after risk reduction.
    pub remaining_failures: u32,
    pub complication: Complication,
    pub normal_faces: Vec<u8>,
    pub risk_faces: Vec<u8>,
    pub source: ResolutionSource,
}

impl ResolutionResult {
    /// Fixed-threshold result: `successes` successes, no complication.
    pub fn threshold(successes: u32) -> Self {
        Self {
            normal_successes: successes,
            total_successes: successes,
            source: ResolutionSource::Threshold,
            ..Self::default()
        }
    }

    pub fn is_threshold(&self) -> bool {
        self.source == ResolutionSource::Threshold
    }
}

/// Rolls a request.
pub fn resolve(request: &RollRequest, roller: &mut (impl DiceRoller + ?Sized)) -> ResolutionResult {
    let request = request.clamped();
    let mode = request.mode;
    let normal_faces = roller.roll_many(request.normal_dice());
    let risk_faces = roller.roll_many(request.risk_dice);

    let normal_successes = normal_faces.iter().filter(|f| mode.is_success(**f)).count() as u32;

    let mut risk_successes = 0;
    let mut critical_failures: u32 = 0;
    for face in &risk_faces {
        if *face == 1 {
            critical_failures += 1;
        } else if mode.is_success(*face) {
            risk_successes += 2;
        }
    }

    let remaining_failures = critical_failures.saturating_sub(request.risk_reduction);

    ResolutionResult {
        normal_successes,
        risk_successes,
        total_successes: normal_successes + risk_successes,
        critical_failures,
        remaining_failures,
        complication: Complication::from_remaining(remaining_failures),
        normal_faces,
        risk_faces,
        source: ResolutionSource::Rolled,
    }
}

/// Expected successes of a roll, rounded half up.
///
/// Used as the fixed threshold of characters that do not roll.
pub fn equivalent_threshold(pool: u32, risk_dice: u32, mode: RollMode) -> u32 {
    let risk_dice = risk_dice.min(pool);
    let weighted = (pool - risk_dice) + 2 * risk_dice;
    let sides = u32::from(RulesConfig::DIE_SIDES);
    (weighted * mode.success_faces() * 2 + sides) / (2 * sides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{PcgRoller, ScriptedRoller};

    #[test]
    fn normal_dice_are_drawn_before_risk_dice() {
        let request = RollRequest::new(6, 2, RollMode::Normal, 0);
        let mut roller = ScriptedRoller::new([5, 6, 6, 1, 2, 3]);
        let result = resolve(&request, &mut roller);

        assert_eq!(result.normal_faces, vec![5, 6, 6, 1]);
        assert_eq!(result.risk_faces, vec![2, 3]);
        assert_eq!(result.normal_successes, 3);
        assert_eq!(result.risk_successes, 0);
        assert_eq!(result.total_successes, 3);
        assert_eq!(result.critical_failures, 0);
        assert_eq!(result.complication, Complication::None);
    }

    #[test]
    fn risk_dice_double_successes_and_crit_on_one() {
        let request = RollRequest::new(4, 3, RollMode::Normal, 0);
        let mut roller = ScriptedRoller::new([6, 5, 1, 1]);
        let result = resolve(&request, &mut roller);

        assert_eq!(result.normal_successes, 1);
        assert_eq!(result.risk_successes, 2);
        assert_eq!(result.total_successes, 3);
        assert_eq!(result.critical_failures, 2);
        assert_eq!(result.complication, Complication::Critical);
    }

    #[test]
    fn a_one_never_succeeds_even_with_advantage() {
        let request = RollRequest::new(2, 2, RollMode::Advantage, 0);
        let result = resolve(&request, &mut ScriptedRoller::new([1, 4]));
        assert_eq!(result.risk_successes, 2);
        assert_eq!(result.critical_failures, 1);
    }

    #[test]
    fn risk_reduction_cancels_critical_failures() {
        let request = RollRequest::new(5, 5, RollMode::Normal, 2);
        let result = resolve(&request, &mut ScriptedRoller::new([1, 1, 1, 1, 6]));
        assert_eq!(result.critical_failures, 4);
        assert_eq!(result.remaining_failures, 2);
        assert_eq!(result.complication, Complication::Critical);
    }

    #[test]
    fn request_clamps_risk_dice_and_reduction() {
        let request = RollRequest::new(3, 7, RollMode::Normal, 9);
        assert_eq!(request.risk_dice, 3);
        assert_eq!(request.normal_dice(), 0);
        assert_eq!(request.risk_reduction, RulesConfig::RISK_REDUCTION_CAP);
    }

    #[test]
    fn resolve_clamps_requests_built_by_hand() {
        let request = RollRequest {
            pool: 2,
            risk_dice: 5,
            mode: RollMode::Normal,
            risk_reduction: 8,
        };
        assert_eq!(request.normal_dice(), 0);

        let result = resolve(&request, &mut ScriptedRoller::new([1, 1, 6, 6, 6]));
        assert!(result.normal_faces.is_empty());
        assert_eq!(result.risk_faces, vec![1, 1]);
        assert_eq!(result.critical_failures, 2);
        assert_eq!(result.remaining_failures, 0);
        assert_eq!(result.complication, Complication::None);
    }

    #[test]
    fn dice_counts_match_request_for_every_split() {
        let mut roller = PcgRoller::new(7);
        for pool in 0..8 {
            for risk in 0..=pool {
                let request = RollRequest::new(pool, risk, RollMode::Normal, 0);
                let result = resolve(&request, &mut roller);
                assert_eq!(result.risk_faces.len() as u32, risk);
                assert_eq!(result.normal_faces.len() as u32, pool - risk);
                assert!(result.remaining_failures <= result.critical_failures);
            }
        }
    }

    #[test]
    fn complication_scale() {
        assert_eq!(Complication::from_remaining(0), Complication::None);
        assert_eq!(Complication::from_remaining(1), Complication::Minor);
        assert_eq!(Complication::from_remaining(2), Complication::Critical);
        assert_eq!(Complication::from_remaining(3), Complication::Disaster);
        assert_eq!(Complication::from_remaining(12), Complication::Disaster);
    }

    #[test]
    fn empty_pool_rolls_nothing() {
        let mut roller = ScriptedRoller::new([6]);
        let result = resolve(&RollRequest::new(0, 0, RollMode::Advantage, 0), &mut roller);
        assert_eq!(result.total_successes, 0);
        assert_eq!(roller.drawn(), 0);
    }

    #[test]
    fn threshold_results_carry_no_complication() {
        let result = ResolutionResult::threshold(4);
        assert!(result.is_threshold());
        assert_eq!(result.total_successes, 4);
        assert_eq!(result.complication, Complication::None);
    }

    #[test]
    fn equivalent_threshold_rounds_expected_successes() {
        // 6 dice, normal: 6 * 2/6 = 2
        assert_eq!(equivalent_threshold(6, 0, RollMode::Normal), 2);
        // 6 dice with 2 risk: 8 * 2/6 = 2.67
        assert_eq!(equivalent_threshold(6, 2, RollMode::Normal), 3);
        // 5 dice, advantage: 2.5 rounds up
        assert_eq!(equivalent_threshold(5, 0, RollMode::Advantage), 3);
        // 4 dice, disadvantage: 0.67
        assert_eq!(equivalent_threshold(4, 0, RollMode::Disadvantage), 1);
        assert_eq!(equivalent_threshold(0, 0, RollMode::Normal), 0);
    }
}
