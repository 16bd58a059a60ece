//! `rand`-backed dice roller.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rules_core::DiceRoller;

/// ChaCha8 dice roller.
///
/// Seeded rollers replay the same faces, which is what the runtime uses
/// when the configuration carries a seed.
#[derive(Clone, Debug)]
pub struct RandRoller {
    rng: ChaCha8Rng,
}

impl RandRoller {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl DiceRoller for RandRoller {
    fn roll_d6(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}
