//! Dice sources.
//!
//! Resolution never touches a global RNG: every roll draws from a
//! [`DiceRoller`] supplied by the caller. Two rollers live here: a seeded
//! PCG generator for reproducible play and a scripted roller for fixtures.
//! The runtime adds a `rand`-backed one.

use crate::config::RulesConfig;

/// Source of six-sided die faces.
pub trait DiceRoller {
    /// Returns a face in `1..=6`.
    fn roll_d6(&mut self) -> u8;

    /// Rolls `count` dice in order.
    fn roll_many(&mut self, count: u32) -> Vec<u8> {
        (0..count).map(|_| self.roll_d6()).collect()
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll_d6(&mut self) -> u8 {
        (**self).roll_d6()
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll_d6(&mut self) -> u8 {
        (**self).roll_d6()
    }
}

/// PCG-XSH-RR generator with 64-bit state.
///
/// Same seed, same faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcgRoller {
    state: u64,
}

impl PcgRoller {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);

        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl DiceRoller for PcgRoller {
    fn roll_d6(&mut self) -> u8 {
        let sides = u32::from(RulesConfig::DIE_SIDES);
        (self.step() % sides) as u8 + 1
    }
}

/// Replays a fixed list of faces, cycling when exhausted.
///
/// Faces outside `1..=6` are clamped; an empty script always rolls 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedRoller {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedRoller {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces
                .into_iter()
                .map(|face| face.clamp(1, RulesConfig::DIE_SIDES))
                .collect(),
            cursor: 0,
        }
    }

    /// Number of dice drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll_d6(&mut self) -> u8 {
        if self.faces.is_empty() {
            self.cursor += 1;
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}
