//! Repository contract for character records.

use rules_core::{CharacterId, CharacterRecord, WoundTrack};

use super::error::Result;
use super::patch::RecordPatch;

/// Storage of the characters the rules read and damage.
///
/// The rules only ever write two things back: a whole wound track after
/// damage, and host-driven field patches. Each write is a single atomic
/// update under the implementation's own lock.
pub trait CharacterRepository: Send + Sync {
    /// Load a character by id
    fn load(&self, id: &CharacterId) -> Result<Option<CharacterRecord>>;

    /// Insert or replace a character
    fn save(&self, record: CharacterRecord) -> Result<()>;

    /// Replace a character's wound track
    fn replace_wounds(&self, id: &CharacterId, wounds: WoundTrack) -> Result<()>;

    /// Apply a field patch and return the updated record
    fn apply_patch(&self, id: &CharacterId, patch: &RecordPatch) -> Result<CharacterRecord>;

    /// Ids of every stored character
    fn ids(&self) -> Result<Vec<CharacterId>>;

    fn exists(&self, id: &CharacterId) -> bool {
        matches!(self.load(id), Ok(Some(_)))
    }
}
