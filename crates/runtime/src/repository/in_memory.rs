//! In-memory CharacterRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use rules_core::{CharacterId, CharacterRecord, WoundTrack};

use super::error::{RepositoryError, Result};
use super::patch::RecordPatch;
use super::traits::CharacterRepository;

/// In-memory implementation of CharacterRepository.
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, CharacterRecord>>,
}

impl InMemoryCharacterRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository holding the given characters.
    pub fn with_characters(records: impl IntoIterator<Item = CharacterRecord>) -> Self {
        let characters = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            characters: RwLock::new(characters),
        }
    }
}

impl Default for InMemoryCharacterRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterRepository for InMemoryCharacterRepo {
    fn load(&self, id: &CharacterId) -> Result<Option<CharacterRecord>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(id).cloned())
    }

    fn save(&self, record: CharacterRecord) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(record.id.clone(), record);
        Ok(())
    }

    fn replace_wounds(&self, id: &CharacterId, wounds: WoundTrack) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let record = characters
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        record.wounds = wounds;
        Ok(())
    }

    fn apply_patch(&self, id: &CharacterId, patch: &RecordPatch) -> Result<CharacterRecord> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let record = characters
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let patched = patch.apply(record).map_err(|source| RepositoryError::Patch {
            id: id.clone(),
            source,
        })?;
        *record = patched.clone();
        Ok(patched)
    }

    fn ids(&self) -> Result<Vec<CharacterId>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<CharacterId> = characters.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{Attribute, WoundCapacity, WoundTier};

    fn repo() -> InMemoryCharacterRepo {
        InMemoryCharacterRepo::with_characters([
            CharacterRecord::builder("b", "Bea")
                .attribute(Attribute::Strength, 2)
                .build(),
            CharacterRecord::builder("a", "Ari").build(),
        ])
    }

    #[test]
    fn load_save_and_list() {
        let repo = repo();
        assert_eq!(repo.ids().unwrap(), vec![CharacterId::new("a"), CharacterId::new("b")]);
        assert!(repo.exists(&CharacterId::new("a")));
        assert!(!repo.exists(&CharacterId::new("z")));

        repo.save(CharacterRecord::builder("z", "Zed").build()).unwrap();
        assert_eq!(repo.load(&CharacterId::new("z")).unwrap().unwrap().name, "Zed");
    }

    #[test]
    fn replace_wounds_overwrites_the_track() {
        let repo = repo();
        let id = CharacterId::new("b");
        let mut track = WoundTrack::with_capacity(WoundCapacity::new(3, 2));
        track.mark_first_open(WoundTier::Severe);

        repo.replace_wounds(&id, track.clone()).unwrap();
        assert_eq!(repo.load(&id).unwrap().unwrap().wounds, track);

        assert!(matches!(
            repo.replace_wounds(&CharacterId::new("z"), track),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn failed_patch_leaves_record_untouched() {
        let repo = repo();
        let id = CharacterId::new("b");
        let bad = RecordPatch::new().set("attributes.strength", "lots");

        assert!(matches!(
            repo.apply_patch(&id, &bad),
            Err(RepositoryError::Patch { .. })
        ));
        assert_eq!(repo.load(&id).unwrap().unwrap().attributes.strength, 2);

        let good = RecordPatch::new().set("attributes.strength", 4);
        assert_eq!(repo.apply_patch(&id, &good).unwrap().attributes.strength, 4);
    }
}
