//! Character storage adapters.
//!
//! The rules consume characters through [`CharacterRepository`]; the
//! in-memory implementation backs tests and local sessions.
mod error;
mod in_memory;
mod patch;
mod traits;

pub use error::{RepositoryError, Result};
pub use in_memory::InMemoryCharacterRepo;
pub use patch::{PatchError, RecordPatch};
pub use traits::CharacterRepository;
