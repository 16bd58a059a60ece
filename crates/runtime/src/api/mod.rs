//! Public runtime API surface.
//!
//! Re-exports the error type and the result sink contract that hosts
//! implement.
mod errors;
mod sink;

pub use errors::{ConfigError, RepositoryError, Result, RuntimeError};
pub use sink::{MemorySink, ResultSink, SinkError, SinkRecord};
