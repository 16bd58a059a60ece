//! Runtime orchestration for the dice-pool rules.
//!
//! This crate wires the pure rules in `rules-core` to character storage, a
//! shared dice roller and an asynchronous result sink. Consumers embed
//! [`RulesRuntime`] to plan rolls, finalize them, run attack exchanges and
//! keep wound tracks in sync with the repository.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the coordinator and builder
//! - [`api`] exposes the error type and the result sink contract
//! - [`events`] provides a topic-based bus that doubles as a result sink
//! - [`repository`] stores characters and applies host patches
//! - [`config`], [`dice`] and [`telemetry`] cover the ambient setup
pub mod api;
pub mod config;
pub mod dice;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod telemetry;

pub use api::{MemorySink, Result, ResultSink, RuntimeError, SinkError, SinkRecord};
pub use config::{ConfigError, RuntimeConfig};
pub use dice::RandRoller;
pub use events::{Event, EventBus, Topic};
pub use repository::{
    CharacterRepository, InMemoryCharacterRepo, PatchError, RecordPatch, RepositoryError,
};
pub use runtime::{CounterPlan, RulesRuntime, RuntimeBuilder};
pub use telemetry::init_tracing;
