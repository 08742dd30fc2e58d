//! Timestep orchestration.
//!
//! See [`engine`] for the main loop and its phase state machine.

pub mod engine;

pub use engine::{
    DockConfig, Orchestrator, OrchestratorConfig, Phase, RunSummary, SchedulerError,
};
