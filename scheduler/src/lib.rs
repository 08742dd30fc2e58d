//! Port Scheduler Core - Rust Engine
//!
//! Discrete-timestep port scheduling brain: ship admission, priority
//! ordering, dock allocation, crane cargo transfer, and concurrent
//! authorization-code recovery.
//!
//! # Architecture
//!
//! - **core**: Capacity limits and protocol constants
//! - **models**: Domain types (Ship, Dock, ShipRegistry, EventLog)
//! - **policy**: Scheduling decisions (priority order, dock fit, crane fit)
//! - **auth**: Authorization-code candidate space and concurrent search
//! - **transport**: Channel seams to the validation and solver collaborators
//! - **orchestrator**: Main timestep loop
//!
//! # Critical Invariants
//!
//! 1. A dock holds at most one ship; a waiting ship holds no dock
//! 2. The registry is re-sorted exactly once per timestep, before allocation
//! 3. Cargo never moves the timestep a ship docks, and undocking never
//!    happens the timestep the transfer completes
//! 4. The authorization search publishes the code before the undock
//!    notification

// Module declarations
pub mod auth;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use crate::auth::{AuthError, CandidateSpace};
pub use crate::core::limits::Limits;
pub use crate::models::{
    dock::{Dock, DockError, Occupant},
    event::{Event, EventLog},
    registry::{MergeOutcome, RegistryError, ShipRegistry},
    ship::{Direction, Ship, ShipError, ShipStatus},
};
pub use crate::orchestrator::{
    DockConfig, Orchestrator, OrchestratorConfig, Phase, RunSummary, SchedulerError,
};
pub use crate::protocol::{
    AdvanceEvent, ShipRequest, SolverRequest, SolverVerdict, ValidationMessage,
};
pub use crate::transport::{SolverChannel, TransportError, ValidationChannel};
