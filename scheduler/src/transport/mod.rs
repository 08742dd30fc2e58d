//! Transport abstraction
//!
//! The scheduler never touches shared memory or message queues directly; it
//! talks to its collaborators through two trait seams. Production transports
//! implement these over whatever IPC the deployment uses; `mem` provides
//! in-memory implementations for tests and scenario replay.
//!
//! Failure semantics differ by peer: a validation-channel failure is fatal to
//! the run (the orchestration loop cannot progress without it), while solver
//! channel failures are local to a single candidate guess.

use crate::protocol::{AdvanceEvent, ShipRequest, SolverRequest, SolverVerdict, ValidationMessage};
use thiserror::Error;

pub mod mem;

pub use mem::{OracleSolverChannel, ScriptedValidationChannel};

/// Errors raised by a transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("channel closed")]
    Closed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Channel to the validation collaborator.
///
/// Covers the request/response queue and the two shared buffers: the inbound
/// request batch and the per-dock authorization code output slots.
pub trait ValidationChannel {
    /// Block until the next timestep-advance event.
    fn recv_advance(&mut self) -> Result<AdvanceEvent, TransportError>;

    /// Consume up to `count` records from the inbound request buffer.
    fn take_requests(&mut self, count: usize) -> Result<Vec<ShipRequest>, TransportError>;

    /// Send one notification.
    fn send(&mut self, message: ValidationMessage) -> Result<(), TransportError>;

    /// Write a recovered authorization code to the dock's output slot.
    ///
    /// Happens after winning the search and before the undock notification;
    /// the collaborator reads the slot only after seeing that notification.
    fn publish_auth_code(&mut self, dock_id: usize, code: &str) -> Result<(), TransportError>;
}

/// Channel to one solver collaborator.
///
/// Each search worker owns exactly one of these for the duration of a search,
/// so implementations must be `Send` but never need to be `Sync`.
pub trait SolverChannel: Send {
    /// Send a target-dock announcement or a guess.
    fn send(&mut self, request: SolverRequest) -> Result<(), TransportError>;

    /// Block for the verdict on the last guess.
    fn recv_verdict(&mut self) -> Result<SolverVerdict, TransportError>;
}
