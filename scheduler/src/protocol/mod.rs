//! Wire messages exchanged with the external collaborators.
//!
//! Two peers exist: the validation process (timestep advances in, scheduling
//! notifications out) and the solver processes (authorization guesses out,
//! verdicts in). Message shapes are serde types so any transport that moves
//! bytes can carry them; the transport itself is abstracted behind the traits
//! in [`crate::transport`].

use crate::models::ship::Direction;
use serde::{Deserialize, Serialize};

/// Timestep-advance event from the validation collaborator.
///
/// Starts one timestep of processing, or ends the run when `is_finished` is
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceEvent {
    pub timestep: usize,
    /// Number of records waiting in the inbound request buffer
    pub num_new_requests: usize,
    pub is_finished: bool,
}

/// One record from the inbound request buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRequest {
    pub ship_id: u32,
    /// Timestep the request was (re-)presented
    pub timestep: usize,
    pub category: u32,
    pub direction: Direction,
    pub emergency: bool,
    pub waiting_time: usize,
    pub cargo: Vec<u32>,
}

/// Notification sent to the validation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationMessage {
    /// Ship occupies a dock
    DockAssigned {
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    },

    /// One cargo item transferred
    CargoMoved {
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
        cargo_index: usize,
        crane_index: usize,
    },

    /// Dock released, ship serviced
    Undocked {
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    },

    /// End of this timestep's processing
    TimestepDone,
}

/// Request sent to a solver collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolverRequest {
    /// Announce which dock's code the following guesses are for
    TargetDock { dock_id: usize },

    /// Propose one authorization code candidate
    Guess { candidate: String },
}

/// A solver's grading of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverVerdict {
    Correct,
    Incorrect,
    /// This solver channel is exhausted; no further guesses will be graded
    Abort,
}
