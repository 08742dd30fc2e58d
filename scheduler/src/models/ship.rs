//! Ship model
//!
//! One record per ship per direction: a ship that both arrives and departs
//! appears twice in the registry, once `Incoming` and once `Outgoing`.
//!
//! Status is a strict three-state machine:
//!
//! ```text
//! Waiting -> Docked { dock_id } -> Serviced
//! ```
//!
//! The assigned dock lives inside the `Docked` variant, so "a ship has a dock
//! if and only if it is docked" holds by construction.

use crate::protocol::ShipRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Travel direction of a ship record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Arriving at the port to unload cargo
    Incoming,
    /// Leaving the port after loading cargo
    Outgoing,
}

/// Lifecycle status of a ship.
///
/// Progresses strictly forward; `Serviced` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipStatus {
    /// Waiting for a dock assignment
    Waiting,

    /// Occupying a dock
    Docked {
        /// Dock this ship currently occupies
        dock_id: usize,
    },

    /// Fully serviced and released (terminal)
    Serviced,
}

/// Errors that can occur during ship state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShipError {
    #[error("ship {ship_id} is not waiting and cannot be docked")]
    NotWaiting { ship_id: u32 },

    #[error("ship {ship_id} is not docked and cannot be released")]
    NotDocked { ship_id: u32 },

    #[error("ship {ship_id} has no remaining cargo to move")]
    CargoAlreadyComplete { ship_id: u32 },
}

/// A single ship service request being tracked by the scheduler.
///
/// # Invariants
///
/// * `cargo_processed <= cargo.len()`
/// * status only ever moves `Waiting -> Docked -> Serviced`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Ship identity (assigned by the external collaborator)
    id: u32,

    /// Incoming or outgoing leg
    direction: Direction,

    /// Compatibility class; the ship may dock where dock category >= this
    category: u32,

    /// Emergency ships skip the waiting-time rule and dock with priority
    emergency: bool,

    /// Timesteps a regular incoming ship will wait before leaving and
    /// re-presenting later
    waiting_time: usize,

    /// Timestep of the (latest) arrival request
    arrival_timestep: usize,

    /// Ordered cargo weights
    cargo: Vec<u32>,

    /// Number of cargo items already transferred
    cargo_processed: usize,

    /// Current status
    status: ShipStatus,
}

impl Ship {
    /// Build a ship from an inbound request record.
    pub fn from_request(request: &ShipRequest) -> Self {
        Self {
            id: request.ship_id,
            direction: request.direction,
            category: request.category,
            emergency: request.emergency,
            waiting_time: request.waiting_time,
            arrival_timestep: request.timestep,
            cargo: request.cargo.clone(),
            cargo_processed: 0,
            status: ShipStatus::Waiting,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn waiting_time(&self) -> usize {
        self.waiting_time
    }

    pub fn arrival_timestep(&self) -> usize {
        self.arrival_timestep
    }

    pub fn cargo(&self) -> &[u32] {
        &self.cargo
    }

    pub fn cargo_processed(&self) -> usize {
        self.cargo_processed
    }

    pub fn status(&self) -> ShipStatus {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        self.status == ShipStatus::Waiting
    }

    pub fn is_docked(&self) -> bool {
        matches!(self.status, ShipStatus::Docked { .. })
    }

    pub fn is_serviced(&self) -> bool {
        self.status == ShipStatus::Serviced
    }

    /// Dock currently occupied, if any.
    pub fn dock_id(&self) -> Option<usize> {
        match self.status {
            ShipStatus::Docked { dock_id } => Some(dock_id),
            _ => None,
        }
    }

    /// True when every cargo item has been transferred.
    pub fn all_cargo_moved(&self) -> bool {
        self.cargo_processed == self.cargo.len()
    }

    /// Whether a regular incoming ship is still inside its waiting window.
    ///
    /// Outgoing and emergency ships are exempt from the waiting-time rule.
    pub fn within_waiting_window(&self, current_timestep: usize) -> bool {
        if self.direction == Direction::Outgoing || self.emergency {
            return true;
        }
        current_timestep <= self.arrival_timestep + self.waiting_time
    }

    /// Remaining time budget: `(arrival + waiting_time) - current`.
    ///
    /// Negative once the window has been missed.
    pub fn remaining_window(&self, current_timestep: usize) -> i64 {
        (self.arrival_timestep + self.waiting_time) as i64 - current_timestep as i64
    }

    /// Refresh the arrival timestep after a missed window re-presentation.
    ///
    /// Only meaningful for `Waiting` ships; the registry enforces that.
    pub fn refresh_arrival(&mut self, timestep: usize) {
        self.arrival_timestep = timestep;
    }

    /// Transition `Waiting -> Docked`.
    pub fn dock(&mut self, dock_id: usize) -> Result<(), ShipError> {
        match self.status {
            ShipStatus::Waiting => {
                self.status = ShipStatus::Docked { dock_id };
                Ok(())
            }
            _ => Err(ShipError::NotWaiting { ship_id: self.id }),
        }
    }

    /// Transition `Docked -> Serviced`, returning the dock that was held.
    pub fn release(&mut self) -> Result<usize, ShipError> {
        match self.status {
            ShipStatus::Docked { dock_id } => {
                self.status = ShipStatus::Serviced;
                Ok(dock_id)
            }
            _ => Err(ShipError::NotDocked { ship_id: self.id }),
        }
    }

    /// Record one transferred cargo item.
    pub fn record_cargo_moved(&mut self) -> Result<(), ShipError> {
        if self.cargo_processed >= self.cargo.len() {
            return Err(ShipError::CargoAlreadyComplete { ship_id: self.id });
        }
        self.cargo_processed += 1;
        Ok(())
    }
}
