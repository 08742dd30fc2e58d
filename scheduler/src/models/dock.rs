//! Dock model
//!
//! Docks are static for a run: identity, category, and crane capacities are
//! fixed at startup. A dock of category `c` carries exactly `c` cranes.
//!
//! Occupancy is an `Option<Occupant>`, so "occupied if and only if an occupant
//! is recorded" cannot be violated. The per-timestep crane bitset is reset at
//! the start of every cargo pass.

use crate::models::ship::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during dock occupancy transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DockError {
    #[error("dock {dock_id} is already occupied")]
    AlreadyOccupied { dock_id: usize },

    #[error("dock {dock_id} is not occupied")]
    NotOccupied { dock_id: usize },
}

/// The ship currently holding a dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub ship_id: u32,
    pub direction: Direction,
    /// Timestep the ship docked; cargo may move from the next timestep on
    pub docked_timestep: usize,
}

/// A single dock with its crane pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dock {
    id: usize,
    category: u32,

    /// Crane lifting capacities, indexed by crane id. `len == category`.
    crane_capacities: Vec<u32>,

    occupant: Option<Occupant>,

    /// Timestep the last cargo item for the current occupant was moved
    last_cargo_moved_timestep: Option<usize>,

    /// Set once the occupant's cargo is fully transferred
    cargo_fully_moved: bool,

    /// Per-timestep crane usage; reset before every cargo pass
    crane_used: Vec<bool>,
}

impl Dock {
    /// Create a dock.
    ///
    /// # Panics
    ///
    /// Panics if the number of cranes does not equal the category.
    pub fn new(id: usize, category: u32, crane_capacities: Vec<u32>) -> Self {
        assert_eq!(
            crane_capacities.len(),
            category as usize,
            "dock category must equal its crane count"
        );
        let num_cranes = crane_capacities.len();
        Self {
            id,
            category,
            crane_capacities,
            occupant: None,
            last_cargo_moved_timestep: None,
            cargo_fully_moved: false,
            crane_used: vec![false; num_cranes],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn crane_capacities(&self) -> &[u32] {
        &self.crane_capacities
    }

    pub fn num_cranes(&self) -> usize {
        self.crane_capacities.len()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        self.occupant.as_ref()
    }

    pub fn cargo_fully_moved(&self) -> bool {
        self.cargo_fully_moved
    }

    pub fn last_cargo_moved_timestep(&self) -> Option<usize> {
        self.last_cargo_moved_timestep
    }

    /// Timesteps the completed transfer took: `completion - docking`.
    ///
    /// `None` until the dock is occupied and cargo transfer has completed.
    /// This is the derived authorization code length.
    pub fn transfer_duration(&self) -> Option<i64> {
        let occupant = self.occupant.as_ref()?;
        let completed = self.last_cargo_moved_timestep?;
        Some(completed as i64 - occupant.docked_timestep as i64)
    }

    /// Give the dock to a ship.
    ///
    /// Clears the crane bitset and all transfer bookkeeping from the previous
    /// occupant.
    pub fn occupy(
        &mut self,
        ship_id: u32,
        direction: Direction,
        timestep: usize,
    ) -> Result<(), DockError> {
        if self.occupant.is_some() {
            return Err(DockError::AlreadyOccupied { dock_id: self.id });
        }
        self.occupant = Some(Occupant {
            ship_id,
            direction,
            docked_timestep: timestep,
        });
        self.cargo_fully_moved = false;
        self.last_cargo_moved_timestep = None;
        self.reset_cranes();
        Ok(())
    }

    /// Free the dock, returning the departing occupant.
    pub fn release(&mut self) -> Result<Occupant, DockError> {
        let occupant = self
            .occupant
            .take()
            .ok_or(DockError::NotOccupied { dock_id: self.id })?;
        self.cargo_fully_moved = false;
        self.last_cargo_moved_timestep = None;
        self.reset_cranes();
        Ok(occupant)
    }

    /// Mark all cranes unused for a fresh cargo pass.
    pub fn reset_cranes(&mut self) {
        self.crane_used.fill(false);
    }

    pub fn crane_is_used(&self, crane_index: usize) -> bool {
        self.crane_used[crane_index]
    }

    pub fn mark_crane_used(&mut self, crane_index: usize) {
        self.crane_used[crane_index] = true;
    }

    /// Record that the occupant's cargo finished transferring this timestep.
    pub fn mark_cargo_fully_moved(&mut self, timestep: usize) {
        self.cargo_fully_moved = true;
        self.last_cargo_moved_timestep = Some(timestep);
    }
}
