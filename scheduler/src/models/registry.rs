//! Ship registry
//!
//! Append-only collection of ship records, keyed by (id, direction). Records
//! are never removed during a run; serviced ships simply sort to the back.
//!
//! Merging an inbound request for a known `(id, direction)` pair that is still
//! `Waiting` refreshes its arrival timestep instead of creating a duplicate
//! (the ship missed its window and is re-presenting). Any other re-appearance
//! is a new service cycle and gets a fresh record.

use crate::models::ship::{Direction, Ship, ShipStatus};
use crate::policy::priority::priority_key;
use crate::protocol::ShipRequest;
use thiserror::Error;

/// Errors that can occur when admitting ships
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("ship registry is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// What `merge_request` did with an inbound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new ship record was appended
    Admitted,
    /// An existing waiting ship had its arrival timestep refreshed
    Refreshed,
}

/// Append-only ship registry with priority ordering.
#[derive(Debug, Clone)]
pub struct ShipRegistry {
    ships: Vec<Ship>,
    capacity: usize,
}

impl ShipRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            ships: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn get(&self, index: usize) -> &Ship {
        &self.ships[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Ship {
        &mut self.ships[index]
    }

    /// First record matching (id, direction).
    pub fn find(&self, ship_id: u32, direction: Direction) -> Option<&Ship> {
        self.ships
            .iter()
            .find(|s| s.id() == ship_id && s.direction() == direction)
    }

    /// Waiting record matching (id, direction), used for arrival refresh.
    pub fn find_waiting_mut(&mut self, ship_id: u32, direction: Direction) -> Option<&mut Ship> {
        self.ships
            .iter_mut()
            .find(|s| s.id() == ship_id && s.direction() == direction && s.is_waiting())
    }

    /// The record docked at `dock_id` matching (id, direction).
    ///
    /// Precise lookup for dock processing: a ship id may have several records
    /// over a run (re-presented cycles), but only one can hold a given dock.
    pub fn find_occupant(
        &self,
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    ) -> Option<&Ship> {
        self.ships.iter().find(|s| {
            s.id() == ship_id
                && s.direction() == direction
                && s.status() == ShipStatus::Docked { dock_id }
        })
    }

    /// Mutable counterpart of [`find_occupant`](Self::find_occupant).
    pub fn find_occupant_mut(
        &mut self,
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    ) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| {
            s.id() == ship_id
                && s.direction() == direction
                && s.status() == ShipStatus::Docked { dock_id }
        })
    }

    /// Merge one inbound request into the registry.
    pub fn merge_request(&mut self, request: &ShipRequest) -> Result<MergeOutcome, RegistryError> {
        if let Some(existing) = self.find_waiting_mut(request.ship_id, request.direction) {
            existing.refresh_arrival(request.timestep);
            return Ok(MergeOutcome::Refreshed);
        }

        if self.ships.len() >= self.capacity {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }
        self.ships.push(Ship::from_request(request));
        Ok(MergeOutcome::Admitted)
    }

    /// Re-sort the registry by scheduling priority for this timestep.
    ///
    /// Called once per timestep, after merging requests and before any
    /// allocation pass.
    pub fn sort_by_priority(&mut self, current_timestep: usize) {
        self.ships
            .sort_by_key(|ship| priority_key(ship, current_timestep));
    }

    pub fn num_serviced(&self) -> usize {
        self.ships.iter().filter(|s| s.is_serviced()).count()
    }

    pub fn num_waiting(&self) -> usize {
        self.ships.iter().filter(|s| s.is_waiting()).count()
    }
}
