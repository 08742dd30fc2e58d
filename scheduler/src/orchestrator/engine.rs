//! Orchestrator Engine
//!
//! Main scheduling loop integrating all components:
//! - Request merging (inbound batch -> ship registry)
//! - Priority ordering (re-sort once per timestep)
//! - Dock allocation (emergency, regular incoming, outgoing passes)
//! - Crane/cargo transfer (best-fit, per occupied dock)
//! - Authorization recovery (concurrent search, undocking)
//! - Event logging (complete run history)
//!
//! # State machine
//!
//! Each timestep runs the fixed phase sequence; transitions are unconditional
//! and no phase is skipped:
//!
//! ```text
//! AwaitingEvent -> Merging -> Sorting -> AllocatingEmergency
//!     -> AllocatingIncoming -> AllocatingOutgoing -> TransferringCargo
//!     -> AdvancingTimestep -> AwaitingEvent
//! ```
//!
//! `Done` is terminal, reached when the advance event carries the finished
//! flag. The loop is single-threaded and fully serialized: the only
//! concurrency lives inside the authorization search, which is joined before
//! the loop continues.

use crate::auth::candidates::{AuthError, CandidateSpace};
use crate::auth::search::run_search;
use crate::core::limits::Limits;
use crate::models::dock::{Dock, DockError, Occupant};
use crate::models::event::{Event, EventLog};
use crate::models::registry::{MergeOutcome, RegistryError, ShipRegistry};
use crate::models::ship::{Direction, ShipError};
use crate::policy::allocation::assign_dock;
use crate::policy::crane::plan_transfers;
use crate::protocol::ValidationMessage;
use crate::transport::{SolverChannel, TransportError, ValidationChannel};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Static description of one dock.
#[derive(Debug, Clone)]
pub struct DockConfig {
    /// Compatibility class; also the number of cranes
    pub category: u32,

    /// Crane lifting capacities; `len` must equal `category`
    pub crane_capacities: Vec<u32>,
}

/// Complete orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Dock table, in dock-id order
    pub docks: Vec<DockConfig>,

    /// Capacity limits (defaults mirror the protocol constants)
    pub limits: Limits,
}

/// Scheduler error types.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("{what} capacity exceeded (limit {limit})")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("ship {ship_id} ({direction:?}) is recorded as a dock occupant but missing from the registry")]
    OccupantMissing { ship_id: u32, direction: Direction },

    #[error("validation channel failure: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Ship(#[from] ShipError),

    #[error(transparent)]
    Dock(#[from] DockError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// One phase of the per-timestep state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingEvent,
    Merging,
    Sorting,
    AllocatingEmergency,
    AllocatingIncoming,
    AllocatingOutgoing,
    TransferringCargo,
    AdvancingTimestep,
    Done,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub timesteps_processed: usize,
    pub ships_serviced: usize,
    pub cargo_moves: usize,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning all scheduling state.
///
/// All ship/dock/registry state is mutated exclusively by this loop; the
/// worker threads of the authorization search only ever see the solver
/// channels and the search's own shared state.
pub struct Orchestrator {
    registry: ShipRegistry,
    docks: Vec<Dock>,
    current_timestep: usize,
    pending_requests: usize,
    phase: Phase,
    limits: Limits,
    validation: Box<dyn ValidationChannel>,
    solvers: Vec<Box<dyn SolverChannel>>,
    event_log: EventLog,
    timesteps_processed: usize,
    cargo_moves: usize,
}

// Manual impl: the boxed channels are not Debug.
impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("phase", &self.phase)
            .field("current_timestep", &self.current_timestep)
            .field("num_ships", &self.registry.len())
            .field("num_docks", &self.docks.len())
            .field("num_solvers", &self.solvers.len())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create a new orchestrator from configuration and channels.
    pub fn new(
        config: OrchestratorConfig,
        validation: Box<dyn ValidationChannel>,
        solvers: Vec<Box<dyn SolverChannel>>,
    ) -> Result<Self, SchedulerError> {
        Self::validate_config(&config, solvers.len())?;

        let docks = config
            .docks
            .iter()
            .enumerate()
            .map(|(id, dc)| Dock::new(id, dc.category, dc.crane_capacities.clone()))
            .collect();

        Ok(Self {
            registry: ShipRegistry::new(config.limits.max_ships),
            docks,
            current_timestep: 0,
            pending_requests: 0,
            phase: Phase::AwaitingEvent,
            limits: config.limits,
            validation,
            solvers,
            event_log: EventLog::new(),
            timesteps_processed: 0,
            cargo_moves: 0,
        })
    }

    fn validate_config(config: &OrchestratorConfig, num_solvers: usize) -> Result<(), SchedulerError> {
        if config.docks.is_empty() {
            return Err(SchedulerError::InvalidConfig(
                "must have at least one dock".to_string(),
            ));
        }
        if config.docks.len() > config.limits.max_docks {
            return Err(SchedulerError::CapacityExceeded {
                what: "dock table",
                limit: config.limits.max_docks,
            });
        }
        for (id, dock) in config.docks.iter().enumerate() {
            if dock.category == 0 || dock.category > config.limits.max_category {
                return Err(SchedulerError::InvalidConfig(format!(
                    "dock {} category {} out of range 1..={}",
                    id, dock.category, config.limits.max_category
                )));
            }
            if dock.crane_capacities.len() != dock.category as usize {
                return Err(SchedulerError::InvalidConfig(format!(
                    "dock {} has {} cranes but category {}",
                    id,
                    dock.crane_capacities.len(),
                    dock.category
                )));
            }
        }
        if num_solvers == 0 {
            return Err(SchedulerError::InvalidConfig(
                "must have at least one solver channel".to_string(),
            ));
        }
        if num_solvers > config.limits.max_solvers {
            return Err(SchedulerError::CapacityExceeded {
                what: "solver pool",
                limit: config.limits.max_solvers,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_timestep(&self) -> usize {
        self.current_timestep
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &ShipRegistry {
        &self.registry
    }

    pub fn docks(&self) -> &[Dock] {
        &self.docks
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            timesteps_processed: self.timesteps_processed,
            ships_serviced: self.registry.num_serviced(),
            cargo_moves: self.cargo_moves,
        }
    }

    // ========================================================================
    // State machine
    // ========================================================================

    /// Run until the validation collaborator signals completion.
    pub fn run(&mut self) -> Result<RunSummary, SchedulerError> {
        while self.step()? != Phase::Done {}
        Ok(self.summary())
    }

    /// Advance the state machine by exactly one phase.
    pub fn step(&mut self) -> Result<Phase, SchedulerError> {
        self.phase = match self.phase {
            Phase::AwaitingEvent => self.await_event()?,
            Phase::Merging => {
                self.merge_requests()?;
                Phase::Sorting
            }
            Phase::Sorting => {
                self.registry.sort_by_priority(self.current_timestep);
                Phase::AllocatingEmergency
            }
            Phase::AllocatingEmergency => {
                self.allocate_emergency()?;
                Phase::AllocatingIncoming
            }
            Phase::AllocatingIncoming => {
                self.allocate_incoming()?;
                Phase::AllocatingOutgoing
            }
            Phase::AllocatingOutgoing => {
                self.allocate_outgoing()?;
                Phase::TransferringCargo
            }
            Phase::TransferringCargo => {
                self.process_docks()?;
                Phase::AdvancingTimestep
            }
            Phase::AdvancingTimestep => {
                self.finish_timestep()?;
                Phase::AwaitingEvent
            }
            Phase::Done => Phase::Done,
        };
        Ok(self.phase)
    }

    /// Block for the next advance event; decide between a timestep and `Done`.
    fn await_event(&mut self) -> Result<Phase, SchedulerError> {
        let event = self.validation.recv_advance()?;
        self.current_timestep = event.timestep;

        if event.is_finished {
            return Ok(Phase::Done);
        }

        if event.num_new_requests > self.limits.max_request_batch {
            return Err(SchedulerError::CapacityExceeded {
                what: "request batch",
                limit: self.limits.max_request_batch,
            });
        }
        self.pending_requests = event.num_new_requests;
        self.event_log.log(Event::TimestepStarted {
            timestep: self.current_timestep,
            num_new_requests: event.num_new_requests,
        });
        Ok(Phase::Merging)
    }

    /// Pull this timestep's request batch and merge it into the registry.
    fn merge_requests(&mut self) -> Result<(), SchedulerError> {
        let requests = self.validation.take_requests(self.pending_requests)?;
        self.pending_requests = 0;

        for request in &requests {
            if request.cargo.len() > self.limits.max_cargo_items {
                return Err(SchedulerError::CapacityExceeded {
                    what: "cargo list",
                    limit: self.limits.max_cargo_items,
                });
            }
            let outcome = self.registry.merge_request(request)?;
            self.event_log.log(match outcome {
                MergeOutcome::Admitted => Event::ShipAdmitted {
                    timestep: self.current_timestep,
                    ship_id: request.ship_id,
                    direction: request.direction,
                },
                MergeOutcome::Refreshed => Event::ArrivalRefreshed {
                    timestep: self.current_timestep,
                    ship_id: request.ship_id,
                    direction: request.direction,
                },
            });
        }
        Ok(())
    }

    // ========================================================================
    // Allocation passes
    // ========================================================================

    fn allocate_emergency(&mut self) -> Result<(), SchedulerError> {
        for index in 0..self.registry.len() {
            let ship = self.registry.get(index);
            if ship.is_waiting() && ship.is_emergency() {
                self.try_dock(index)?;
            }
        }
        Ok(())
    }

    fn allocate_incoming(&mut self) -> Result<(), SchedulerError> {
        for index in 0..self.registry.len() {
            let ship = self.registry.get(index);
            if ship.is_waiting()
                && !ship.is_emergency()
                && ship.direction() == Direction::Incoming
                && ship.within_waiting_window(self.current_timestep)
            {
                self.try_dock(index)?;
            }
        }
        Ok(())
    }

    fn allocate_outgoing(&mut self) -> Result<(), SchedulerError> {
        for index in 0..self.registry.len() {
            let ship = self.registry.get(index);
            if ship.is_waiting() && ship.direction() == Direction::Outgoing {
                self.try_dock(index)?;
            }
        }
        Ok(())
    }

    /// Attempt to dock the ship at `index`; no dock available is not an error.
    fn try_dock(&mut self, index: usize) -> Result<(), SchedulerError> {
        let ship = self.registry.get(index);
        let Some(dock_id) = assign_dock(ship, &self.docks) else {
            return Ok(());
        };
        let ship_id = ship.id();
        let direction = ship.direction();

        self.docks[dock_id].occupy(ship_id, direction, self.current_timestep)?;
        self.registry.get_mut(index).dock(dock_id)?;

        self.validation.send(ValidationMessage::DockAssigned {
            ship_id,
            direction,
            dock_id,
        })?;
        self.event_log.log(Event::DockAssigned {
            timestep: self.current_timestep,
            ship_id,
            direction,
            dock_id,
        });
        Ok(())
    }

    // ========================================================================
    // Cargo transfer and undocking
    // ========================================================================

    fn process_docks(&mut self) -> Result<(), SchedulerError> {
        for dock_id in 0..self.docks.len() {
            let Some(occupant) = self.docks[dock_id].occupant().copied() else {
                continue;
            };
            // A ship cannot move cargo the timestep it docked.
            if occupant.docked_timestep == self.current_timestep {
                continue;
            }
            self.transfer_cargo(dock_id, occupant)?;
            self.attempt_undock(dock_id, occupant)?;
        }
        Ok(())
    }

    /// Run one best-fit cargo pass for the dock's occupant.
    ///
    /// Incoming ships unload, outgoing ships load; the assignment algorithm
    /// and the notifications are identical either way.
    fn transfer_cargo(&mut self, dock_id: usize, occupant: Occupant) -> Result<(), SchedulerError> {
        let now = self.current_timestep;

        // Plan from the dock-disambiguated occupant record: a re-presented
        // request may have appended a waiting twin with the same identity,
        // and its zeroed cargo progress must not drive this dock's plan.
        let moves = {
            let ship = self
                .registry
                .find_occupant(occupant.ship_id, occupant.direction, dock_id)
                .ok_or(SchedulerError::OccupantMissing {
                    ship_id: occupant.ship_id,
                    direction: occupant.direction,
                })?;
            plan_transfers(ship, &mut self.docks[dock_id])
        };

        let ship = self
            .registry
            .find_occupant_mut(occupant.ship_id, occupant.direction, dock_id)
            .ok_or(SchedulerError::OccupantMissing {
                ship_id: occupant.ship_id,
                direction: occupant.direction,
            })?;

        for cargo_move in &moves {
            ship.record_cargo_moved()?;
            self.validation.send(ValidationMessage::CargoMoved {
                ship_id: occupant.ship_id,
                direction: occupant.direction,
                dock_id,
                cargo_index: cargo_move.cargo_index,
                crane_index: cargo_move.crane_index,
            })?;
            self.event_log.log(Event::CargoMoved {
                timestep: now,
                ship_id: occupant.ship_id,
                direction: occupant.direction,
                dock_id,
                cargo_index: cargo_move.cargo_index,
                crane_index: cargo_move.crane_index,
            });
            self.cargo_moves += 1;
        }

        if ship.all_cargo_moved() && !self.docks[dock_id].cargo_fully_moved() {
            self.docks[dock_id].mark_cargo_fully_moved(now);
            self.event_log.log(Event::CargoCompleted {
                timestep: now,
                dock_id,
                ship_id: occupant.ship_id,
            });
        }
        Ok(())
    }

    /// Recover the authorization code and release the dock if possible.
    ///
    /// Runs at most once per dock per timestep, and never in the timestep the
    /// transfer completed. A failed full-space search leaves the ship docked;
    /// nothing changes the completion bookkeeping, so the stall is permanent
    /// by design and logged as `SearchExhausted`.
    fn attempt_undock(&mut self, dock_id: usize, occupant: Occupant) -> Result<(), SchedulerError> {
        let now = self.current_timestep;
        let dock = &self.docks[dock_id];
        if !dock.cargo_fully_moved() || dock.last_cargo_moved_timestep() == Some(now) {
            return Ok(());
        }
        let Some(length) = dock.transfer_duration() else {
            return Ok(());
        };
        // Invalid derived length: recoverable skip, retried next timestep.
        if length <= 0 {
            return Ok(());
        }

        let space = CandidateSpace::new(length as usize)?;
        self.event_log.log(Event::SearchStarted {
            timestep: now,
            dock_id,
            code_length: space.length(),
            num_candidates: space.total(),
        });

        let Some(code) = run_search(dock_id, &space, &mut self.solvers) else {
            self.event_log.log(Event::SearchExhausted {
                timestep: now,
                dock_id,
            });
            return Ok(());
        };

        self.validation.publish_auth_code(dock_id, &code)?;
        self.validation.send(ValidationMessage::Undocked {
            ship_id: occupant.ship_id,
            direction: occupant.direction,
            dock_id,
        })?;

        self.registry
            .find_occupant_mut(occupant.ship_id, occupant.direction, dock_id)
            .ok_or(SchedulerError::OccupantMissing {
                ship_id: occupant.ship_id,
                direction: occupant.direction,
            })?
            .release()?;
        self.docks[dock_id].release()?;

        self.event_log.log(Event::Undocked {
            timestep: now,
            ship_id: occupant.ship_id,
            direction: occupant.direction,
            dock_id,
        });
        Ok(())
    }

    fn finish_timestep(&mut self) -> Result<(), SchedulerError> {
        self.validation.send(ValidationMessage::TimestepDone)?;
        self.event_log.log(Event::TimestepCompleted {
            timestep: self.current_timestep,
        });
        self.timesteps_processed += 1;
        Ok(())
    }
}
