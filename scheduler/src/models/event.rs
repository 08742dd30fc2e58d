//! Event logging for run diagnostics and auditing.
//!
//! The orchestrator records every significant state change as a typed event:
//! admissions, dock assignments, cargo moves, authorization searches, and
//! undockings. The log makes a run explainable after the fact and lets tests
//! assert on what happened without scraping the outbound channel.

use crate::models::ship::Direction;

/// A scheduler event capturing one state change.
///
/// All events carry the timestep they occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Timestep-advance event received from the validation collaborator
    TimestepStarted {
        timestep: usize,
        num_new_requests: usize,
    },

    /// New ship record appended to the registry
    ShipAdmitted {
        timestep: usize,
        ship_id: u32,
        direction: Direction,
    },

    /// Waiting ship re-presented; arrival timestep refreshed
    ArrivalRefreshed {
        timestep: usize,
        ship_id: u32,
        direction: Direction,
    },

    /// Ship assigned to a dock
    DockAssigned {
        timestep: usize,
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    },

    /// One cargo item transferred by a crane
    CargoMoved {
        timestep: usize,
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
        cargo_index: usize,
        crane_index: usize,
    },

    /// All cargo for the dock's occupant has been transferred
    CargoCompleted {
        timestep: usize,
        dock_id: usize,
        ship_id: u32,
    },

    /// Authorization search launched for a dock
    SearchStarted {
        timestep: usize,
        dock_id: usize,
        code_length: usize,
        num_candidates: u128,
    },

    /// Authorization search exhausted the candidate space without a match
    SearchExhausted { timestep: usize, dock_id: usize },

    /// Dock released, ship serviced
    Undocked {
        timestep: usize,
        ship_id: u32,
        direction: Direction,
        dock_id: usize,
    },

    /// All processing for this timestep finished
    TimestepCompleted { timestep: usize },
}

impl Event {
    /// Timestep this event occurred in.
    pub fn timestep(&self) -> usize {
        match self {
            Event::TimestepStarted { timestep, .. } => *timestep,
            Event::ShipAdmitted { timestep, .. } => *timestep,
            Event::ArrivalRefreshed { timestep, .. } => *timestep,
            Event::DockAssigned { timestep, .. } => *timestep,
            Event::CargoMoved { timestep, .. } => *timestep,
            Event::CargoCompleted { timestep, .. } => *timestep,
            Event::SearchStarted { timestep, .. } => *timestep,
            Event::SearchExhausted { timestep, .. } => *timestep,
            Event::Undocked { timestep, .. } => *timestep,
            Event::TimestepCompleted { timestep } => *timestep,
        }
    }

    /// Short event-type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TimestepStarted { .. } => "TimestepStarted",
            Event::ShipAdmitted { .. } => "ShipAdmitted",
            Event::ArrivalRefreshed { .. } => "ArrivalRefreshed",
            Event::DockAssigned { .. } => "DockAssigned",
            Event::CargoMoved { .. } => "CargoMoved",
            Event::CargoCompleted { .. } => "CargoCompleted",
            Event::SearchStarted { .. } => "SearchStarted",
            Event::SearchExhausted { .. } => "SearchExhausted",
            Event::Undocked { .. } => "Undocked",
            Event::TimestepCompleted { .. } => "TimestepCompleted",
        }
    }

    /// Dock id, if the event concerns a specific dock.
    pub fn dock_id(&self) -> Option<usize> {
        match self {
            Event::DockAssigned { dock_id, .. } => Some(*dock_id),
            Event::CargoMoved { dock_id, .. } => Some(*dock_id),
            Event::CargoCompleted { dock_id, .. } => Some(*dock_id),
            Event::SearchStarted { dock_id, .. } => Some(*dock_id),
            Event::SearchExhausted { dock_id, .. } => Some(*dock_id),
            Event::Undocked { dock_id, .. } => Some(*dock_id),
            _ => None,
        }
    }
}

/// Append-only log of scheduler events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded during one timestep.
    pub fn events_at_timestep(&self, timestep: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.timestep() == timestep)
            .collect()
    }

    /// Events of one type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }
}
