//! End-to-end orchestrator scenarios over scripted in-memory channels.
//!
//! Each test drives a full run: scripted timestep advances and request
//! batches in, recorded notifications and published authorization codes out.

use port_scheduler_core_rs::transport::mem::{OracleSolverChannel, ScriptedValidationChannel};
use port_scheduler_core_rs::{
    AdvanceEvent, Direction, DockConfig, Limits, Orchestrator, OrchestratorConfig, ShipRequest,
    SolverChannel, ValidationMessage,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn config(docks: Vec<DockConfig>) -> OrchestratorConfig {
    OrchestratorConfig {
        docks,
        limits: Limits::default(),
    }
}

fn advance(timestep: usize, num_new_requests: usize) -> AdvanceEvent {
    AdvanceEvent {
        timestep,
        num_new_requests,
        is_finished: false,
    }
}

fn request(ship_id: u32, timestep: usize, direction: Direction, cargo: Vec<u32>) -> ShipRequest {
    ShipRequest {
        ship_id,
        timestep,
        category: 2,
        direction,
        emergency: false,
        waiting_time: 10,
        cargo,
    }
}

fn oracle(secret: &str) -> Vec<Box<dyn SolverChannel>> {
    vec![Box::new(OracleSolverChannel::new(secret))]
}

// ============================================================================
// Test 1: Full lifecycle of a single ship
// ============================================================================

#[test]
fn test_single_ship_full_lifecycle() {
    // Dock 0: category 2, cranes [10, 15]. Ship 7 arrives at timestep 1 with
    // cargo [12, 9]:
    //   t1: dock assignment only (no cargo the docking timestep)
    //   t2: cargo 0 -> crane 1 (only crane that lifts 12), cargo 1 -> crane 0
    //       (tighter fit); transfer completes, no undock the same timestep
    //   t3: code length = 2 - 1 = 1, five candidates, secret "7" recovered
    let mut script = ScriptedValidationChannel::new();
    script.queue_advance(
        advance(1, 1),
        vec![request(7, 1, Direction::Incoming, vec![12, 9])],
    );
    script.queue_advance(advance(2, 0), Vec::new());
    script.queue_advance(advance(3, 0), Vec::new());
    script.queue_finished(4);

    let channel = Arc::new(Mutex::new(script));
    let mut orchestrator = Orchestrator::new(
        config(vec![DockConfig {
            category: 2,
            crane_capacities: vec![10, 15],
        }]),
        Box::new(Arc::clone(&channel)),
        oracle("7"),
    )
    .unwrap();

    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.timesteps_processed, 3);
    assert_eq!(summary.ships_serviced, 1);
    assert_eq!(summary.cargo_moves, 2);

    let channel = channel.lock().unwrap();
    assert_eq!(
        channel.sent(),
        &[
            ValidationMessage::DockAssigned {
                ship_id: 7,
                direction: Direction::Incoming,
                dock_id: 0,
            },
            ValidationMessage::TimestepDone,
            ValidationMessage::CargoMoved {
                ship_id: 7,
                direction: Direction::Incoming,
                dock_id: 0,
                cargo_index: 0,
                crane_index: 1,
            },
            ValidationMessage::CargoMoved {
                ship_id: 7,
                direction: Direction::Incoming,
                dock_id: 0,
                cargo_index: 1,
                crane_index: 0,
            },
            ValidationMessage::TimestepDone,
            ValidationMessage::Undocked {
                ship_id: 7,
                direction: Direction::Incoming,
                dock_id: 0,
            },
            ValidationMessage::TimestepDone,
        ]
    );
    assert_eq!(channel.auth_code(0), Some("7"));
}

// ============================================================================
// Test 2: Emergency ships preempt everyone for the only dock
// ============================================================================

#[test]
fn test_emergency_ship_takes_the_only_dock() {
    let mut script = ScriptedValidationChannel::new();
    script.queue_advance(
        advance(1, 3),
        vec![
            request(1, 1, Direction::Incoming, vec![5]),
            ShipRequest {
                emergency: true,
                ..request(2, 1, Direction::Incoming, vec![5])
            },
            request(3, 1, Direction::Outgoing, vec![5]),
        ],
    );
    script.queue_finished(2);

    let channel = Arc::new(Mutex::new(script));
    let mut orchestrator = Orchestrator::new(
        config(vec![DockConfig {
            category: 2,
            crane_capacities: vec![10, 10],
        }]),
        Box::new(Arc::clone(&channel)),
        oracle("5"),
    )
    .unwrap();
    orchestrator.run().unwrap();

    let channel = channel.lock().unwrap();
    let assignments: Vec<_> = channel
        .sent()
        .iter()
        .filter(|m| matches!(m, ValidationMessage::DockAssigned { .. }))
        .collect();
    assert_eq!(
        assignments,
        vec![&ValidationMessage::DockAssigned {
            ship_id: 2,
            direction: Direction::Incoming,
            dock_id: 0,
        }]
    );
}

// ============================================================================
// Test 3: Exhausted search leaves the ship docked and is retried
// ============================================================================

#[test]
fn test_exhausted_search_stalls_the_dock() {
    // The oracle's secret contains a character outside the code alphabet, so
    // no candidate ever matches. The ship finishes its cargo but can never be
    // released; the search is re-run on every later timestep.
    let mut script = ScriptedValidationChannel::new();
    script.queue_advance(
        advance(1, 1),
        vec![request(9, 1, Direction::Outgoing, vec![5])],
    );
    script.queue_advance(advance(2, 0), Vec::new());
    script.queue_advance(advance(3, 0), Vec::new());
    script.queue_advance(advance(4, 0), Vec::new());
    script.queue_finished(5);

    let channel = Arc::new(Mutex::new(script));
    let mut orchestrator = Orchestrator::new(
        config(vec![DockConfig {
            category: 2,
            crane_capacities: vec![10, 10],
        }]),
        Box::new(Arc::clone(&channel)),
        oracle("x"),
    )
    .unwrap();

    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.ships_serviced, 0);

    // Cargo done at t2; searches at t3 and t4 both exhaust.
    let log = orchestrator.event_log();
    assert_eq!(log.events_of_type("SearchExhausted").len(), 2);
    assert!(log.events_of_type("Undocked").is_empty());
    assert!(orchestrator.docks()[0].is_occupied());

    let channel = channel.lock().unwrap();
    assert_eq!(channel.auth_code(0), None);
}

// ============================================================================
// Test 4: A re-presented request must not disturb the docked twin's transfer
// ============================================================================

#[test]
fn test_re_presented_request_does_not_disturb_docked_transfer() {
    // Ship 1 docks at t1 with cargo [5, 5, 5] on a two-crane dock: items 0
    // and 1 move at t2. At t3 the same request is re-presented while the
    // ship is docked, which appends a fresh waiting record with zero cargo
    // progress. The dock's plan must keep following the occupant record:
    // exactly item 2 moves at t3, and the run completes without error.
    let mut script = ScriptedValidationChannel::new();
    script.queue_advance(
        advance(1, 1),
        vec![request(1, 1, Direction::Incoming, vec![5, 5, 5])],
    );
    script.queue_advance(advance(2, 0), Vec::new());
    script.queue_advance(
        advance(3, 1),
        vec![request(1, 3, Direction::Incoming, vec![5, 5, 5])],
    );
    script.queue_advance(advance(4, 0), Vec::new());
    script.queue_finished(5);

    let channel = Arc::new(Mutex::new(script));
    let mut orchestrator = Orchestrator::new(
        config(vec![DockConfig {
            category: 2,
            crane_capacities: vec![10, 10],
        }]),
        Box::new(Arc::clone(&channel)),
        oracle("75"),
    )
    .unwrap();

    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.cargo_moves, 3);
    assert_eq!(summary.ships_serviced, 1);

    // The re-presentation admitted a second record rather than refreshing.
    let log = orchestrator.event_log();
    assert_eq!(log.events_of_type("ShipAdmitted").len(), 2);
    assert!(log.events_of_type("ArrivalRefreshed").is_empty());

    let channel = channel.lock().unwrap();
    let moved_indices: Vec<usize> = channel
        .sent()
        .iter()
        .filter_map(|m| match m {
            ValidationMessage::CargoMoved { cargo_index, .. } => Some(*cargo_index),
            _ => None,
        })
        .collect();
    assert_eq!(moved_indices, vec![0, 1, 2]);

    // Transfer ran t2..t3, so the derived code has length 2.
    assert_eq!(channel.auth_code(0), Some("75"));
}

// ============================================================================
// Test 5: Re-presented requests refresh the waiting window
// ============================================================================

#[test]
fn test_refreshed_request_keeps_ship_eligible() {
    // One category-1 dock. Ship 1 occupies it from t1 until its release at
    // t3. Ship 2 has a zero waiting window, so it is only eligible in the
    // timestep it arrived; its request is re-presented every timestep until
    // the dock frees up at t4.
    let ship2 = |timestep| ShipRequest {
        ship_id: 2,
        timestep,
        category: 1,
        direction: Direction::Incoming,
        emergency: false,
        waiting_time: 0,
        cargo: vec![3],
    };

    let mut script = ScriptedValidationChannel::new();
    script.queue_advance(
        advance(1, 2),
        vec![
            ShipRequest {
                category: 1,
                waiting_time: 0,
                ..request(1, 1, Direction::Incoming, vec![3])
            },
            ship2(1),
        ],
    );
    script.queue_advance(advance(2, 1), vec![ship2(2)]);
    script.queue_advance(advance(3, 1), vec![ship2(3)]);
    script.queue_advance(advance(4, 1), vec![ship2(4)]);
    script.queue_finished(5);

    let channel = Arc::new(Mutex::new(script));
    let mut orchestrator = Orchestrator::new(
        config(vec![DockConfig {
            category: 1,
            crane_capacities: vec![10],
        }]),
        Box::new(Arc::clone(&channel)),
        oracle("5"),
    )
    .unwrap();
    orchestrator.run().unwrap();

    let log = orchestrator.event_log();
    assert_eq!(log.events_of_type("ArrivalRefreshed").len(), 3);

    let assigned_ship2: Vec<_> = log
        .events_of_type("DockAssigned")
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                port_scheduler_core_rs::Event::DockAssigned { ship_id: 2, .. }
            )
        })
        .collect();
    assert_eq!(assigned_ship2.len(), 1);
    assert_eq!(assigned_ship2[0].timestep(), 4);
}
