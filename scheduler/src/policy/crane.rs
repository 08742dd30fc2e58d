//! Crane-to-cargo best-fit assignment
//!
//! Loading and unloading use the identical algorithm; only the direction of
//! the ship decides which operation the collaborator is told about. Each
//! timestep every crane may move at most one cargo item. Cargo is taken in
//! order; the pass stops at the first item no unused crane can lift, and the
//! remainder waits for the next timestep.

use crate::models::dock::Dock;
use crate::models::ship::Ship;

/// One planned cargo transfer within a timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CargoMove {
    pub cargo_index: usize,
    pub crane_index: usize,
}

/// Unused crane with capacity `>= weight` and minimal slack.
///
/// Ties go to the lowest crane index.
pub fn best_fit_crane(dock: &Dock, weight: u32) -> Option<usize> {
    dock.crane_capacities()
        .iter()
        .enumerate()
        .filter(|(index, capacity)| !dock.crane_is_used(*index) && **capacity >= weight)
        .min_by_key(|(_, capacity)| **capacity - weight)
        .map(|(index, _)| index)
}

/// Plan this timestep's transfers for the ship occupying `dock`.
///
/// Resets the dock's crane bitset, then greedily assigns cranes best-fit to
/// the ship's remaining cargo in order. Marks chosen cranes used on the dock;
/// the caller advances the ship's progress and emits notifications.
pub fn plan_transfers(ship: &Ship, dock: &mut Dock) -> Vec<CargoMove> {
    dock.reset_cranes();

    let mut moves = Vec::new();
    for cargo_index in ship.cargo_processed()..ship.cargo().len() {
        let weight = ship.cargo()[cargo_index];
        match best_fit_crane(dock, weight) {
            Some(crane_index) => {
                dock.mark_crane_used(crane_index);
                moves.push(CargoMove {
                    cargo_index,
                    crane_index,
                });
            }
            None => break,
        }
    }
    moves
}
