//! Dock allocation policy
//!
//! `assign_dock` is a pure function over the registry entry and the dock
//! table; the orchestrator performs the occupy side effects on success.
//! Allocation failure is normal backpressure, not an error — the ship simply
//! stays `Waiting`.

use crate::models::dock::Dock;
use crate::models::ship::Ship;

/// Pick a dock for a waiting ship, or `None` when no dock is eligible.
///
/// * Emergency ships: tightest fit — the unoccupied dock with the smallest
///   category `>=` the ship's category (lowest id on ties).
/// * Regular ships: an unoccupied dock of exactly the ship's category (lowest
///   id first), falling back to the same tightest-fit rule.
///
/// The dock slice must be in ascending id order; the orchestrator maintains
/// `docks[i].id() == i`.
pub fn assign_dock(ship: &Ship, docks: &[Dock]) -> Option<usize> {
    if ship.is_emergency() {
        return tightest_fit(ship.category(), docks);
    }

    if let Some(dock) = docks
        .iter()
        .find(|d| !d.is_occupied() && d.category() == ship.category())
    {
        return Some(dock.id());
    }

    tightest_fit(ship.category(), docks)
}

/// Unoccupied dock with the smallest category `>= category`.
fn tightest_fit(category: u32, docks: &[Dock]) -> Option<usize> {
    docks
        .iter()
        .filter(|d| !d.is_occupied() && d.category() >= category)
        .min_by_key(|d| d.category())
        .map(|d| d.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ship::Direction;
    use crate::protocol::ShipRequest;

    fn ship(category: u32, emergency: bool) -> Ship {
        Ship::from_request(&ShipRequest {
            ship_id: 1,
            timestep: 1,
            category,
            direction: Direction::Incoming,
            emergency,
            waiting_time: 5,
            cargo: vec![],
        })
    }

    fn dock(id: usize, category: u32) -> Dock {
        Dock::new(id, category, vec![10; category as usize])
    }

    #[test]
    fn test_exact_match_preferred_for_regular_ships() {
        let docks = vec![dock(0, 5), dock(1, 3), dock(2, 3)];
        assert_eq!(assign_dock(&ship(3, false), &docks), Some(1));
    }

    #[test]
    fn test_regular_falls_back_to_tightest_fit() {
        let docks = vec![dock(0, 9), dock(1, 5), dock(2, 7)];
        assert_eq!(assign_dock(&ship(4, false), &docks), Some(1));
    }

    #[test]
    fn test_emergency_takes_tightest_fit_even_when_exact_exists() {
        // Emergency skips the exact-match preference; here the exact match is
        // also the tightest fit, a larger dock would never be chosen over it.
        let docks = vec![dock(0, 6), dock(1, 2)];
        assert_eq!(assign_dock(&ship(2, true), &docks), Some(1));
    }

    #[test]
    fn test_emergency_accepts_over_provisioned_dock() {
        // Only a category-5 dock is free; a category-2 emergency ship takes it.
        let mut occupied = dock(0, 2);
        occupied.occupy(99, Direction::Incoming, 1).unwrap();
        let docks = vec![occupied, dock(1, 5)];
        assert_eq!(assign_dock(&ship(2, true), &docks), Some(1));
    }

    #[test]
    fn test_never_assigns_below_category() {
        let docks = vec![dock(0, 1), dock(1, 2)];
        assert_eq!(assign_dock(&ship(3, false), &docks), None);
        assert_eq!(assign_dock(&ship(3, true), &docks), None);
    }

    #[test]
    fn test_occupied_docks_skipped() {
        let mut taken = dock(0, 2);
        taken.occupy(42, Direction::Outgoing, 1).unwrap();
        let docks = vec![taken, dock(1, 2)];
        assert_eq!(assign_dock(&ship(2, false), &docks), Some(1));
    }

    #[test]
    fn test_tie_on_category_goes_to_lowest_id() {
        let docks = vec![dock(0, 4), dock(1, 4)];
        assert_eq!(assign_dock(&ship(3, true), &docks), Some(0));
    }
}
