//! Ship priority ordering
//!
//! The registry is re-sorted once per timestep before any allocation pass.
//! The ordering is built as an explicit key-extraction pipeline rather than a
//! multi-branch comparator: `PriorityKey` derives `Ord`, so the comparison is
//! lexicographic over its fields and the total order is transitive by
//! construction.
//!
//! Key sequence (most significant first):
//!
//! 1. status rank — waiting, then docked, then serviced (serviced strictly
//!    last)
//! 2. emergency ships before non-emergency
//! 3. incoming before outgoing
//! 4. urgency: remaining time budget `(arrival + waiting) - now`, ascending;
//!    only non-emergency incoming ships have a real budget, everyone else
//!    carries a sentinel that ties
//! 5. arrival timestep, ascending
//!
//! The urgency key sits after the direction key, which preserves the original
//! policy: a time budget is only ever compared between two non-emergency
//! incoming ships, and for those the direction key already ties.

use crate::models::ship::{Direction, Ship, ShipStatus};

/// Ordering key for one ship at one timestep.
///
/// Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    status_rank: u8,
    non_emergency: bool,
    outgoing: bool,
    urgency: i64,
    arrival_timestep: usize,
}

/// Extract the priority key for `ship` as of `current_timestep`.
pub fn priority_key(ship: &Ship, current_timestep: usize) -> PriorityKey {
    let status_rank = match ship.status() {
        ShipStatus::Waiting => 0,
        ShipStatus::Docked { .. } => 1,
        ShipStatus::Serviced => 2,
    };

    let urgency = if !ship.is_emergency() && ship.direction() == Direction::Incoming {
        ship.remaining_window(current_timestep)
    } else {
        i64::MAX
    };

    PriorityKey {
        status_rank,
        non_emergency: !ship.is_emergency(),
        outgoing: ship.direction() == Direction::Outgoing,
        urgency,
        arrival_timestep: ship.arrival_timestep(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ShipRequest;

    fn ship(
        id: u32,
        direction: Direction,
        emergency: bool,
        waiting_time: usize,
        arrival: usize,
    ) -> Ship {
        Ship::from_request(&ShipRequest {
            ship_id: id,
            timestep: arrival,
            category: 1,
            direction,
            emergency,
            waiting_time,
            cargo: vec![],
        })
    }

    fn sorted_ids(mut ships: Vec<Ship>, now: usize) -> Vec<u32> {
        ships.sort_by_key(|s| priority_key(s, now));
        ships.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_urgent_incoming_ship_first() {
        // Remaining budgets at timestep 5: ship 1 -> 3, ship 2 -> 1.
        let a = ship(1, Direction::Incoming, false, 7, 1);
        let b = ship(2, Direction::Incoming, false, 5, 1);
        assert_eq!(sorted_ids(vec![a, b], 5), vec![2, 1]);
    }

    #[test]
    fn test_emergency_before_regular() {
        let regular = ship(1, Direction::Incoming, false, 1, 1);
        let emergency = ship(2, Direction::Incoming, true, 100, 3);
        assert_eq!(sorted_ids(vec![regular, emergency], 4), vec![2, 1]);
    }

    #[test]
    fn test_incoming_before_outgoing() {
        let outgoing = ship(1, Direction::Outgoing, false, 5, 1);
        let incoming = ship(2, Direction::Incoming, false, 50, 2);
        assert_eq!(sorted_ids(vec![outgoing, incoming], 3), vec![2, 1]);
    }

    #[test]
    fn test_serviced_sorts_last() {
        let mut serviced = ship(1, Direction::Incoming, true, 1, 1);
        serviced.dock(0).unwrap();
        serviced.release().unwrap();

        let mut docked = ship(2, Direction::Incoming, false, 5, 2);
        docked.dock(1).unwrap();

        let waiting = ship(3, Direction::Outgoing, false, 5, 3);
        assert_eq!(sorted_ids(vec![serviced, docked, waiting], 4), vec![3, 2, 1]);
    }

    #[test]
    fn test_arrival_breaks_ties() {
        let later = ship(1, Direction::Outgoing, false, 5, 9);
        let earlier = ship(2, Direction::Outgoing, false, 5, 4);
        assert_eq!(sorted_ids(vec![later, earlier], 10), vec![2, 1]);
    }

    #[test]
    fn test_emergency_pair_ordered_by_arrival_not_budget() {
        // Emergency ships have no urgency key; the earlier arrival wins even
        // with a larger waiting budget.
        let a = ship(1, Direction::Incoming, true, 100, 6);
        let b = ship(2, Direction::Incoming, true, 1, 2);
        assert_eq!(sorted_ids(vec![a, b], 7), vec![2, 1]);
    }

    #[test]
    fn test_key_order_is_total() {
        // Transitivity spot check across the branchy cases that were fragile
        // in a raw comparator: sorting any permutation yields the same order.
        let mut docked = ship(4, Direction::Incoming, false, 3, 1);
        docked.dock(0).unwrap();
        let ships = vec![
            ship(1, Direction::Incoming, false, 2, 5),
            ship(2, Direction::Outgoing, true, 9, 4),
            ship(3, Direction::Incoming, true, 1, 6),
            docked,
            ship(5, Direction::Outgoing, false, 7, 2),
        ];

        let baseline = sorted_ids(ships.clone(), 7);
        let mut rotated = ships;
        rotated.rotate_left(2);
        assert_eq!(sorted_ids(rotated, 7), baseline);
    }
}
