//! Domain models: ships, docks, the ship registry, and the event log.

pub mod dock;
pub mod event;
pub mod registry;
pub mod ship;
