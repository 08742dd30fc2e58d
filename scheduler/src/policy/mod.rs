//! Scheduling policies
//!
//! Pure decision functions over the registry and dock table:
//!
//! - **priority**: the multi-key total order ships are sorted by each timestep
//! - **allocation**: dock assignment (exact match / tightest fit)
//! - **crane**: per-timestep best-fit crane-to-cargo planning
//!
//! Policies never mutate ships or send messages; the orchestrator applies
//! their decisions and performs all side effects.

pub mod allocation;
pub mod crane;
pub mod priority;

pub use allocation::assign_dock;
pub use crane::{best_fit_crane, plan_transfers, CargoMove};
pub use priority::{priority_key, PriorityKey};
