//! Fixed capacity limits
//!
//! The scheduler operates against bounded external buffers: the request batch,
//! the per-ship cargo list, the dock table, and the solver pool all have fixed
//! maximum sizes. Exceeding any of them is reported as an explicit
//! `SchedulerError::CapacityExceeded`, never silent truncation.

use serde::{Deserialize, Serialize};

/// Maximum number of ship records the registry will hold for one run.
pub const MAX_SHIPS: usize = 1100;

/// Maximum number of docks in the dock table.
pub const MAX_DOCKS: usize = 30;

/// Maximum number of cargo items a single ship may carry.
pub const MAX_CARGO_ITEMS: usize = 200;

/// Maximum number of ship requests in one inbound batch.
pub const MAX_REQUEST_BATCH: usize = 100;

/// Maximum number of solver channels (authorization search workers).
pub const MAX_SOLVERS: usize = 8;

/// Maximum dock/ship category. A dock of category `c` has exactly `c` cranes.
pub const MAX_CATEGORY: u32 = 25;

/// Maximum derived authorization code length.
pub const MAX_AUTH_CODE_LEN: usize = 100;

/// Capacity limits for one scheduler run.
///
/// Defaults mirror the compile-time constants above; tests may shrink them to
/// exercise capacity errors without building huge inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_ships: usize,
    pub max_docks: usize,
    pub max_cargo_items: usize,
    pub max_request_batch: usize,
    pub max_solvers: usize,
    pub max_category: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_ships: MAX_SHIPS,
            max_docks: MAX_DOCKS,
            max_cargo_items: MAX_CARGO_ITEMS,
            max_request_batch: MAX_REQUEST_BATCH,
            max_solvers: MAX_SOLVERS,
            max_category: MAX_CATEGORY,
        }
    }
}
