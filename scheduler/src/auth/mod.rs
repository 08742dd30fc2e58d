//! Authorization code recovery
//!
//! Once a dock's cargo is fully transferred, the ship can only be released
//! after its authorization code is recovered by brute force against the
//! external solver oracles. The code length is derived, not configured: it is
//! the number of timesteps the cargo transfer took.

pub mod candidates;
pub mod search;

pub use candidates::{AuthError, CandidateSpace, EDGE_ALPHABET, INTERIOR_ALPHABET};
pub use search::run_search;
