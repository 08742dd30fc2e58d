//! Concurrent authorization code search
//!
//! The candidate index range is split evenly across one worker per solver
//! channel; the last worker absorbs the remainder. Workers run under
//! `std::thread::scope` and share exactly two values, the found flag and the
//! winning candidate, both behind a single mutex.
//!
//! Termination protocol:
//!
//! - a worker checks the found flag under the lock before every send and stops
//!   once it is set (cooperative cancellation, polled per candidate)
//! - the first worker to observe-and-set the flag under the lock is the unique
//!   winner; later correct verdicts are discarded
//! - an `Abort` verdict retires that worker's channel only
//! - a send or receive failure skips that one candidate and continues
//!
//! The coordinator joins every worker before returning, so the caller sees a
//! consistent before/after state with no partial results.

use crate::auth::candidates::CandidateSpace;
use crate::protocol::{SolverRequest, SolverVerdict};
use crate::transport::SolverChannel;
use std::sync::Mutex;

/// Shared search state: the found flag and the winner slot.
#[derive(Debug, Default)]
struct SearchOutcome {
    found: bool,
    winner: Option<String>,
}

/// Run one full search of `space` against the solver pool.
///
/// Blocks until every worker has finished. Returns the winning candidate, or
/// `None` when the whole space was exhausted (or every channel retired)
/// without a correct verdict.
///
/// # Panics
///
/// Panics if `solvers` is empty.
pub fn run_search(
    dock_id: usize,
    space: &CandidateSpace,
    solvers: &mut [Box<dyn SolverChannel>],
) -> Option<String> {
    assert!(
        !solvers.is_empty(),
        "called `run_search` with no solver channels"
    );

    let total = space.total();
    let chunk = total / solvers.len() as u128;
    let last = solvers.len() - 1;
    let outcome = Mutex::new(SearchOutcome::default());

    std::thread::scope(|scope| {
        for (worker, solver) in solvers.iter_mut().enumerate() {
            let start = worker as u128 * chunk;
            let end = if worker == last {
                total
            } else {
                (worker as u128 + 1) * chunk
            };
            let outcome = &outcome;

            scope.spawn(move || run_worker(dock_id, space, solver, start, end, outcome));
        }
    });

    outcome
        .into_inner()
        .expect("auth search worker panicked")
        .winner
}

/// One worker's guess loop over `[start, end)`.
fn run_worker(
    dock_id: usize,
    space: &CandidateSpace,
    solver: &mut Box<dyn SolverChannel>,
    start: u128,
    end: u128,
    outcome: &Mutex<SearchOutcome>,
) {
    // Announce the target dock; a channel that cannot even take the
    // announcement is unusable for this search.
    if solver.send(SolverRequest::TargetDock { dock_id }).is_err() {
        return;
    }

    let mut index = start;
    while index < end {
        {
            let guard = outcome.lock().expect("auth search worker panicked");
            if guard.found {
                return;
            }
        }

        let candidate = space.candidate(index);
        index += 1;

        // A lossy channel costs one candidate, not the search.
        if solver
            .send(SolverRequest::Guess {
                candidate: candidate.clone(),
            })
            .is_err()
        {
            continue;
        }
        let verdict = match solver.recv_verdict() {
            Ok(verdict) => verdict,
            Err(_) => continue,
        };

        match verdict {
            SolverVerdict::Correct => {
                let mut guard = outcome.lock().expect("auth search worker panicked");
                if !guard.found {
                    guard.found = true;
                    guard.winner = Some(candidate);
                }
                return;
            }
            SolverVerdict::Incorrect => {}
            SolverVerdict::Abort => return,
        }
    }
}
