//! In-memory transports
//!
//! Deterministic channel implementations used by the test suite and scenario
//! replays. Available in all builds so integration tests can drive a full
//! orchestrator without external processes.

use crate::protocol::{AdvanceEvent, ShipRequest, SolverRequest, SolverVerdict, ValidationMessage};
use crate::transport::{SolverChannel, TransportError, ValidationChannel};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Validation channel driven by a pre-loaded script of timesteps.
///
/// Records every outbound notification and published authorization code so
/// tests can assert on the exact sequence the scheduler produced.
#[derive(Debug, Default)]
pub struct ScriptedValidationChannel {
    script: VecDeque<(AdvanceEvent, Vec<ShipRequest>)>,
    inbound: Vec<ShipRequest>,
    sent: Vec<ValidationMessage>,
    auth_codes: HashMap<usize, String>,
}

impl ScriptedValidationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one timestep-advance event together with its request batch.
    pub fn queue_advance(&mut self, event: AdvanceEvent, requests: Vec<ShipRequest>) {
        self.script.push_back((event, requests));
    }

    /// Queue the final advance event that ends the run.
    pub fn queue_finished(&mut self, timestep: usize) {
        self.queue_advance(
            AdvanceEvent {
                timestep,
                num_new_requests: 0,
                is_finished: true,
            },
            Vec::new(),
        );
    }

    /// All notifications sent so far, in order.
    pub fn sent(&self) -> &[ValidationMessage] {
        &self.sent
    }

    /// Authorization code published for a dock, if any.
    pub fn auth_code(&self, dock_id: usize) -> Option<&str> {
        self.auth_codes.get(&dock_id).map(String::as_str)
    }
}

impl ValidationChannel for ScriptedValidationChannel {
    fn recv_advance(&mut self) -> Result<AdvanceEvent, TransportError> {
        let (event, requests) = self.script.pop_front().ok_or(TransportError::Closed)?;
        self.inbound = requests;
        Ok(event)
    }

    fn take_requests(&mut self, count: usize) -> Result<Vec<ShipRequest>, TransportError> {
        let take = count.min(self.inbound.len());
        Ok(self.inbound.drain(..take).collect())
    }

    fn send(&mut self, message: ValidationMessage) -> Result<(), TransportError> {
        self.sent.push(message);
        Ok(())
    }

    fn publish_auth_code(&mut self, dock_id: usize, code: &str) -> Result<(), TransportError> {
        self.auth_codes.insert(dock_id, code.to_string());
        Ok(())
    }
}

/// Shared handle to a [`ScriptedValidationChannel`].
///
/// The orchestrator takes ownership of its validation channel, so tests that
/// want to inspect the recorded traffic after a run hand the orchestrator a
/// handle and keep a clone for themselves.
impl ValidationChannel for Arc<Mutex<ScriptedValidationChannel>> {
    fn recv_advance(&mut self) -> Result<AdvanceEvent, TransportError> {
        self.lock()
            .expect("validation channel mutex poisoned")
            .recv_advance()
    }

    fn take_requests(&mut self, count: usize) -> Result<Vec<ShipRequest>, TransportError> {
        self.lock()
            .expect("validation channel mutex poisoned")
            .take_requests(count)
    }

    fn send(&mut self, message: ValidationMessage) -> Result<(), TransportError> {
        self.lock()
            .expect("validation channel mutex poisoned")
            .send(message)
    }

    fn publish_auth_code(&mut self, dock_id: usize, code: &str) -> Result<(), TransportError> {
        self.lock()
            .expect("validation channel mutex poisoned")
            .publish_auth_code(dock_id, code)
    }
}

/// Solver channel graded locally against a known secret.
///
/// Optional failure injection covers the error-handling contract: an abort
/// after a fixed number of graded guesses, and periodic send failures on
/// guesses (the announcement is never failed).
#[derive(Debug)]
pub struct OracleSolverChannel {
    /// `None` accepts any guess (used to exercise the first-winner protocol)
    secret: Option<String>,
    target_dock: Option<usize>,
    pending: Option<SolverVerdict>,
    guesses_graded: usize,
    abort_after: Option<usize>,
    fail_guess_every: Option<usize>,
    guess_sends: usize,
}

impl OracleSolverChannel {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Some(secret.to_string()),
            target_dock: None,
            pending: None,
            guesses_graded: 0,
            abort_after: None,
            fail_guess_every: None,
            guess_sends: 0,
        }
    }

    /// A solver that answers `Correct` to every guess.
    pub fn accepting_any() -> Self {
        Self {
            secret: None,
            ..Self::new("")
        }
    }

    /// Answer `Abort` once `n` guesses have been graded.
    pub fn with_abort_after(mut self, n: usize) -> Self {
        self.abort_after = Some(n);
        self
    }

    /// Fail every `k`-th guess send (1-based), simulating a lossy channel.
    pub fn with_guess_failure_every(mut self, k: usize) -> Self {
        assert!(k > 0, "failure period must be positive");
        self.fail_guess_every = Some(k);
        self
    }

    /// Dock announced by the last `TargetDock` request.
    pub fn target_dock(&self) -> Option<usize> {
        self.target_dock
    }

    /// Guesses graded so far.
    pub fn guesses_graded(&self) -> usize {
        self.guesses_graded
    }
}

impl SolverChannel for OracleSolverChannel {
    fn send(&mut self, request: SolverRequest) -> Result<(), TransportError> {
        match request {
            SolverRequest::TargetDock { dock_id } => {
                self.target_dock = Some(dock_id);
                Ok(())
            }
            SolverRequest::Guess { candidate } => {
                self.guess_sends += 1;
                if let Some(k) = self.fail_guess_every {
                    if self.guess_sends % k == 0 {
                        return Err(TransportError::SendFailed("injected failure".to_string()));
                    }
                }

                if self
                    .abort_after
                    .is_some_and(|limit| self.guesses_graded >= limit)
                {
                    self.pending = Some(SolverVerdict::Abort);
                    return Ok(());
                }

                self.guesses_graded += 1;
                let correct = match &self.secret {
                    Some(secret) => *secret == candidate,
                    None => true,
                };
                self.pending = Some(if correct {
                    SolverVerdict::Correct
                } else {
                    SolverVerdict::Incorrect
                });
                Ok(())
            }
        }
    }

    fn recv_verdict(&mut self) -> Result<SolverVerdict, TransportError> {
        self.pending
            .take()
            .ok_or_else(|| TransportError::ReceiveFailed("no verdict pending".to_string()))
    }
}
