use crate::auth::{AttemptOutcome, AuthCheck};
use crate::types::{Attempt, Login};
use crate::{Result, ScanError};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Mutable state of one scanning run: the successes found so far, how many
/// attempts were actually dispatched, and the cooperative cancellation
/// flag. All mutation goes through the single mutex.
#[derive(Debug, Default)]
pub struct SessionState {
    pub successes: Vec<Login>,
    pub dispatched: u64,
    pub cancelled: bool,
}

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub logins: Vec<Login>,
    pub dispatched: u64,
    pub early_exit: bool,
}

/// Runs authentication attempts over a bounded worker pool.
///
/// Workers are bounded by min(max_workers, total attempts). A permit is
/// acquired before each task is spawned, so dispatch follows the
/// generator's submission order exactly and at most `workers` tasks are
/// ever live; completion order is unspecified. Cancellation is
/// cooperative: once the early-exit flag fires, attempts that have not
/// started are never dispatched, while in-flight attempts run to
/// completion and are never force-killed.
pub struct AttemptScheduler {
    auth: Arc<dyn AuthCheck>,
    max_workers: usize,
    exit_on_first_success: bool,
    state: Arc<Mutex<SessionState>>,
}

impl AttemptScheduler {
    pub fn new(auth: Arc<dyn AuthCheck>, max_workers: usize, exit_on_first_success: bool) -> Self {
        Self::with_state(
            auth,
            max_workers,
            exit_on_first_success,
            Arc::new(Mutex::new(SessionState::default())),
        )
    }

    pub fn with_state(
        auth: Arc<dyn AuthCheck>,
        max_workers: usize,
        exit_on_first_success: bool,
        state: Arc<Mutex<SessionState>>,
    ) -> Self {
        Self {
            auth,
            max_workers,
            exit_on_first_success,
            state,
        }
    }

    /// Execute every attempt once, aggregate results, and return the
    /// summary. A `ScanError::Tooling` from the collaborator aborts the
    /// whole run; any other per-attempt error is logged and counted as a
    /// failed attempt.
    pub async fn run(
        &self,
        attempts: Vec<Attempt>,
        progress: Option<ProgressBar>,
    ) -> Result<RunSummary> {
        if attempts.is_empty() {
            return Ok(RunSummary {
                logins: Vec::new(),
                dispatched: 0,
                early_exit: false,
            });
        }

        let workers = self.max_workers.clamp(1, attempts.len());
        info!(
            "Attempting {} combinations with {} workers",
            attempts.len(),
            workers
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::unbounded_channel::<(Attempt, Result<AttemptOutcome>)>();

        for attempt in attempts {
            // Blocking on the permit here keeps dispatch in submission
            // order and caps live tasks at the pool size.
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            {
                let mut state = self.state.lock();
                if state.cancelled {
                    break;
                }
                state.dispatched += 1;
            }

            let auth = Arc::clone(&self.auth);
            let state = Arc::clone(&self.state);
            let tx = tx.clone();
            let progress = progress.clone();
            let exit_on_first_success = self.exit_on_first_success;

            tokio::spawn(async move {
                let _permit = permit;

                let outcome = auth.attempt(&attempt.host, &attempt.credential).await;

                // Flag cancellation before the permit drops so nothing
                // queued behind this worker starts dispatching.
                if exit_on_first_success && matches!(outcome, Ok(AttemptOutcome::Accepted)) {
                    state.lock().cancelled = true;
                }

                if let Some(pb) = &progress {
                    pb.inc(1);
                }

                let _ = tx.send((attempt, outcome));
            });
        }
        drop(tx);

        let mut early_exit = false;

        while let Some((attempt, outcome)) = rx.recv().await {
            match outcome {
                Ok(AttemptOutcome::Accepted) => {
                    let login = Login::from(&attempt);
                    info!(
                        "SUCCESSFUL LOGIN! {}@{}",
                        login.username, login.host
                    );
                    self.state.lock().successes.push(login.clone());

                    if self.exit_on_first_success {
                        early_exit = true;
                        if let Some(pb) = &progress {
                            pb.finish_and_clear();
                        }
                        if let Err(e) = self
                            .auth
                            .open_session(&login.host, &attempt.credential)
                            .await
                        {
                            warn!("Interactive session failed: {}", e);
                        }
                        break;
                    }
                }
                Ok(AttemptOutcome::Denied(detail)) => {
                    debug!(
                        "Failed login for {}@{}{}",
                        attempt.credential.username,
                        attempt.host,
                        detail.map(|d| format!(" ({})", d)).unwrap_or_default()
                    );
                }
                Err(ScanError::Tooling(message)) => {
                    if let Some(pb) = &progress {
                        pb.finish_and_clear();
                    }
                    return Err(ScanError::Tooling(message));
                }
                Err(e) => {
                    warn!(
                        "Error connecting to {} as {}: {}",
                        attempt.host, attempt.credential.username, e
                    );
                }
            }
        }

        if let Some(pb) = &progress {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }

        let state = self.state.lock();
        Ok(RunSummary {
            logins: state.successes.clone(),
            dispatched: state.dispatched,
            early_exit,
        })
    }
}
