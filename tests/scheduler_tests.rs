use async_trait::async_trait;
use parking_lot::Mutex;
use sshfinder::{
    auth::{AttemptOutcome, AuthCheck},
    combos,
    config::Config,
    probe::{LivenessProbe, PortProbe, ReachabilityFilter},
    report::RunReport,
    scheduler::AttemptScheduler,
    types::{Attempt, Credential},
    Result, ScanError,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Authenticator backed by an in-memory oracle of valid combinations.
struct MockAuth {
    valid: HashSet<(String, String, String)>,
    accept_all: bool,
    calls: Mutex<Vec<(String, String, String)>>,
    sessions_opened: Mutex<usize>,
    tooling_failure: bool,
}

impl MockAuth {
    fn new(valid: &[(&str, &str, &str)]) -> Self {
        Self {
            valid: valid
                .iter()
                .map(|(h, u, p)| (h.to_string(), u.to_string(), p.to_string()))
                .collect(),
            accept_all: false,
            calls: Mutex::new(Vec::new()),
            sessions_opened: Mutex::new(0),
            tooling_failure: false,
        }
    }

    fn accept_everything() -> Self {
        let mut auth = Self::new(&[]);
        auth.accept_all = true;
        auth
    }

    fn broken_tooling() -> Self {
        let mut auth = Self::new(&[]);
        auth.tooling_failure = true;
        auth
    }

    fn accepts(&self, host: &str, credential: &Credential) -> bool {
        self.accept_all
            || self.valid.contains(&(
                host.to_string(),
                credential.username.clone(),
                credential.password.clone(),
            ))
    }
}

#[async_trait]
impl AuthCheck for MockAuth {
    async fn attempt(&self, host: &str, credential: &Credential) -> Result<AttemptOutcome> {
        self.calls.lock().push((
            host.to_string(),
            credential.username.clone(),
            credential.password.clone(),
        ));

        if self.tooling_failure {
            return Err(ScanError::Tooling("sshpass is not installed".to_string()));
        }

        if self.accepts(host, credential) {
            Ok(AttemptOutcome::Accepted)
        } else {
            Ok(AttemptOutcome::Denied(None))
        }
    }

    async fn open_session(&self, _host: &str, _credential: &Credential) -> Result<()> {
        *self.sessions_opened.lock() += 1;
        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_scheduler_finds_the_valid_combination() -> Result<()> {
    let hosts = strings(&["10.0.0.1", "10.0.0.2"]);
    let users = strings(&["root"]);
    let passwords = strings(&["a", "b"]);
    let attempts = combos::generate(&hosts, &users, &passwords);

    let auth = Arc::new(MockAuth::new(&[("10.0.0.2", "root", "b")]));
    let scheduler = AttemptScheduler::new(auth.clone(), 4, false);
    let summary = scheduler.run(attempts.clone(), None).await?;

    assert_eq!(summary.dispatched, 4);
    assert!(!summary.early_exit);
    assert_eq!(summary.logins.len(), 1);
    assert_eq!(summary.logins[0].host, "10.0.0.2");
    assert_eq!(summary.logins[0].username, "root");
    assert_eq!(summary.logins[0].password, "b");

    // Every generated attempt was tried exactly once
    let calls = auth.calls.lock();
    assert_eq!(calls.len(), 4);
    let tried: HashSet<_> = calls.iter().cloned().collect();
    let expected: HashSet<_> = attempts
        .iter()
        .map(|a| {
            (
                a.host.clone(),
                a.credential.username.clone(),
                a.credential.password.clone(),
            )
        })
        .collect();
    assert_eq!(tried, expected);

    // No early exit means no interactive session
    assert_eq!(*auth.sessions_opened.lock(), 0);

    let report = RunReport::build(&summary.logins, summary.dispatched);
    assert_eq!(report.failed, 3);
    assert!(report.render(false).contains("Success rate: 25.00%"));
    Ok(())
}

#[tokio::test]
async fn test_scheduler_dispatches_in_generator_order() -> Result<()> {
    // A single worker serializes the run, so the recorded call sequence
    // must match the generated attempt sequence exactly.
    let attempts = combos::generate(
        &strings(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
        &strings(&["root", "admin"]),
        &strings(&["a", "b"]),
    );
    let expected: Vec<(String, String, String)> = attempts
        .iter()
        .map(|a| {
            (
                a.host.clone(),
                a.credential.username.clone(),
                a.credential.password.clone(),
            )
        })
        .collect();

    let auth = Arc::new(MockAuth::new(&[]));
    let scheduler = AttemptScheduler::new(auth.clone(), 1, false);
    scheduler.run(attempts, None).await?;

    assert_eq!(*auth.calls.lock(), expected);
    Ok(())
}

#[tokio::test]
async fn test_scheduler_without_matches_reports_all_failures() -> Result<()> {
    let attempts = combos::generate(
        &strings(&["10.0.0.1"]),
        &strings(&["root", "admin"]),
        &strings(&["a", "b", "c"]),
    );

    let auth = Arc::new(MockAuth::new(&[]));
    let scheduler = AttemptScheduler::new(auth.clone(), 2, false);
    let summary = scheduler.run(attempts, None).await?;

    assert!(summary.logins.is_empty());
    assert_eq!(summary.dispatched, 6);
    assert_eq!(auth.calls.lock().len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_scheduler_early_exit_stops_dispatching() -> Result<()> {
    // Every combination succeeds; with a single worker the first success
    // must cancel everything still queued behind it.
    let attempts = combos::generate(
        &strings(&["10.0.0.1", "10.0.0.2"]),
        &strings(&["root"]),
        &strings(&["a", "b"]),
    );

    let auth = Arc::new(MockAuth::accept_everything());
    let scheduler = AttemptScheduler::new(auth.clone(), 1, true);
    let summary = scheduler.run(attempts, None).await?;

    assert!(summary.early_exit);
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.logins.len(), 1);
    assert_eq!(auth.calls.lock().len(), 1);
    assert_eq!(*auth.sessions_opened.lock(), 1);
    Ok(())
}

#[tokio::test]
async fn test_scheduler_early_exit_opens_one_session_with_many_workers() -> Result<()> {
    let attempts = combos::generate(
        &strings(&["h1", "h2", "h3", "h4"]),
        &strings(&["root"]),
        &strings(&["a", "b"]),
    );
    let total = attempts.len() as u64;

    let auth = Arc::new(MockAuth::accept_everything());
    let scheduler = AttemptScheduler::new(auth.clone(), 8, true);
    let summary = scheduler.run(attempts, None).await?;

    assert!(summary.early_exit);
    assert!(!summary.logins.is_empty());
    assert!(summary.dispatched <= total);
    // Concurrent attempts may all succeed, but the hand-off happens once
    assert_eq!(*auth.sessions_opened.lock(), 1);
    Ok(())
}

#[tokio::test]
async fn test_scheduler_aborts_on_tooling_failure() {
    let attempts = vec![Attempt::new("10.0.0.1", "root", "a")];

    let auth = Arc::new(MockAuth::broken_tooling());
    let scheduler = AttemptScheduler::new(auth, 1, false);
    let result = scheduler.run(attempts, None).await;

    match result {
        Err(e @ ScanError::Tooling(_)) => {
            assert!(e.is_fatal());
            assert_eq!(e.exit_code(), 2);
        }
        other => panic!("Expected tooling error, got {:?}", other.map(|s| s.dispatched)),
    }
}

#[tokio::test]
async fn test_scheduler_handles_empty_attempt_list() -> Result<()> {
    let auth = Arc::new(MockAuth::new(&[]));
    let scheduler = AttemptScheduler::new(auth.clone(), 4, false);
    let summary = scheduler.run(Vec::new(), None).await?;

    assert!(summary.logins.is_empty());
    assert_eq!(summary.dispatched, 0);
    assert!(!summary.early_exit);
    assert!(auth.calls.lock().is_empty());
    Ok(())
}

/// Liveness probe answering from a fixed set, no network involved.
struct MockLiveness {
    alive: HashSet<String>,
}

#[async_trait]
impl LivenessProbe for MockLiveness {
    async fn is_alive(&self, host: &str, _limit: Duration) -> bool {
        self.alive.contains(host)
    }
}

struct MockPort {
    open: HashSet<String>,
}

#[async_trait]
impl PortProbe for MockPort {
    async fn is_open(&self, host: &str, _port: u16, _limit: Duration) -> bool {
        self.open.contains(host)
    }
}

fn filter_with(
    config: Config,
    alive: &[&str],
    open: &[&str],
) -> ReachabilityFilter {
    ReachabilityFilter::with_probes(
        config,
        Arc::new(MockLiveness {
            alive: alive.iter().map(|s| s.to_string()).collect(),
        }),
        Arc::new(MockPort {
            open: open.iter().map(|s| s.to_string()).collect(),
        }),
    )
}

#[tokio::test]
async fn test_filter_applies_liveness_then_port() -> Result<()> {
    let filter = filter_with(
        Config::default(),
        &["10.0.0.1", "10.0.0.2"],
        &["10.0.0.2", "10.0.0.3"],
    );

    let hosts = strings(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    let survivors = filter.filter(&hosts).await?;
    assert_eq!(survivors, strings(&["10.0.0.2"]));
    Ok(())
}

#[tokio::test]
async fn test_filter_skipping_both_stages_is_identity() -> Result<()> {
    let mut config = Config::default();
    config.discovery.skip_ping = true;
    config.discovery.skip_port_check = true;

    // No host is alive or open according to the probes, yet all survive
    let filter = filter_with(config, &[], &[]);
    let hosts = strings(&["10.0.0.1", "10.0.0.2"]);
    let survivors = filter.filter(&hosts).await?;
    assert_eq!(survivors, hosts);
    Ok(())
}

#[tokio::test]
async fn test_filter_errors_when_nothing_survives() {
    let filter = filter_with(Config::default(), &[], &[]);
    let result = filter.filter(&strings(&["10.0.0.1", "10.0.0.2"])).await;

    match result {
        Err(e @ ScanError::NoReachableHosts) => assert_eq!(e.exit_code(), 2),
        other => panic!("Expected no-reachable-hosts error, got {:?}", other.map(|h| h.len())),
    }
}

#[tokio::test]
async fn test_filter_preserves_order_on_concurrent_path() -> Result<()> {
    // More candidates than the sequential cutoff forces the parallel path
    let hosts: Vec<String> = (1..=12).map(|i| format!("10.0.0.{}", i)).collect();
    let alive: Vec<&str> = vec!["10.0.0.2", "10.0.0.5", "10.0.0.9", "10.0.0.11"];

    let mut config = Config::default();
    config.discovery.skip_port_check = true;

    let filter = filter_with(config, &alive, &[]);
    let survivors = filter.filter(&hosts).await?;
    assert_eq!(survivors, strings(&alive));
    Ok(())
}
