//! Tests for the relaxer lifecycle.

use std::time::{Duration, Instant};

use anyhow::bail;

use super::process::IterativeProcess;
use super::relaxer::{Relaxer, RelaxerState};
use crate::config::RelaxerConfig;
use crate::error::Error;

/// Counts steps; done after `limit` steps, fails on step `fail_at`.
#[derive(Debug, Default)]
struct Counter {
    steps: u64,
    limit: Option<u64>,
    fail_at: Option<u64>,
}

impl IterativeProcess for Counter {
    fn done(&self) -> bool {
        self.limit.is_some_and(|limit| self.steps >= limit)
    }

    fn step(&mut self) -> anyhow::Result<()> {
        if self.fail_at == Some(self.steps) {
            bail!("diverged at step {}", self.steps);
        }
        self.steps += 1;
        Ok(())
    }
}

/// Completion check that always panics.
struct PanickyCheck;

impl IterativeProcess for PanickyCheck {
    fn done(&self) -> bool {
        panic!("no completion criterion");
    }

    fn step(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn fast_config() -> RelaxerConfig {
    RelaxerConfig {
        sleep_ms: 1,
        prerelax_budget_ms: 50,
        stop_grace_ms: 2000,
    }
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn test_new_relaxer_is_idle() {
    let relaxer = Relaxer::new(Counter::default());
    let status = relaxer.status();
    assert_eq!(status.state, RelaxerState::Idle);
    assert_eq!(status.steps, 0);
    assert!(status.last_error.is_none());
    assert!(!relaxer.is_running());
    assert_eq!(relaxer.sleep_time(), Duration::from_millis(100));
}

#[test]
fn test_prerelax_stops_when_done() {
    let mut relaxer = Relaxer::with_config(
        Counter {
            limit: Some(25),
            ..Counter::default()
        },
        fast_config(),
    );
    assert_eq!(relaxer.prerelax().unwrap(), 25);
    assert_eq!(relaxer.with_process(|p| p.steps), 25);
    assert_eq!(relaxer.status().steps, 25);
    assert_eq!(relaxer.status().state, RelaxerState::Idle);
}

#[test]
fn test_prerelax_respects_budget() {
    let config = RelaxerConfig {
        prerelax_budget_ms: 20,
        ..fast_config()
    };
    let mut relaxer = Relaxer::with_config(Counter::default(), config);

    let started = Instant::now();
    let steps = relaxer.prerelax().unwrap();
    assert!(steps > 0);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_zero_budget_prerelax_takes_no_step() {
    let config = RelaxerConfig {
        prerelax_budget_ms: 0,
        ..fast_config()
    };
    let mut relaxer = Relaxer::with_config(Counter::default(), config);
    assert_eq!(relaxer.prerelax().unwrap(), 0);
}

#[test]
fn test_prerelax_while_running_is_misuse() {
    let mut relaxer = Relaxer::with_config(Counter::default(), fast_config());
    relaxer.relax();
    assert!(matches!(
        relaxer.prerelax(),
        Err(Error::ConcurrencyMisuse(_))
    ));
    relaxer.stop();
}

#[test]
fn test_prerelax_failure_is_recorded() {
    let mut relaxer = Relaxer::with_config(
        Counter {
            fail_at: Some(3),
            ..Counter::default()
        },
        fast_config(),
    );
    let err = relaxer.prerelax().unwrap_err();
    assert!(matches!(err, Error::StepFailed(ref m) if m.contains("diverged at step 3")));

    let status = relaxer.status();
    assert_eq!(status.state, RelaxerState::Failed);
    assert_eq!(status.steps, 3);
}

#[test]
fn test_background_run_until_done() {
    let mut relaxer = Relaxer::with_config(
        Counter {
            limit: Some(10),
            ..Counter::default()
        },
        fast_config(),
    );
    relaxer.relax();

    assert!(wait_for(|| !relaxer.is_running()));
    assert_eq!(relaxer.status().state, RelaxerState::Stopped);
    assert_eq!(relaxer.with_process(|p| p.steps), 10);
}

#[test]
fn test_pause_and_resume() {
    let mut relaxer = Relaxer::with_config(Counter::default(), fast_config());
    relaxer.relax();
    assert!(wait_for(|| relaxer.with_process(|p| p.steps) > 0));

    relaxer.pause();
    assert_eq!(relaxer.status().state, RelaxerState::Paused);

    // At most one in-flight step completes after pausing.
    std::thread::sleep(Duration::from_millis(20));
    let frozen = relaxer.with_process(|p| p.steps);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(relaxer.with_process(|p| p.steps), frozen);

    relaxer.resume().unwrap();
    assert_eq!(relaxer.status().state, RelaxerState::Running);
    assert!(wait_for(|| relaxer.with_process(|p| p.steps) > frozen));

    relaxer.stop();
    assert_eq!(relaxer.status().state, RelaxerState::Stopped);
}

#[test]
fn test_relax_restarts_a_running_relaxer() {
    let mut relaxer = Relaxer::with_config(Counter::default(), fast_config());
    relaxer.relax();
    assert!(wait_for(|| relaxer.with_process(|p| p.steps) > 2));

    relaxer.relax();
    assert!(relaxer.is_running());
    let before = relaxer.with_process(|p| p.steps);
    assert!(wait_for(|| relaxer.with_process(|p| p.steps) > before));
    relaxer.stop();
    assert!(!relaxer.is_running());
}

#[test]
fn test_set_sleep_time() {
    let mut relaxer = Relaxer::with_config(Counter::default(), fast_config());
    relaxer.set_sleep_time(Duration::from_millis(42));
    assert_eq!(relaxer.sleep_time(), Duration::from_millis(42));
    assert_eq!(relaxer.config().sleep_ms, 42);
}

#[test]
fn test_long_sleep_is_interrupted_by_stop() {
    let config = RelaxerConfig {
        sleep_ms: 60_000,
        ..fast_config()
    };
    let mut relaxer = Relaxer::with_config(Counter::default(), config);
    relaxer.relax();
    assert!(wait_for(|| relaxer.status().steps == 1));

    let started = Instant::now();
    relaxer.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!relaxer.is_running());
}

#[test]
fn test_into_process_returns_state() {
    let mut relaxer = Relaxer::with_config(
        Counter {
            limit: Some(4),
            ..Counter::default()
        },
        fast_config(),
    );
    relaxer.prerelax().unwrap();
    let process = relaxer.into_process().unwrap();
    assert_eq!(process.steps, 4);
}

#[test]
fn test_into_process_with_live_handle_is_misuse() {
    let relaxer = Relaxer::new(Counter::default());
    let handle = relaxer.process_handle();
    assert!(matches!(
        relaxer.into_process(),
        Err(Error::ConcurrencyMisuse(_))
    ));
    assert_eq!(handle.lock().steps, 0);
}

#[test]
fn test_prerelax_done_panic_is_step_failure() {
    let mut relaxer = Relaxer::with_config(PanickyCheck, fast_config());
    let err = relaxer.prerelax().unwrap_err();
    assert!(matches!(err, Error::StepFailed(ref m) if m.contains("no completion criterion")));
    assert_eq!(relaxer.status().state, RelaxerState::Failed);
    assert!(!relaxer.is_running());
}

#[test]
fn test_background_done_panic_clears_running() {
    let mut relaxer = Relaxer::with_config(PanickyCheck, fast_config());
    relaxer.relax();
    assert!(wait_for(|| !relaxer.is_running()));

    let status = relaxer.status();
    assert_eq!(status.state, RelaxerState::Failed);
    assert_eq!(status.steps, 0);
    assert!(status.last_error.is_some());

    // A new run starts cleanly after the failure.
    relaxer.relax();
    assert!(wait_for(|| !relaxer.is_running()));
    assert_eq!(relaxer.status().state, RelaxerState::Failed);
}
