//! Worker-thread scheduler with pause/resume/stop control.
//!
//! Control flags live in one mutex-guarded block paired with a condition
//! variable. Every flag change is followed by `notify_all`, and every wait
//! re-checks the flags afterwards, so lost and spurious wake-ups are both
//! harmless. The pacing sleep waits on the same condition variable, which
//! lets `stop()` cut it short.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;

use crate::config::RelaxerConfig;
use crate::error::{Error, Result};

use super::process::IterativeProcess;

/// Lifecycle state of a [`Relaxer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxerState {
    /// No background run has been started.
    Idle,
    /// The worker is stepping the process.
    Running,
    /// The worker is alive but suspended.
    Paused,
    /// The last run ended through `stop()` or because the process was done.
    Stopped,
    /// The last run ended because `step()` failed, or `step()` or `done()`
    /// panicked.
    Failed,
}

/// Snapshot returned by [`Relaxer::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelaxerStatus {
    /// Current lifecycle state.
    pub state: RelaxerState,
    /// Successful steps since the relaxer was created.
    pub steps: u64,
    /// Message of the last step failure, cleared when a new run starts.
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct Control {
    suspended: bool,
    stop: bool,
    /// True from spawn until the worker has left its loop.
    running: bool,
    /// Outcome of the last finished run (Idle before the first one).
    outcome: RelaxerState,
    steps: u64,
    last_error: Option<String>,
    sleep: Duration,
}

#[derive(Debug)]
struct Shared {
    control: Mutex<Control>,
    wake: Condvar,
}

impl Shared {
    fn stop_requested(&self) -> bool {
        self.control.lock().stop
    }

    /// Blocks while suspended. Returns false if a stop was requested.
    fn wait_while_suspended(&self) -> bool {
        let mut control = self.control.lock();
        while control.suspended && !control.stop {
            self.wake.wait(&mut control);
        }
        !control.stop
    }

    /// Counts a finished step and returns the pacing interval, or `None` if
    /// a stop arrived during the step.
    fn finish_step(&self) -> Option<Duration> {
        let mut control = self.control.lock();
        control.steps += 1;
        (!control.stop).then_some(control.sleep)
    }

    /// Sleeps for `interval` unless a stop arrives first.
    fn pace(&self, interval: Duration) {
        let deadline = Instant::now() + interval;
        let mut control = self.control.lock();
        while !control.stop {
            if self.wake.wait_until(&mut control, deadline).timed_out() {
                break;
            }
        }
    }

    fn record_failure(&self, message: String) {
        let mut control = self.control.lock();
        control.outcome = RelaxerState::Failed;
        control.last_error = Some(message);
    }
}

struct Worker {
    handle: JoinHandle<()>,
    /// Disconnects when the worker thread exits, panicking or not.
    exited: Receiver<()>,
}

/// Drives an [`IterativeProcess`] on a background thread.
///
/// At most one worker exists per relaxer. The process is shared with the
/// worker behind a mutex that is held only for one `done()` or `step()` at
/// a time; [`Relaxer::with_process`] reads it between steps.
///
/// Dropping the relaxer stops the worker.
pub struct Relaxer<P: IterativeProcess + 'static> {
    process: Arc<Mutex<P>>,
    shared: Arc<Shared>,
    config: RelaxerConfig,
    worker: Option<Worker>,
}

impl<P: IterativeProcess + 'static> Relaxer<P> {
    /// Creates an idle relaxer with the default configuration.
    #[must_use]
    pub fn new(process: P) -> Self {
        Self::with_config(process, RelaxerConfig::default())
    }

    /// Creates an idle relaxer.
    #[must_use]
    pub fn with_config(process: P, config: RelaxerConfig) -> Self {
        let control = Control {
            suspended: false,
            stop: false,
            running: false,
            outcome: RelaxerState::Idle,
            steps: 0,
            last_error: None,
            sleep: config.sleep_time(),
        };
        Self {
            process: Arc::new(Mutex::new(process)),
            shared: Arc::new(Shared {
                control: Mutex::new(control),
                wake: Condvar::new(),
            }),
            config,
            worker: None,
        }
    }

    /// Starts a fresh background run.
    ///
    /// A previous run is stopped and joined first, so there is never more
    /// than one worker.
    pub fn relax(&mut self) {
        if self.worker.is_some() {
            self.stop();
            self.join_worker();
        }

        {
            let mut control = self.shared.control.lock();
            control.stop = false;
            control.suspended = false;
            control.running = true;
            control.last_error = None;
        }

        let (exit_tx, exit_rx) = crossbeam_channel::bounded(1);
        let process = Arc::clone(&self.process);
        let shared = Arc::clone(&self.shared);
        let handle = thread::spawn(move || run_worker(&process, &shared, exit_tx));

        self.worker = Some(Worker {
            handle,
            exited: exit_rx,
        });
        tracing::info!(sleep_ms = self.config.sleep_ms, "Relaxer started");
    }

    /// Steps the process synchronously, without pacing, until it is done or
    /// the configured budget elapses. Returns the number of steps taken.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConcurrencyMisuse` if a background run is active and
    /// `Error::StepFailed` if a step fails or `step()`/`done()` panics; the
    /// failure is also recorded in [`Relaxer::status`].
    pub fn prerelax(&mut self) -> Result<u64> {
        if self.is_running() {
            return Err(Error::ConcurrencyMisuse(
                "prerelax() called while a background run is active".to_string(),
            ));
        }

        let deadline = Instant::now() + self.config.prerelax_budget();
        let mut steps = 0u64;
        let mut process = self.process.lock();
        while Instant::now() < deadline {
            let outcome = match guarded_done(&*process) {
                Ok(true) => break,
                Ok(false) => guarded_step(&mut *process),
                Err(message) => Err(message),
            };
            if let Err(message) = outcome {
                drop(process);
                self.shared.control.lock().steps += steps;
                tracing::error!(steps, error = %message, "Prerelax step failed");
                self.shared.record_failure(message.clone());
                return Err(Error::StepFailed(message));
            }
            steps += 1;
        }
        drop(process);

        self.shared.control.lock().steps += steps;
        tracing::debug!(steps, "Prerelax burst finished");
        Ok(steps)
    }

    /// Suspends the background run at its next loop iteration.
    ///
    /// Has no effect when no run is active.
    pub fn pause(&self) {
        let mut control = self.shared.control.lock();
        if control.running {
            control.suspended = true;
            self.shared.wake.notify_all();
            tracing::debug!("Relaxer paused");
        }
    }

    /// Wakes a paused run. A relaxer with no active run is started instead,
    /// with a [`Relaxer::prerelax`] burst followed by [`Relaxer::relax`].
    ///
    /// # Errors
    ///
    /// Propagates a failing prerelax step; the background run is then not
    /// started.
    pub fn resume(&mut self) -> Result<()> {
        let running = {
            let mut control = self.shared.control.lock();
            control.suspended = false;
            self.shared.wake.notify_all();
            control.running
        };
        if running {
            tracing::debug!("Relaxer resumed");
            return Ok(());
        }
        self.prerelax()?;
        self.relax();
        Ok(())
    }

    /// Requests the worker to stop and waits up to the configured grace
    /// period for it to exit.
    ///
    /// Interrupts a paused worker and a pacing sleep. A worker still inside
    /// a long `step()` when the grace period ends will stop after that step;
    /// the next [`Relaxer::relax`] waits for it. Calling `stop()` again is
    /// harmless.
    pub fn stop(&mut self) {
        {
            let mut control = self.shared.control.lock();
            if !control.running && self.worker.is_none() {
                return;
            }
            control.stop = true;
            control.suspended = false;
            self.shared.wake.notify_all();
        }

        let Some(worker) = self.worker.take() else {
            return;
        };
        match worker.exited.recv_timeout(self.config.stop_grace()) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if worker.handle.join().is_err() {
                    tracing::error!("Relaxer worker thread panicked outside of step()");
                }
                tracing::info!(steps = self.status().steps, "Relaxer stopped");
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    grace_ms = self.config.stop_grace_ms,
                    "Relaxer worker did not exit within the grace period"
                );
                self.worker = Some(worker);
            }
        }
    }

    /// Returns true while a worker is inside its loop (running or paused).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.control.lock().running
    }

    /// Returns the current state, step count and last failure.
    #[must_use]
    pub fn status(&self) -> RelaxerStatus {
        let control = self.shared.control.lock();
        let state = match (control.running, control.suspended) {
            (true, true) => RelaxerState::Paused,
            (true, false) => RelaxerState::Running,
            (false, _) => control.outcome,
        };
        RelaxerStatus {
            state,
            steps: control.steps,
            last_error: control.last_error.clone(),
        }
    }

    /// Sets the pacing interval; a running worker uses it from its next
    /// sleep on.
    pub fn set_sleep_time(&mut self, sleep: Duration) {
        self.config.sleep_ms = u64::try_from(sleep.as_millis()).unwrap_or(u64::MAX);
        self.shared.control.lock().sleep = sleep;
    }

    /// Returns the pacing interval.
    #[must_use]
    pub fn sleep_time(&self) -> Duration {
        self.shared.control.lock().sleep
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &RelaxerConfig {
        &self.config
    }

    /// Runs `f` with the process locked, between two steps.
    pub fn with_process<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.process.lock())
    }

    /// Returns a handle for readers on other threads.
    ///
    /// Holders must not call `step()` themselves while a run is active.
    #[must_use]
    pub fn process_handle(&self) -> Arc<Mutex<P>> {
        Arc::clone(&self.process)
    }

    /// Stops the relaxer, waits for the worker to exit and returns the
    /// process.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConcurrencyMisuse` if a handle obtained from
    /// [`Relaxer::process_handle`] is still alive.
    pub fn into_process(mut self) -> Result<P> {
        self.stop();
        self.join_worker();
        let process = Arc::clone(&self.process);
        drop(self);
        Arc::try_unwrap(process)
            .map(Mutex::into_inner)
            .map_err(|_| {
                Error::ConcurrencyMisuse("process handle is still shared".to_string())
            })
    }

    /// Waits without a deadline for a worker left behind by a timed-out
    /// `stop()`.
    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                tracing::error!("Relaxer worker thread panicked outside of step()");
            }
        }
    }
}

impl<P: IterativeProcess + 'static> Drop for Relaxer<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<P: IterativeProcess + 'static> fmt::Debug for Relaxer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relaxer")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Worker entry point. `_exited` is dropped on return, after the exit
/// guard has cleared `running`, which disconnects the receiver `stop()`
/// waits on.
#[allow(clippy::needless_pass_by_value)]
fn run_worker<P: IterativeProcess>(process: &Mutex<P>, shared: &Shared, _exited: Sender<()>) {
    let mut exit = WorkerExit {
        shared,
        result: None,
    };
    exit.result = Some(drive(process, shared));
}

/// Publishes the end of a run on every exit path of the worker, unwinding
/// included.
struct WorkerExit<'a> {
    shared: &'a Shared,
    result: Option<std::result::Result<(), String>>,
}

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        let mut control = self.shared.control.lock();
        control.running = false;
        control.suspended = false;
        match self.result.take() {
            Some(Ok(())) => control.outcome = RelaxerState::Stopped,
            Some(Err(message)) => {
                tracing::error!(steps = control.steps, error = %message, "Relaxer step failed");
                control.outcome = RelaxerState::Failed;
                control.last_error = Some(message);
            }
            None => {
                tracing::error!(steps = control.steps, "Relaxer worker unwound");
                control.outcome = RelaxerState::Failed;
                control.last_error = Some("relaxer worker panicked".to_string());
            }
        }
        self.shared.wake.notify_all();
    }
}

fn drive<P: IterativeProcess>(
    process: &Mutex<P>,
    shared: &Shared,
) -> std::result::Result<(), String> {
    loop {
        if shared.stop_requested() || guarded_done(&*process.lock())? {
            return Ok(());
        }
        if !shared.wait_while_suspended() {
            return Ok(());
        }

        guarded_step(&mut *process.lock())?;

        let Some(interval) = shared.finish_step() else {
            return Ok(());
        };
        shared.pace(interval);
    }
}

/// Asks the process whether it is done, turning a panic into a message.
fn guarded_done<P: IterativeProcess + ?Sized>(process: &P) -> std::result::Result<bool, String> {
    panic::catch_unwind(AssertUnwindSafe(|| process.done()))
        .map_err(|payload| format!("done() panicked: {}", panic_message(payload.as_ref())))
}

/// Runs one step, turning both errors and panics into a message.
fn guarded_step<P: IterativeProcess + ?Sized>(process: &mut P) -> std::result::Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| process.step())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(format!("step panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
