//! Background relaxation of iterative processes.
//!
//! A [`Relaxer`] owns an [`IterativeProcess`] and steps it on a dedicated
//! worker thread with a pacing interval between steps, under
//! pause/resume/stop control. A synchronous [`Relaxer::prerelax`] burst can
//! settle the process before background pacing starts.
//!
//! # Example
//!
//! ```rust
//! use graphweave_core::relax::{IterativeProcess, Relaxer, RelaxerState};
//!
//! struct Countdown(u32);
//!
//! impl IterativeProcess for Countdown {
//!     fn done(&self) -> bool {
//!         self.0 == 0
//!     }
//!
//!     fn step(&mut self) -> anyhow::Result<()> {
//!         self.0 -= 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut relaxer = Relaxer::new(Countdown(10));
//! let steps = relaxer.prerelax()?;
//! assert_eq!(steps, 10);
//! assert!(relaxer.with_process(|p| p.done()));
//! assert_eq!(relaxer.status().state, RelaxerState::Idle);
//! # Ok::<(), graphweave_core::Error>(())
//! ```

mod process;
mod relaxer;

#[cfg(test)]
mod relaxer_tests;

pub use process::IterativeProcess;
pub use relaxer::{Relaxer, RelaxerState, RelaxerStatus};
