//! The stepping contract driven by a [`Relaxer`](super::Relaxer).

/// A computation advanced one step at a time until it reports completion.
///
/// `step()` is never called concurrently with itself: the relaxer's worker
/// and its synchronous burst are the only callers, and never at once.
/// Readers observe the process only between steps.
pub trait IterativeProcess: Send {
    /// Returns true once no further steps are needed.
    fn done(&self) -> bool;

    /// Advances the process by one step.
    ///
    /// # Errors
    ///
    /// Any error ends the current run; the relaxer reports it through its
    /// status.
    fn step(&mut self) -> anyhow::Result<()>;
}

impl<P: IterativeProcess + ?Sized> IterativeProcess for Box<P> {
    fn done(&self) -> bool {
        (**self).done()
    }

    fn step(&mut self) -> anyhow::Result<()> {
        (**self).step()
    }
}
