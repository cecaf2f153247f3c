//! # Sample and Flow
//!
//! The per-step data model shared by every node in the pipeline.
//!
//! A [`Sample`] is a borrowed view of one integration step: the timestamp,
//! the state vector, and the coupling vector. It is valid only for the
//! duration of a single `apply` call; any node that needs history (the FIR
//! convolution, for example) must copy the scalars it cares about into its
//! own buffer before returning.
//!
//! [`Flow`] is the two-valued result every `apply` returns: keep stepping,
//! or stop the run. Composite nodes aggregate it upward; the integration
//! loop treats `Stop` as "schedule no further steps".

/// A borrowed view of one simulation step.
///
/// The engine owns the underlying buffers; the pipeline only reads them.
/// Nodes that rewrite the sample on the way down (gate, convolution) build a
/// new `Sample` over their own storage and pass that to their child.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
  /// Simulation time of this step.
  pub t: f64,
  /// State vector, length `nx`. May be empty when a gate suppressed it.
  pub state: &'a [f64],
  /// Coupling vector, length `nc`. May be empty when a gate suppressed it.
  pub coupling: &'a [f64],
}

impl<'a> Sample<'a> {
  /// Creates a sample view over engine-owned buffers.
  pub fn new(t: f64, state: &'a [f64], coupling: &'a [f64]) -> Self {
    Self { t, state, coupling }
  }
}

/// The stop/continue signal returned by every `apply` call.
///
/// `Stop` is not an error: it is the normal way a branch (typically a time
/// limit) tells the integration loop that the run is complete. Aggregation
/// is any-stop: a tee returns `Stop` if any child did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  /// Keep issuing steps.
  Continue,
  /// Stop the run; no further `apply` calls should be made.
  Stop,
}

impl Flow {
  /// Returns `true` if this signal requests termination.
  pub fn is_stop(self) -> bool {
    matches!(self, Flow::Stop)
  }

  /// Combines two signals: `Stop` wins.
  pub fn and(self, other: Flow) -> Flow {
    if self.is_stop() || other.is_stop() {
      Flow::Stop
    } else {
      Flow::Continue
    }
  }
}
