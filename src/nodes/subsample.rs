//! # Subsample (decimator)
//!
//! Forwards every `L`th sample to its child and drops the rest: fixed-stride
//! decimation from the integration rate down to a recording rate.
//!
//! The off-by-one contract is explicit and testable: the counter starts at
//! zero, so the first forwarded sample is the `L`th call, not the first.
//! The counter resets to zero on the same call that forwards, keeping it in
//! `[0, L)` at all times.

use tracing::debug;

use crate::error::PipelineError;
use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// Period-`L` decimation node.
#[derive(Debug)]
pub struct Subsample {
  period: u32,
  pos: u32,
  next: Box<StreamNode>,
}

impl Subsample {
  /// Creates a decimator with the given period and downstream child.
  ///
  /// A period of zero would never forward anything; it is rejected as a
  /// setup error.
  pub fn new(period: u32, next: impl Into<StreamNode>) -> Result<Self, PipelineError> {
    if period == 0 {
      return Err(PipelineError::InvalidPeriod);
    }
    debug!(period, "subsample node");
    Ok(Self {
      period,
      pos: 0,
      next: Box::new(next.into()),
    })
  }

  /// The decimation period `L`.
  pub fn period(&self) -> u32 {
    self.period
  }

  /// The call counter, always in `[0, L)`.
  pub fn position(&self) -> u32 {
    self.pos
  }

  /// Counts the call; on every `L`th call forwards to the child and returns
  /// its result, otherwise returns [`Flow::Continue`] without forwarding.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    self.pos += 1;
    if self.pos == self.period {
      self.pos = 0;
      return self.next.apply(sample);
    }
    Ok(Flow::Continue)
  }

  /// Closes the downstream child.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    self.next.close()
  }
}

impl From<Subsample> for StreamNode {
  fn from(subsample: Subsample) -> Self {
    StreamNode::Subsample(subsample)
  }
}
