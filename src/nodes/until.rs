//! # Until (time limit)
//!
//! Terminal node that polices a stop condition: once the sample timestamp
//! reaches the limit `tf`, every subsequent call answers [`Flow::Stop`].
//! It forwards nothing and owns nothing; it composes under a tee so one
//! branch can end the run while sibling branches keep recording.

use tracing::info;

use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// Stop-at-time-limit node. The boundary is inclusive: `t >= tf` stops.
#[derive(Debug, Clone, Copy)]
pub struct Until {
  tf: f64,
}

impl Until {
  /// Creates a time-limit node stopping at `tf`.
  pub fn new(tf: f64) -> Self {
    Self { tf }
  }

  /// The configured limit.
  pub fn limit(&self) -> f64 {
    self.tf
  }

  /// Returns [`Flow::Stop`] once `sample.t >= tf`, else [`Flow::Continue`].
  pub fn apply(&self, sample: &Sample<'_>) -> Flow {
    if sample.t >= self.tf {
      info!(t = sample.t, tf = self.tf, "time limit reached, stopping run");
      Flow::Stop
    } else {
      Flow::Continue
    }
  }
}

impl From<Until> for StreamNode {
  fn from(until: Until) -> Self {
    StreamNode::Until(until)
  }
}
