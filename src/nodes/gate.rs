//! # Gate (column selection)
//!
//! Selects which of the sample's two vectors, state and coupling, continue
//! downstream. A suppressed vector arrives at the child as an empty slice;
//! timestamps always pass through. The gate never terminates the run itself:
//! it always forwards and returns the child's result.
//!
//! Typically wired at the root of a recording pipeline to strip the coupling
//! vector, since recorded observables are defined over state only.

use crate::error::PipelineError;
use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// Column gate with independent pass flags for state and coupling.
#[derive(Debug)]
pub struct Gate {
  pass_state: bool,
  pass_coupling: bool,
  next: Box<StreamNode>,
}

impl Gate {
  /// Creates a gate forwarding to `next`, passing each vector through only
  /// when its flag is set.
  pub fn new(pass_state: bool, pass_coupling: bool, next: impl Into<StreamNode>) -> Self {
    Self {
      pass_state,
      pass_coupling,
      next: Box::new(next.into()),
    }
  }

  /// Forwards a gated view of the sample and returns the child's result.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    let gated = Sample::new(
      sample.t,
      if self.pass_state { sample.state } else { &[] },
      if self.pass_coupling { sample.coupling } else { &[] },
    );
    self.next.apply(&gated)
  }

  /// Closes the downstream child.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    self.next.close()
  }
}

impl From<Gate> for StreamNode {
  fn from(gate: Gate) -> Self {
    StreamNode::Gate(gate)
  }
}
