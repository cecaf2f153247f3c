//! # Tee (fan-out)
//!
//! Duplicates one incoming sample to a fixed set of independent downstream
//! branches. Arity is fixed at construction and every slot must be assigned
//! before the tee can be built; an unassigned slot is a setup error, not a
//! runtime surprise.
//!
//! Children are visited in slot order on every call, so ordering-sensitive
//! branches (file writes) behave deterministically across runs. Aggregation
//! is any-stop: one branch signalling termination halts the whole run, even
//! though its siblings still observed the sample. The tee never
//! short-circuits within a single call.

use tracing::debug;

use crate::error::PipelineError;
use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// Fan-out node with a fixed, fully-assigned set of children.
#[derive(Debug)]
pub struct Tee {
  children: Vec<StreamNode>,
}

impl Tee {
  /// Starts building a tee with `arity` output slots.
  pub fn builder(arity: usize) -> TeeBuilder {
    TeeBuilder::new(arity)
  }

  /// The number of children, equal to the arity fixed at construction.
  pub fn arity(&self) -> usize {
    self.children.len()
  }

  /// Forwards the identical sample to every child, in slot order.
  ///
  /// All children are visited before the results are aggregated; a `Stop`
  /// from an early slot does not spare later slots the sample. An `Err`
  /// from any child is fatal and propagates immediately; the run is over
  /// either way.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    let mut flow = Flow::Continue;
    for child in &mut self.children {
      flow = flow.and(child.apply(sample)?);
    }
    Ok(flow)
  }

  /// Closes every child, visiting all of them even if one fails.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    let mut first_error = None;
    for child in &mut self.children {
      if let Err(error) = child.close()
        && first_error.is_none()
      {
        first_error = Some(error);
      }
    }
    match first_error {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }
}

impl From<Tee> for StreamNode {
  fn from(tee: Tee) -> Self {
    StreamNode::Tee(tee)
  }
}

/// Builder that enforces full slot assignment before a [`Tee`] exists.
#[derive(Debug)]
pub struct TeeBuilder {
  slots: Vec<Option<StreamNode>>,
}

impl TeeBuilder {
  /// Creates a builder with `arity` empty slots.
  pub fn new(arity: usize) -> Self {
    Self {
      slots: (0..arity).map(|_| None).collect(),
    }
  }

  /// Assigns an already-constructed child to `slot`.
  ///
  /// Reassigning a slot replaces the previous child.
  ///
  /// # Panics
  ///
  /// Panics if `slot` is outside the arity fixed at construction.
  pub fn slot(mut self, slot: usize, child: impl Into<StreamNode>) -> Self {
    assert!(
      slot < self.slots.len(),
      "tee slot {} out of range for arity {}",
      slot,
      self.slots.len()
    );
    self.slots[slot] = Some(child.into());
    self
  }

  /// Finalizes the tee, failing if any slot was never assigned.
  pub fn build(self) -> Result<Tee, PipelineError> {
    let arity = self.slots.len();
    let mut children = Vec::with_capacity(arity);
    for (index, slot) in self.slots.into_iter().enumerate() {
      match slot {
        Some(child) => children.push(child),
        None => return Err(PipelineError::UnassignedSlot { slot: index, arity }),
      }
    }
    debug!(arity, "tee assembled");
    Ok(Tee { children })
  }
}
