//! # StreamNode
//!
//! The closed node type at the heart of the pipeline.
//!
//! The node set is deliberately closed: six kinds, one enum, one `match` in
//! [`StreamNode::apply`] and one in [`StreamNode::close`]. New node kinds are
//! rare and the per-step path is hot, so a tagged variant with exhaustive
//! dispatch beats trait objects here: adding a kind is a compile error until
//! every dispatch site handles it.
//!
//! ## Ownership
//!
//! A node exclusively owns its downstream node(s) as `Box<StreamNode>`
//! children. The tree is acyclic with a single root and no sharing: no node
//! is reachable through more than one parent. Dropping the root recursively
//! drops every node exactly once; [`StreamNode::close`] is the explicit
//! teardown pass that flushes sinks and can report the I/O errors `Drop`
//! would have to swallow.

use crate::error::PipelineError;
use crate::nodes::convolve::Convolve;
use crate::nodes::gate::Gate;
use crate::nodes::sink::Sink;
use crate::nodes::subsample::Subsample;
use crate::nodes::tee::Tee;
use crate::nodes::until::Until;
use crate::sample::{Flow, Sample};

/// One node in the output-processing tree.
///
/// Every variant implements the same contract: `apply` observes one sample
/// and answers with a [`Flow`] signal, and `close` tears down node-local
/// resources then the owned children, each exactly once.
#[derive(Debug)]
pub enum StreamNode {
  /// Fan-out to a fixed set of children, any-stop aggregation.
  Tee(Tee),
  /// Forward every `L`th sample, drop the rest.
  Subsample(Subsample),
  /// FIR-filter one state scalar and forward the filtered value.
  Convolve(Convolve),
  /// Signal stop once the timestamp reaches a limit.
  Until(Until),
  /// Pass or suppress the state and coupling columns.
  Gate(Gate),
  /// Append one row per sample to a backing file.
  Sink(Sink),
}

impl StreamNode {
  /// Observes one sample and returns the aggregated stop/continue signal.
  ///
  /// Called with monotonically non-decreasing `t` across a run, never
  /// reentrantly and never concurrently on the same tree. An `Err` is fatal:
  /// the caller must abort the run and proceed to teardown.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    match self {
      StreamNode::Tee(tee) => tee.apply(sample),
      StreamNode::Subsample(subsample) => subsample.apply(sample),
      StreamNode::Convolve(convolve) => convolve.apply(sample),
      StreamNode::Until(until) => Ok(until.apply(sample)),
      StreamNode::Gate(gate) => gate.apply(sample),
      StreamNode::Sink(sink) => sink.apply(sample),
    }
  }

  /// Releases node-local resources, then closes owned children.
  ///
  /// Sinks flush and report errors here; pure nodes only recurse. Every
  /// child is visited even if an earlier one failed; the first error is
  /// returned after the pass completes, so no sink is left unflushed because
  /// a sibling's disk filled up.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    match self {
      StreamNode::Tee(tee) => tee.close(),
      StreamNode::Subsample(subsample) => subsample.close(),
      StreamNode::Convolve(convolve) => convolve.close(),
      StreamNode::Until(_) => Ok(()),
      StreamNode::Gate(gate) => gate.close(),
      StreamNode::Sink(sink) => sink.close(),
    }
  }

  /// The node kind as a short static label, used in logs and errors.
  pub fn kind(&self) -> &'static str {
    match self {
      StreamNode::Tee(_) => "tee",
      StreamNode::Subsample(_) => "subsample",
      StreamNode::Convolve(_) => "convolve",
      StreamNode::Until(_) => "until",
      StreamNode::Gate(_) => "gate",
      StreamNode::Sink(_) => "sink",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_kind_labels() {
    let node = StreamNode::Until(Until::new(1.0));
    assert_eq!(node.kind(), "until");
  }

  #[test]
  fn test_terminal_close_is_a_no_op() {
    let mut node = StreamNode::Until(Until::new(1.0));
    assert!(node.close().is_ok());
  }
}
