//! # Pipeline
//!
//! The single owning handle for an output-processing tree.
//!
//! The tree is built bottom-up: leaves first, then each wrapping node takes
//! ownership of what it forwards to. The finished root is handed to a
//! [`Pipeline`]. The integration loop calls [`Pipeline::step`] once per
//! accepted step and stops stepping as soon as it sees
//! [`Flow::Stop`](crate::sample::Flow::Stop) or an error; either way it then
//! calls [`Pipeline::finish`] exactly once to flush and release every node.
//!
//! [`Pipeline::recorder`] builds the reference topology used by the
//! benchmark driver:
//!
//! ```text
//! gate(state only)
//!   └─ subsample(lfp_dt / dt)
//!        └─ tee ── until(tf)
//!               ├─ sink(lfp)
//!               └─ subsample(bold_dt / lfp_dt) ── convolve(hrf) ── sink(bold)
//! ```
//!
//! realizing two derived observables from one raw trajectory: a decimated
//! "LFP" trace and a convolved, further-decimated "BOLD" trace, with a time
//! limit policed independently of either recording branch.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::hrf;
use crate::node::StreamNode;
use crate::nodes::convolve::Convolve;
use crate::nodes::gate::Gate;
use crate::nodes::sink::Sink;
use crate::nodes::subsample::Subsample;
use crate::nodes::tee::Tee;
use crate::nodes::until::Until;
use crate::sample::{Flow, Sample};

/// Configuration for the reference recorder topology.
///
/// All tunables the pipeline needs are supplied here at construction time;
/// the pipeline itself reads no command line and no environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
  /// Integration step size of the driving engine.
  pub dt: f64,
  /// Run horizon: the time limit policed by the `until` branch.
  pub tf: f64,
  /// Sampling interval of the "LFP" trace; must be a multiple of `dt`.
  pub lfp_dt: f64,
  /// Sampling interval of the "BOLD" trace; must be a multiple of `lfp_dt`.
  pub bold_dt: f64,
  /// Number of hemodynamic kernel taps (sampled at `bold_dt`).
  pub hrf_len: usize,
  /// Destination file for the LFP trace.
  pub lfp_path: PathBuf,
  /// Destination file for the BOLD trace.
  pub bold_path: PathBuf,
}

impl RecorderConfig {
  /// Validates ranges and rate ratios, returning the two decimation periods
  /// `(lfp_dt / dt, bold_dt / lfp_dt)`.
  fn periods(&self) -> Result<(u32, u32), PipelineError> {
    for (name, value) in [
      ("dt", self.dt),
      ("tf", self.tf),
      ("lfp_dt", self.lfp_dt),
      ("bold_dt", self.bold_dt),
    ] {
      if !value.is_finite() || value <= 0.0 {
        return Err(PipelineError::InvalidConfig(format!(
          "{name} must be positive and finite, got {value}"
        )));
      }
    }
    if self.hrf_len == 0 {
      return Err(PipelineError::InvalidConfig(
        "hrf_len must be >= 1".to_string(),
      ));
    }
    let lfp_period = (self.lfp_dt / self.dt).round();
    let bold_period = (self.bold_dt / self.lfp_dt).round();
    if lfp_period < 1.0 || bold_period < 1.0 {
      return Err(PipelineError::InvalidConfig(format!(
        "sampling intervals must not increase the rate: dt={} lfp_dt={} bold_dt={}",
        self.dt, self.lfp_dt, self.bold_dt
      )));
    }
    Ok((lfp_period as u32, bold_period as u32))
  }
}

/// The owning handle for a constructed output tree.
///
/// Replaces ambient globals: the handle is created by setup, threaded
/// through the run loop, and consumed by teardown.
#[derive(Debug)]
pub struct Pipeline {
  root: StreamNode,
  stopped: bool,
}

impl Pipeline {
  /// Wraps an already-composed tree in a pipeline handle.
  pub fn from_root(root: impl Into<StreamNode>) -> Self {
    Self {
      root: root.into(),
      stopped: false,
    }
  }

  /// Builds the reference recorder topology described in the module docs.
  ///
  /// Sinks open their files here, so a bad output path fails setup before
  /// the engine takes a single step.
  pub fn recorder(config: &RecorderConfig) -> Result<Self, PipelineError> {
    let (lfp_period, bold_period) = config.periods()?;
    debug!(lfp_period, bold_period, hrf_len = config.hrf_len, "recorder periods");

    let kernel = hrf::volterra_kernel(config.hrf_len, config.bold_dt);
    let bold_sink = Sink::create(&config.bold_path)?;
    let bold_branch = Subsample::new(bold_period, Convolve::new(kernel, bold_sink)?)?;

    let tee = Tee::builder(3)
      .slot(0, Until::new(config.tf))
      .slot(1, Sink::create(&config.lfp_path)?)
      .slot(2, bold_branch)
      .build()?;

    let root = Gate::new(true, false, Subsample::new(lfp_period, tee)?);
    info!(
      tf = config.tf,
      lfp = %config.lfp_path.display(),
      bold = %config.bold_path.display(),
      "recorder pipeline ready"
    );
    Ok(Self::from_root(root))
  }

  /// Feeds one integration step through the tree.
  ///
  /// Returns the aggregated stop/continue signal; on `Err` the run must be
  /// aborted and [`Pipeline::finish`] called. Stepping again after `Stop`
  /// is a driver bug (the scheduler contract is to stop issuing steps) and
  /// is caught by a debug assertion.
  pub fn step(
    &mut self,
    t: f64,
    state: &[f64],
    coupling: &[f64],
  ) -> Result<Flow, PipelineError> {
    debug_assert!(!self.stopped, "step called after the pipeline signalled stop");
    let flow = self.root.apply(&Sample::new(t, state, coupling))?;
    if flow.is_stop() {
      self.stopped = true;
    }
    Ok(flow)
  }

  /// True once any step has returned [`Flow::Stop`].
  pub fn stopped(&self) -> bool {
    self.stopped
  }

  /// Tears the tree down: flushes every sink, releases every node.
  ///
  /// Consumes the pipeline, so teardown happens exactly once; dropping an
  /// unfinished pipeline still releases everything, but flush errors can
  /// only be reported here.
  pub fn finish(mut self) -> Result<(), PipelineError> {
    self.root.close()
  }
}
