//! # Error Handling
//!
//! Error types for TraceWeave pipelines.
//!
//! The taxonomy follows the failure model of an offline, single-pass
//! recording pipeline:
//!
//! - **Setup errors** are fatal and non-retryable: a sink that cannot open
//!   its backing file, a tee with an unassigned slot, a decimator with a zero
//!   period, an empty convolution kernel. They abort construction before the
//!   first step.
//! - **Runtime I/O errors** are fatal: a sink write or flush that fails
//!   mid-run aborts the run. Rows already written stay as-is; there is no
//!   rollback and no retry policy.
//!
//! Every error carries [`ComponentInfo`] naming the node that raised it, and
//! runtime failures carry an [`ErrorContext`] with the wall-clock timestamp
//! and the simulation time of the offending step.

use std::path::PathBuf;
use thiserror::Error;

/// Identifying information about a pipeline node, used in error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
  /// The configured name of the node (e.g. the sink's file stem).
  pub name: String,
  /// The node kind (e.g. `"sink"`, `"subsample"`).
  pub kind: String,
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo` with the given name and kind.
  pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: kind.into(),
    }
  }
}

impl std::fmt::Display for ComponentInfo {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.name, self.kind)
  }
}

/// Context captured when a runtime failure occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
  /// Wall-clock timestamp when the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// Simulation time of the sample being processed, if any.
  pub sim_time: Option<f64>,
  /// The node that encountered the error.
  pub component: ComponentInfo,
}

impl ErrorContext {
  /// Captures context for the named component at the current wall-clock time.
  pub fn capture(component: ComponentInfo, sim_time: Option<f64>) -> Self {
    Self {
      timestamp: chrono::Utc::now(),
      sim_time,
      component,
    }
  }
}

impl std::fmt::Display for ErrorContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.sim_time {
      Some(t) => write!(f, "{} at t={} ({})", self.component, t, self.timestamp),
      None => write!(f, "{} ({})", self.component, self.timestamp),
    }
  }
}

/// Errors raised during pipeline construction or per-step processing.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A sink could not open its backing file at construction.
  #[error("failed to open {path:?}: {source}")]
  Open {
    /// The path the sink tried to open.
    path: PathBuf,
    /// The underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A sink write failed mid-run. The run must be aborted.
  #[error("write failed in {context}: {source}")]
  Write {
    /// Where and when the write failed.
    context: ErrorContext,
    /// The underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A sink flush failed during teardown.
  #[error("flush failed in {context}: {source}")]
  Flush {
    /// Where and when the flush failed.
    context: ErrorContext,
    /// The underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A decimator was constructed with period zero.
  #[error("subsample period must be >= 1")]
  InvalidPeriod,

  /// A convolution was constructed with an empty coefficient kernel.
  #[error("convolution kernel must be non-empty")]
  EmptyKernel,

  /// A tee was finalized with one of its fixed slots never assigned.
  #[error("tee slot {slot} of {arity} was never assigned")]
  UnassignedSlot {
    /// Index of the unassigned slot.
    slot: usize,
    /// The tee's fixed arity.
    arity: usize,
  },

  /// A sink received a row whose width differs from the first row it wrote.
  #[error("row width changed in {component}: expected {expected}, got {got}")]
  RowWidth {
    /// The sink that rejected the row.
    component: ComponentInfo,
    /// Width latched from the first row.
    expected: usize,
    /// Width of the offending row.
    got: usize,
  },

  /// A recorder configuration value is out of range or non-finite.
  #[error("invalid recorder config: {0}")]
  InvalidConfig(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_component_info_display() {
    let info = ComponentInfo::new("bold", "sink");
    assert_eq!(info.to_string(), "bold (sink)");
  }

  #[test]
  fn test_error_context_carries_sim_time() {
    let ctx = ErrorContext::capture(ComponentInfo::new("lfp", "sink"), Some(12.5));
    assert_eq!(ctx.sim_time, Some(12.5));
    assert!(ctx.to_string().contains("t=12.5"));
  }

  #[test]
  fn test_write_error_preserves_source() {
    let err = PipelineError::Write {
      context: ErrorContext::capture(ComponentInfo::new("lfp", "sink"), Some(1.0)),
      source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"),
    };
    let text = err.to_string();
    assert!(text.contains("write failed"));
    assert!(text.contains("lfp (sink)"));
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn test_unassigned_slot_message() {
    let err = PipelineError::UnassignedSlot { slot: 1, arity: 3 };
    assert_eq!(err.to_string(), "tee slot 1 of 3 was never assigned");
  }
}
