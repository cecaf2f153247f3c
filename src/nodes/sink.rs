//! # Row Sink
//!
//! Terminal node that appends one text row per observed sample to a backing
//! store: the timestamp, then one value per retained state dimension,
//! space-separated, one row per line. The coupling vector is never written;
//! recorded observables are defined over state only.
//!
//! The backing file is opened (or fails to open) at construction, so a bad
//! output path aborts setup before the first integration step. A write that
//! fails mid-run is fatal too: this is an offline, single-pass recording with
//! no recovery path for partial output. Rows already on disk stay as-is.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, error};

use crate::error::{ComponentInfo, ErrorContext, PipelineError};
use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// A terminal node that appends sample rows to a backing writer.
///
/// Construct with [`Sink::create`] for a file on disk, or
/// [`Sink::from_writer`] to record into any [`Write`] implementation
/// (used by tests to capture rows in memory).
pub struct Sink {
  name: String,
  writer: BufWriter<Box<dyn Write + Send>>,
  /// Row width latched from the first row written; `None` until then.
  width: Option<usize>,
  rows: u64,
}

impl Sink {
  /// Creates a sink backed by a new file at `path`.
  ///
  /// An existing file at `path` is truncated; rows are then append-only for
  /// the run's duration. Failure to open is a fatal setup error.
  pub fn create(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| {
      error!(path = %path.display(), error = %source, "failed to open sink file");
      PipelineError::Open {
        path: path.to_path_buf(),
        source,
      }
    })?;
    let name = path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());
    debug!(component = %name, path = %path.display(), "sink file opened");
    Ok(Self::from_writer(Box::new(file), name))
  }

  /// Creates a sink over an arbitrary writer, e.g. an in-memory buffer.
  pub fn from_writer(writer: Box<dyn Write + Send>, name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      writer: BufWriter::new(writer),
      width: None,
      rows: 0,
    }
  }

  /// The sink's name, used in logs and error reports.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Number of rows written so far.
  pub fn rows(&self) -> u64 {
    self.rows
  }

  fn component(&self) -> ComponentInfo {
    ComponentInfo::new(self.name.clone(), "sink")
  }

  /// Appends one row for `sample` and returns [`Flow::Continue`].
  ///
  /// The first row latches the sink's width; a later row with a different
  /// number of state values is rejected, since a width change mid-run means
  /// the tree above this sink is miswired.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    match self.width {
      None => self.width = Some(sample.state.len()),
      Some(expected) if expected != sample.state.len() => {
        return Err(PipelineError::RowWidth {
          component: self.component(),
          expected,
          got: sample.state.len(),
        });
      }
      Some(_) => {}
    }

    self
      .write_row(sample)
      .map_err(|source| {
        error!(component = %self.name, t = sample.t, error = %source, "sink write failed");
        PipelineError::Write {
          context: ErrorContext::capture(self.component(), Some(sample.t)),
          source,
        }
      })
      .map(|()| {
        self.rows += 1;
        Flow::Continue
      })
  }

  fn write_row(&mut self, sample: &Sample<'_>) -> std::io::Result<()> {
    write!(self.writer, "{}", sample.t)?;
    for value in sample.state {
      write!(self.writer, " {}", value)?;
    }
    writeln!(self.writer)
  }

  /// Flushes buffered rows to the backing store.
  ///
  /// Called once from pipeline teardown; safe to call again (a clean flush
  /// is idempotent). A flush failure is reported rather than swallowed;
  /// this is the one error `Drop` could not surface.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    self.writer.flush().map_err(|source| {
      error!(component = %self.name, error = %source, "sink flush failed");
      PipelineError::Flush {
        context: ErrorContext::capture(self.component(), None),
        source,
      }
    })
  }
}

impl std::fmt::Debug for Sink {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sink")
      .field("name", &self.name)
      .field("width", &self.width)
      .field("rows", &self.rows)
      .finish_non_exhaustive()
  }
}

impl From<Sink> for StreamNode {
  fn from(sink: Sink) -> Self {
    StreamNode::Sink(sink)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::nodes::testing::SharedBuf;
  use std::io::Read;
  use tempfile::NamedTempFile;

  #[test]
  fn test_sink_writes_one_row_per_apply() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut sink = Sink::create(temp_file.path()).unwrap();

    let first = Sample::new(0.5, &[1.0, 2.0], &[9.0]);
    let second = Sample::new(1.0, &[3.0, 4.0], &[9.0]);
    assert_eq!(sink.apply(&first).unwrap(), Flow::Continue);
    assert_eq!(sink.apply(&second).unwrap(), Flow::Continue);
    assert_eq!(sink.rows(), 2);
    sink.close().unwrap();

    let mut contents = String::new();
    File::open(temp_file.path())
      .unwrap()
      .read_to_string(&mut contents)
      .unwrap();
    // Coupling values never appear in the row.
    assert_eq!(contents, "0.5 1 2\n1 3 4\n");
  }

  #[test]
  fn test_sink_open_failure_is_fatal() {
    let result = Sink::create("/nonexistent-dir/never/out.txt");
    assert!(matches!(result, Err(PipelineError::Open { .. })));
  }

  #[test]
  fn test_sink_rejects_width_change() {
    let (buf, _) = SharedBuf::new();
    let mut sink = Sink::from_writer(Box::new(buf), "narrowing");

    sink.apply(&Sample::new(0.0, &[1.0, 2.0], &[])).unwrap();
    let result = sink.apply(&Sample::new(0.1, &[1.0], &[]));
    assert!(matches!(
      result,
      Err(PipelineError::RowWidth {
        expected: 2,
        got: 1,
        ..
      })
    ));
  }

  #[test]
  fn test_sink_write_failure_is_fatal() {
    use crate::nodes::testing::FailingWriter;
    let mut sink = Sink::from_writer(Box::new(FailingWriter), "full-disk");
    // A row large enough to overflow the internal buffer forces the failing
    // backing write to happen inside apply rather than at close.
    let state = vec![1.0; 10_000];
    let result = sink.apply(&Sample::new(0.0, &state, &[]));
    assert!(matches!(result, Err(PipelineError::Write { .. })));
  }

  #[test]
  fn test_sink_name_from_path_stem() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Sink::create(dir.path().join("bold.txt")).unwrap();
    assert_eq!(sink.name(), "bold");
  }

  #[test]
  fn test_sink_close_is_idempotent() {
    let (buf, handle) = SharedBuf::new();
    let mut sink = Sink::from_writer(Box::new(buf), "idempotent");
    sink.apply(&Sample::new(0.0, &[7.0], &[])).unwrap();
    sink.close().unwrap();
    sink.close().unwrap();
    assert_eq!(String::from_utf8(handle.lock().unwrap().clone()).unwrap(), "0 7\n");
  }
}
