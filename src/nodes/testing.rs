//! Shared helpers for node tests: in-memory writers that let tests observe
//! what reached a sink, and a drop-counting writer for teardown accounting.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A writer over a shared byte buffer, so tests can read back what a sink
/// wrote after the sink (or the whole tree) has been consumed.
pub(crate) struct SharedBuf {
  buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuf {
  /// Returns the writer and a handle to the bytes it accumulates.
  pub(crate) fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    (Self { buf: buf.clone() }, buf)
  }
}

impl Write for SharedBuf {
  fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
    self.buf.lock().unwrap().extend_from_slice(data);
    Ok(data.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

/// A writer that counts its own drop, for verifying that tearing down a tree
/// releases every sink exactly once.
pub(crate) struct CountingWriter {
  drops: Arc<AtomicUsize>,
}

impl CountingWriter {
  pub(crate) fn new(drops: Arc<AtomicUsize>) -> Self {
    Self { drops }
  }
}

impl Write for CountingWriter {
  fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
    Ok(data.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

impl Drop for CountingWriter {
  fn drop(&mut self) {
    self.drops.fetch_add(1, Ordering::SeqCst);
  }
}

/// A writer that fails every write, for exercising the fatal-I/O path.
pub(crate) struct FailingWriter;

impl Write for FailingWriter {
  fn write(&mut self, _data: &[u8]) -> std::io::Result<usize> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
  }
}

/// Parses rows of space-separated floats back out of a shared buffer.
pub(crate) fn parse_rows(buf: &Arc<Mutex<Vec<u8>>>) -> Vec<Vec<f64>> {
  let bytes = buf.lock().unwrap();
  let text = std::str::from_utf8(&bytes).unwrap();
  text
    .lines()
    .map(|line| {
      line
        .split_whitespace()
        .map(|field| field.parse::<f64>().unwrap())
        .collect()
    })
    .collect()
}
