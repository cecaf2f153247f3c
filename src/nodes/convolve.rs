//! # Convolution (FIR)
//!
//! Applies a fixed finite-impulse-response kernel to one scalar drawn from
//! the incoming state vector and forwards the filtered value downstream as a
//! single-element sample at the same timestamp.
//!
//! The node keeps a zero-initialized ring buffer of the last `K` inputs, so
//! the filter is zero-padded before the buffer first fills and the output is
//! the standard FIR form `y[n] = Σ_k c[k]·x[n−k]`: a unit impulse reproduces
//! the coefficient sequence in order. The kernel is precomputed and supplied
//! at construction; for the hemodynamic use case, see [`crate::hrf`].

use crate::error::PipelineError;
use crate::node::StreamNode;
use crate::sample::{Flow, Sample};

/// FIR filter node over one designated state scalar.
#[derive(Debug)]
pub struct Convolve {
  kernel: Vec<f64>,
  /// Last `K` inputs; `head` is the index of the most recent one.
  ring: Vec<f64>,
  head: usize,
  input_index: usize,
  next: Box<StreamNode>,
}

impl Convolve {
  /// Creates a convolution node with the given coefficient kernel and
  /// downstream child, reading state element 0.
  ///
  /// An empty kernel is rejected as a setup error.
  pub fn new(kernel: Vec<f64>, next: impl Into<StreamNode>) -> Result<Self, PipelineError> {
    if kernel.is_empty() {
      return Err(PipelineError::EmptyKernel);
    }
    let len = kernel.len();
    Ok(Self {
      kernel,
      ring: vec![0.0; len],
      head: len - 1,
      input_index: 0,
      next: Box::new(next.into()),
    })
  }

  /// Selects which state element feeds the filter (default 0).
  pub fn with_input_index(mut self, input_index: usize) -> Self {
    self.input_index = input_index;
    self
  }

  /// The kernel length `K`.
  pub fn kernel_len(&self) -> usize {
    self.kernel.len()
  }

  /// Pushes the designated state scalar into the ring, computes the filtered
  /// value, and forwards it to the child as a one-element state vector.
  ///
  /// The sample is only borrowed for the duration of this call, which is why
  /// the scalar is copied into the ring rather than referenced. The wired
  /// pipeline guarantees `input_index` is in range; a violation is a
  /// miswiring and panics.
  pub fn apply(&mut self, sample: &Sample<'_>) -> Result<Flow, PipelineError> {
    let len = self.kernel.len();
    self.head = (self.head + 1) % len;
    self.ring[self.head] = sample.state[self.input_index];

    let mut filtered = 0.0;
    for (lag, coefficient) in self.kernel.iter().enumerate() {
      filtered += coefficient * self.ring[(self.head + len - lag) % len];
    }

    let state = [filtered];
    self.next.apply(&Sample::new(sample.t, &state, &[]))
  }

  /// Closes the downstream child.
  pub fn close(&mut self) -> Result<(), PipelineError> {
    self.next.close()
  }
}

impl From<Convolve> for StreamNode {
  fn from(convolve: Convolve) -> Self {
    StreamNode::Convolve(convolve)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::nodes::sink::Sink;
  use crate::nodes::testing::{SharedBuf, parse_rows};

  fn capture() -> (Sink, std::sync::Arc<std::sync::Mutex<Vec<u8>>>) {
    let (writer, handle) = SharedBuf::new();
    (Sink::from_writer(Box::new(writer), "filtered"), handle)
  }

  #[test]
  fn test_unit_impulse_reproduces_kernel() {
    let kernel = vec![0.5, -1.0, 2.0, 0.25];
    let (sink, rows) = capture();
    let mut convolve = Convolve::new(kernel.clone(), sink).unwrap();

    for call in 0..kernel.len() {
      let x = if call == 0 { 1.0 } else { 0.0 };
      let state = [x];
      convolve
        .apply(&Sample::new(call as f64, &state, &[]))
        .unwrap();
    }
    convolve.close().unwrap();

    let rows = parse_rows(&rows);
    assert_eq!(rows.len(), kernel.len());
    for (row, coefficient) in rows.iter().zip(&kernel) {
      assert!((row[1] - coefficient).abs() < 1e-12);
    }
  }

  #[test]
  fn test_ring_wraps_past_kernel_length() {
    // After more inputs than taps, compare against the direct FIR sum.
    let kernel = vec![1.0, 0.5, 0.25];
    let inputs = [3.0, -1.0, 4.0, 1.0, -5.0, 9.0, 2.0];
    let (sink, rows) = capture();
    let mut convolve = Convolve::new(kernel.clone(), sink).unwrap();

    for (n, x) in inputs.iter().enumerate() {
      let state = [*x];
      convolve.apply(&Sample::new(n as f64, &state, &[])).unwrap();
    }
    convolve.close().unwrap();

    let rows = parse_rows(&rows);
    for (n, row) in rows.iter().enumerate() {
      let mut expected = 0.0;
      for (lag, coefficient) in kernel.iter().enumerate() {
        if n >= lag {
          expected += coefficient * inputs[n - lag];
        }
      }
      assert!((row[1] - expected).abs() < 1e-12, "mismatch at n={}", n);
    }
  }

  #[test]
  fn test_forwarded_sample_is_one_element_at_same_time() {
    let (sink, rows) = capture();
    let mut convolve = Convolve::new(vec![2.0], sink).unwrap();
    let state = [3.0, 99.0];
    convolve.apply(&Sample::new(7.5, &state, &[1.0])).unwrap();
    convolve.close().unwrap();

    let rows = parse_rows(&rows);
    // Timestamp preserved, single filtered value, no coupling leakage.
    assert_eq!(rows, vec![vec![7.5, 6.0]]);
  }

  #[test]
  fn test_input_index_selects_the_scalar() {
    let (sink, rows) = capture();
    let mut convolve = Convolve::new(vec![1.0], sink)
      .unwrap()
      .with_input_index(1);
    let state = [3.0, 42.0];
    convolve.apply(&Sample::new(0.0, &state, &[])).unwrap();
    convolve.close().unwrap();
    assert_eq!(parse_rows(&rows)[0][1], 42.0);
  }

  #[test]
  fn test_empty_kernel_is_a_setup_error() {
    let (sink, _) = capture();
    assert!(matches!(
      Convolve::new(Vec::new(), sink),
      Err(PipelineError::EmptyKernel)
    ));
  }
}
