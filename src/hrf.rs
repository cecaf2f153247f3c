//! # Hemodynamic Response Kernels
//!
//! Precomputed FIR coefficient kernels approximating how neural activity
//! maps to a slower hemodynamic ("BOLD"-like) observable. The kernel is
//! generated once at setup and handed to a
//! [`Convolve`](crate::nodes::convolve::Convolve) node; nothing here runs on
//! the per-step path.
//!
//! The kernel is the first-order Volterra approximation of the linearized
//! balloon model: a damped oscillation `exp(-t/τs)·sin(ωt)` with
//! `ω = sqrt(1/τf − 1/(4τs²))`, sampled at the convolution node's input
//! step. Coefficients are normalized to unit peak magnitude so the filtered
//! trace keeps the scale of its input.

/// Default signal decay time constant `τs`, in the same unit as the kernel
/// step (milliseconds in the reference setup: 0.8 s).
pub const DEFAULT_TAU_S: f64 = 800.0;

/// Default flow-feedback time constant `τf` (0.4 s in milliseconds).
pub const DEFAULT_TAU_F: f64 = 400.0;

/// Samples a first-order Volterra hemodynamic kernel with the default time
/// constants: `len` coefficients spaced `step` apart, starting at `t = 0`.
///
/// The reference recorder uses 60 taps at a 500 ms step, covering 30 s of
/// response.
///
/// # Panics
///
/// Panics if `len` is zero or `step` is not a positive finite number.
pub fn volterra_kernel(len: usize, step: f64) -> Vec<f64> {
  volterra_kernel_with(len, step, DEFAULT_TAU_S, DEFAULT_TAU_F)
}

/// Samples a first-order Volterra hemodynamic kernel with explicit time
/// constants. `tau_s` and `tau_f` must be in the same unit as `step`, with
/// `1/tau_f > 1/(4·tau_s²)` so the oscillation frequency is real.
///
/// # Panics
///
/// Panics on a zero `len`, a non-positive or non-finite `step`, or time
/// constants that make the kernel non-oscillatory.
pub fn volterra_kernel_with(len: usize, step: f64, tau_s: f64, tau_f: f64) -> Vec<f64> {
  assert!(len > 0, "kernel length must be >= 1");
  assert!(
    step.is_finite() && step > 0.0,
    "kernel step must be positive and finite"
  );
  let omega_squared = 1.0 / tau_f - 1.0 / (4.0 * tau_s * tau_s);
  assert!(
    omega_squared > 0.0,
    "time constants must satisfy 1/tau_f > 1/(4*tau_s^2)"
  );
  let omega = omega_squared.sqrt();

  let mut kernel: Vec<f64> = (0..len)
    .map(|i| {
      let t = i as f64 * step;
      (-t / tau_s).exp() * (omega * t).sin()
    })
    .collect();

  let peak = kernel.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
  if peak > 0.0 {
    for coefficient in &mut kernel {
      *coefficient /= peak;
    }
  }
  kernel
}
