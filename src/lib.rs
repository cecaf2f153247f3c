//! # TraceWeave
//!
//! Composable, synchronous, stream-first output processing for numerical
//! simulations.
//!
//! TraceWeave sits between an integration loop and its recorded observables.
//! Once per accepted step the engine hands the pipeline one sample (a
//! timestamp, the state vector, and the coupling vector) and the pipeline
//! routes it through a tree of typed nodes: column gates, decimators, FIR
//! convolutions, fan-out tees, time-limit sentinels, and file-backed row
//! sinks. Every node answers with a [`Flow`](sample::Flow) signal; the moment
//! any branch reports [`Flow::Stop`](sample::Flow::Stop), the engine is
//! expected to stop stepping and tear the pipeline down.
//!
//! ## Key Properties
//!
//! - **Single-threaded**: one `step` call per integration step, in program
//!   order, blocking until the whole tree has seen the sample.
//! - **Exclusive ownership**: every node owns its downstream nodes; the tree
//!   is acyclic with a single root, so teardown is one recursive pass.
//! - **Closed node set**: the six node kinds form a tagged enum with a single
//!   dispatch match, keeping the hot per-step path free of virtual calls.
//! - **Fail-fast I/O**: a sink that cannot open or write its backing file
//!   aborts setup or the run; there is no retry policy anywhere.
//!
//! ## Quick Start
//!
//! ```rust
//! use traceweave::pipeline::{Pipeline, RecorderConfig};
//!
//! # fn main() -> Result<(), traceweave::error::PipelineError> {
//! # let dir = std::env::temp_dir();
//! let config = RecorderConfig {
//!   dt: 0.1,
//!   tf: 100.0,
//!   lfp_dt: 5.0,
//!   bold_dt: 500.0,
//!   hrf_len: 60,
//!   lfp_path: dir.join("lfp.txt"),
//!   bold_path: dir.join("bold.txt"),
//! };
//! let mut pipeline = Pipeline::recorder(&config)?;
//!
//! let mut t = 0.0;
//! let state = [0.5, 0.25];
//! while !pipeline.step(t, &state, &[])?.is_stop() {
//!   t += config.dt;
//! }
//! pipeline.finish()?;
//! # Ok(())
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Error types for pipeline setup and per-step processing.
pub mod error;
/// Precomputed hemodynamic impulse-response kernels.
pub mod hrf;
/// The closed node type and its per-step dispatch.
pub mod node;
/// Collection of built-in stream nodes.
pub mod nodes;
/// The owning pipeline handle and the reference recorder topology.
pub mod pipeline;
/// The per-step sample view and the stop/continue signal.
pub mod sample;


pub use error::PipelineError;
pub use node::StreamNode;
pub use pipeline::{Pipeline, RecorderConfig};
pub use sample::{Flow, Sample};
