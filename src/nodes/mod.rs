//! # Stream Node Library
//!
//! The built-in node kinds that make up an output-processing tree. All nodes
//! share the contract of [`crate::node::StreamNode`]: observe one sample,
//! answer with a stop/continue signal, own the nodes downstream of them.
//!
//! ## Node Categories
//!
//! - **Routing**: [`tee`] duplicates a sample to several branches, [`gate`]
//!   strips columns before the rest of the tree sees them.
//! - **Rate reduction**: [`subsample`] keeps every `L`th sample.
//! - **Filtering**: [`convolve`] applies a fixed FIR kernel to one state
//!   scalar, e.g. a hemodynamic response (see [`crate::hrf`]).
//! - **Termination**: [`until`] stops the run at a time limit.
//! - **Recording**: [`sink`] appends rows to a backing file.

pub mod convolve;
pub mod gate;
pub mod sink;
pub mod subsample;
pub mod tee;
pub mod until;

#[cfg(test)]
pub(crate) mod testing;
