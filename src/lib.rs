//! Parameter-sweep generation for node-graph image/video pipelines.
//!
//! A base workflow graph and a sweep config go in; one patched graph per
//! distinct combination of axis values comes out and is queued on the
//! remote generation service.

pub mod actions;
pub mod compiler;
pub mod dsl;
pub mod error;
pub mod runtime;

pub use error::{Result, SweepError};
