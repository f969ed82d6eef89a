//! Predict module reporting where a deployment would land without submitting anything.

mod cmd;

pub use cmd::*;

pub use crate::common::Result;
