//! Deploy module running the full approve-then-deploy sequence.

mod cmd;

pub use cmd::*;

pub use crate::common::Result;
