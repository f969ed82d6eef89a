mod args;
mod error;
mod logging;

pub use args::*;
pub use error::*;
pub use logging::*;
