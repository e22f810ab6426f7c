#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod scenario;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
