//! Configuration model for agentdex.
//!
//! This module defines the Config struct that represents `agentdex.yaml` at the
//! corpus root. The file is optional; every field has a default, and unknown
//! fields are ignored so newer configs still load.

mod model;
mod operations;
pub mod types;


pub use model::{CONFIG_FILE_NAME, Config};
pub use types::LintConfig;
