//! Command-line argument parsing and handling.

pub mod definition;
pub mod utils;

pub use definition::Args;
pub use utils::{default_output_path, determine_log_level, output_path};
