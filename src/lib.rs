//! Library entry for xcstrings-translate exposing the pipeline for the binary and
//! integration tests.

pub mod args;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;

pub use error::Error;
