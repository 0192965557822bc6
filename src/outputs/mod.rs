//! Report rendering for stdout.
//!
//! - [`text`]: per-ticker detail blocks and the ranked summary table
//! - [`json`]: the ranked reports as one JSON document
//!
//! Nothing is written to disk; `main` prints whatever these return.

pub mod json;
pub mod text;

use clap::ValueEnum;

/// Format of the report written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable detail blocks and summary table
    #[default]
    Text,
    /// Ranked reports as JSON
    Json,
}
