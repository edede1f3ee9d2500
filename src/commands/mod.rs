//! Command handlers for Undine's CLI commands

mod analyze;
mod fix;

pub use analyze::AnalyzeCommand;
pub use fix::FixCommand;
