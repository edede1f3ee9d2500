//! 🌊 Undine - Deep analysis for your stylesheets
//!
//! Undine parses CSS into a rule model and runs configurable detectors for
//! layout, maintainability, performance, accessibility, and compatibility
//! problems, then scores the results and can rewrite the source with
//! high-confidence fixes.

pub mod analyzer;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod detectors;
pub mod errors;
pub mod fixes;
pub mod models;
pub mod output;
pub mod parser;
pub mod specificity;

pub use analyzer::{analyze_css, CssAnalyzer};
pub use fixes::{apply_fixes, FixOptions};

/// Crate version, reported in rendered reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
