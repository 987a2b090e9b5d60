//! Reporting: terminal tables for the analysis.

pub mod format;

pub use format::*;
