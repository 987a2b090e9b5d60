//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw and cleaned row types (`RawRecord`, `SalesRecord`)
//! - the source schema (`COLUMNS`) and date formats
//! - run configuration (`AnalysisConfig`, `ServeConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
