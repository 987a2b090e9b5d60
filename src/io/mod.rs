//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - cleaned table export (`export`)
//! - JSON analysis report (`report_json`)

pub mod export;
pub mod ingest;
pub mod report_json;

pub use export::*;
pub use ingest::*;
pub use report_json::*;
