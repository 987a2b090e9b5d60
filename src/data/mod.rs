//! Data sources other than the input CSV.

pub mod sample;

pub use sample::*;
