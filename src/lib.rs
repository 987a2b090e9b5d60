//! `sales-insights` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the load/clean/aggregate pipeline is testable without spawning processes
//! - the terminal report and the dashboard share one implementation
//!
//! Data flows one way: [`io::ingest`] -> [`clean`] -> [`analysis`] ->
//! [`report`] / [`plot`] / [`dashboard`].

pub mod analysis;
pub mod app;
pub mod clean;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
