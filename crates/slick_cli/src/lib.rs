//! Slick CLI library
//!
//! Headless diagnostics for slick bottom sheets: load a sheet file, print its
//! resolved snap table, or replay a JSON scenario of host inputs and
//! assertions and produce a machine-readable report.

pub mod assert;
pub mod config;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod summary;

pub use config::SheetFile;
pub use report::{ReportStatus, SheetReport, StepFailure};
pub use runner::{run_loaded_scenario, run_scenario, RunConfig, RunOutcome};
pub use scenario::{Scenario, ScenarioStep};
pub use summary::TableSummary;
