//! # mapdiff
//!
//! A coverage diff tool for crowd-sourced map data: compares streets and
//! house numbers fetched from an Overpass-style API against an
//! authoritative reference dataset, per named area, and reports what is
//! missing along with completion percentages.

pub mod cli;
pub mod collate;
pub mod commands;
pub mod error;
pub mod filter;
pub mod output;
pub mod overpass;
pub mod percent;
pub mod progress;
pub mod query;
pub mod reconcile;
pub mod registry;
pub mod relation;
pub mod tabular;
pub mod workspace;

pub use error::{MapdiffError, Result};
pub use registry::Registry;
pub use workspace::Workspace;

/// Percent sentinel persisted when there is nothing to compare yet
pub use percent::PERCENT_NOT_AVAILABLE;
