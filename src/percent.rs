//! Completion-percentage bookkeeping
//!
//! A percentage artifact is a plain-text scalar: one decimal ("66.7") or
//! the sentinel "N/A" when there was nothing to compare. Only the `write_*`
//! relation operations persist it; pure reads never do.

use crate::error::{MapdiffError, Result};
use crate::tabular::write_atomic;
use std::fmt;
use std::fs;
use std::path::Path;

/// The sentinel persisted when the denominator is zero.
pub const PERCENT_NOT_AVAILABLE: &str = "N/A";

/// A completion ratio, or "not available" when inputs were absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percent {
    Value(f64),
    NotAvailable,
}

impl Percent {
    /// Derive the ratio from reconciliation counts.
    pub fn compute(done: usize, todo: usize) -> Self {
        let total = done + todo;
        if total == 0 {
            return Self::NotAvailable;
        }
        Self::Value(done as f64 / total as f64 * 100.0)
    }

    /// Parse a persisted scalar.
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed == PERCENT_NOT_AVAILABLE {
            return Self::NotAvailable;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::Value(value),
            Err(_) => Self::NotAvailable,
        }
    }

    /// Whether this counts as fully mapped for filtering purposes.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Value(v) if *v >= 100.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{:.1}", v),
            Self::NotAvailable => write!(f, "{}", PERCENT_NOT_AVAILABLE),
        }
    }
}

/// Persist the scalar atomically.
pub fn write_percent(path: &Path, percent: Percent) -> Result<()> {
    write_atomic(path, percent.to_string().as_bytes())
}

/// Load a previously persisted scalar; absent file is the distinct
/// "no data yet" condition.
pub fn read_percent(path: &Path) -> Result<Percent> {
    if !path.exists() {
        return Err(MapdiffError::artifact_absent(path));
    }
    let content = fs::read_to_string(path)?;
    Ok(Percent::parse(&content))
}
