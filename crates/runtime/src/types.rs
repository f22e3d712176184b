//! Core runtime types
//!
//! These types describe the cell graph's execution model.

use std::fmt;

/// Unique identifier for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub String);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CellId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    /// Needs recomputation before its value can be trusted
    #[default]
    Stale,
    /// Compute function is currently running
    Computing,
    /// Cached value is up to date with all dependencies
    Fresh,
    /// Last computation failed; terminal until the next upstream change
    Errored,
}

/// Outcome of a settle pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettleReport {
    /// Cells recomputed this pass, in execution order
    pub recomputed: Vec<CellId>,
    /// Cells whose computation failed this pass
    pub errored: Vec<CellId>,
    /// Cells left stale because an upstream cell is not fresh
    pub blocked: Vec<CellId>,
}

impl SettleReport {
    /// True when every visited cell settled to Fresh
    pub fn is_clean(&self) -> bool {
        self.errored.is_empty() && self.blocked.is_empty()
    }
}
