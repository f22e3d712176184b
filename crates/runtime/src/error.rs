//! Runtime errors

use thiserror::Error;

use crate::types::CellId;

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors in graph construction and engine operation
#[derive(Debug, Error)]
pub enum Error {
    #[error("cell not found: {0}")]
    CellNotFound(CellId),

    #[error("duplicate cell: {0}")]
    DuplicateCell(CellId),

    #[error("cell {cell} reads unknown cell {dependency}")]
    UnknownDependency { cell: CellId, dependency: CellId },

    #[error("cycle detected in cell graph: {cells:?}")]
    CycleDetected { cells: Vec<CellId> },

    #[error("cell {cell} references compute function {index} but only {registered} are registered")]
    InvalidComputeIndex {
        cell: CellId,
        index: usize,
        registered: usize,
    },
}

/// Failure produced by a cell's compute function.
///
/// The engine records this against the cell's Errored state. The kind is a
/// stable tag so callers can classify failures without the runtime knowing
/// domain error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ComputeError {
    pub kind: String,
    pub message: String,
}

impl ComputeError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
