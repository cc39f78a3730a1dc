use crate::core::io::table::TableError;
use crate::core::params::ConfigError;
use crate::core::utils::roots::RootError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Growth rate solver failed after {evaluations} residual evaluations: {source}")]
    SolverNonConvergence {
        evaluations: usize,
        #[source]
        source: RootError,
    },

    #[error("Solver returned a non-physical growth rate: {growth_rate}")]
    NonPhysicalGrowthRate { growth_rate: f64 },

    #[error("Degenerate input to {operation}: {reason}")]
    DegenerateInput {
        operation: &'static str,
        reason: String,
    },

    #[error("Table I/O failed for '{path}': {source}", path = path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn degenerate(operation: &'static str, reason: impl Into<String>) -> Self {
        EngineError::DegenerateInput {
            operation,
            reason: reason.into(),
        }
    }

    /// Whether the error stems from the growth-rate root search.
    pub fn is_non_convergence(&self) -> bool {
        matches!(
            self,
            EngineError::SolverNonConvergence { .. } | EngineError::NonPhysicalGrowthRate { .. }
        )
    }
}
