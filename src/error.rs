use thiserror::Error;

use crate::filter_design::{FilterDesign, SolveStatus};

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Solver finished with non-optimal status: {status}")]
    SolverNonOptimal {
        status: SolveStatus,
        /// Design assembled from whatever the solver returned, for diagnostics only
        design: Box<FilterDesign>,
    },

    #[error("No filter has been designed yet; call design() before {0}")]
    UsedBeforeDesigned(&'static str),

    #[error("Insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Solver setup failed: {0}")]
    Solver(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[cfg(feature = "plot")]
    #[error("Plot rendering failed: {0}")]
    Plot(String),
}

impl DesignError {
    /// Solver status carried by a `SolverNonOptimal` error
    pub fn solver_status(&self) -> Option<SolveStatus> {
        match self {
            DesignError::SolverNonOptimal { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Diagnostic design carried by a `SolverNonOptimal` error
    pub fn diagnostic_design(&self) -> Option<&FilterDesign> {
        match self {
            DesignError::SolverNonOptimal { design, .. } => Some(design),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DesignError>;
