//! Configuration for linear-phase FIR design.
//!
//! ## Configuration file
//!
//! The CLI reads a TOML file with up to four sections. Every field has a
//! default, so an empty `[filter]` table is enough for a 41-tap L1 design:
//!
//! ```toml
//! [filter]
//! order = 20
//! norm = 1        # 1, 2 or "inf"
//! weighted = false
//!
//! [grid]
//! points = 256
//!
//! [[band]]
//! start = 0.0     # cycles/sample
//! end = 0.1
//! gain_db = 0.0
//!
//! [[band]]
//! start = 0.15
//! end = 0.5
//! gain_db = -40.0
//!
//! [solver]
//! max_iter = 200
//! tolerance = 1e-8
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GRID_POINTS, DEFAULT_ORDER, DEFAULT_SOLVER_MAX_ITER, DEFAULT_SOLVER_TOLERANCE,
};
use crate::error::{DesignError, Result};
use crate::filter_design::{BandSpec, DesiredResponse, FrequencyGrid, sample_bands};

/// Order of the error norm being minimized
///
/// # Parsing formats
/// - `1`, `l1` - sum of absolute errors
/// - `2`, `l2` - least squares
/// - `inf`, `linf`, `∞` - minimax (Chebyshev)
///
/// # Example
/// ```
/// use linphase::config::NormOrder;
///
/// let norm: NormOrder = "inf".parse().unwrap();
/// assert_eq!(norm, NormOrder::Inf);
/// assert_eq!(norm.to_string(), "inf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "NormValue", into = "String")]
pub enum NormOrder {
    #[default]
    L1,
    L2,
    Inf,
}

impl NormOrder {
    /// Evaluate this norm on a residual vector
    pub fn evaluate(&self, residual: &[f64]) -> f64 {
        match self {
            NormOrder::L1 => residual.iter().map(|r| r.abs()).sum(),
            NormOrder::L2 => residual.iter().map(|r| r * r).sum::<f64>().sqrt(),
            NormOrder::Inf => residual.iter().fold(0.0, |acc: f64, r| acc.max(r.abs())),
        }
    }
}

impl fmt::Display for NormOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormOrder::L1 => write!(f, "1"),
            NormOrder::L2 => write!(f, "2"),
            NormOrder::Inf => write!(f, "inf"),
        }
    }
}

impl FromStr for NormOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "l1" => Ok(NormOrder::L1),
            "2" | "l2" => Ok(NormOrder::L2),
            "inf" | "linf" | "∞" => Ok(NormOrder::Inf),
            other => Err(format!(
                "unsupported norm order: {} (expected 1, 2 or inf)",
                other
            )),
        }
    }
}

/// Accepts both `norm = 2` and `norm = "inf"` in TOML
#[derive(Deserialize)]
#[serde(untagged)]
enum NormValue {
    Order(i64),
    Name(String),
}

impl TryFrom<NormValue> for NormOrder {
    type Error = String;

    fn try_from(value: NormValue) -> std::result::Result<Self, Self::Error> {
        match value {
            NormValue::Order(1) => Ok(NormOrder::L1),
            NormValue::Order(2) => Ok(NormOrder::L2),
            NormValue::Order(p) => Err(format!(
                "unsupported norm order: {} (expected 1, 2 or inf)",
                p
            )),
            NormValue::Name(name) => name.parse(),
        }
    }
}

impl From<NormOrder> for String {
    fn from(norm: NormOrder) -> Self {
        norm.to_string()
    }
}

/// Phase response of the designed filter
///
/// Only symmetric (linear-phase) filters are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseMode {
    #[default]
    Linear,
}

/// Filter design parameters
///
/// # Example
/// ```
/// use linphase::config::{FilterSpec, NormOrder};
///
/// let spec = FilterSpec {
///     order: 8,
///     norm: NormOrder::L2,
///     ..Default::default()
/// };
/// assert_eq!(spec.num_taps(), 17);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Tap order N; the filter has 2N+1 taps
    pub order: usize,
    /// Phase mode (linear only)
    pub phase: PhaseMode,
    /// Error norm to minimize
    pub norm: NormOrder,
    /// Weight the error by the reciprocal of the desired magnitude
    pub weighted: bool,
    /// Penalty term request. Accepted for compatibility, never applied.
    pub penalize: bool,
}

impl FilterSpec {
    /// Number of filter taps (2N+1)
    pub fn num_taps(&self) -> usize {
        2 * self.order + 1
    }

    /// Number of free half-coefficients (N+1)
    pub fn num_coefficients(&self) -> usize {
        self.order + 1
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            phase: PhaseMode::Linear,
            norm: NormOrder::L1,
            weighted: false,
            penalize: false,
        }
    }
}

/// Convex solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum interior-point iterations
    pub max_iter: u32,
    /// Absolute gap and feasibility tolerance
    pub tolerance: f64,
    /// Wall-clock limit in seconds (unlimited when absent)
    pub time_limit_secs: Option<f64>,
    /// Print the solver's own iteration log
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_SOLVER_MAX_ITER,
            tolerance: DEFAULT_SOLVER_TOLERANCE,
            time_limit_secs: None,
            verbose: false,
        }
    }
}

/// Frequency grid settings for band-based designs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of uniformly spaced points on [0, π)
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Complete design description as read from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub filter: FilterSpec,
    pub grid: GridConfig,
    #[serde(rename = "band")]
    pub bands: Vec<BandSpec>,
    pub solver: SolverConfig,
}

impl DesignConfig {
    /// Sample the configured bands onto the configured grid
    ///
    /// # Errors
    /// Returns `DesignError::InvalidConfiguration` if no bands are configured
    /// or the band layout is invalid
    pub fn sample(&self) -> Result<(FrequencyGrid, DesiredResponse)> {
        if self.bands.is_empty() {
            return Err(DesignError::InvalidConfiguration(
                "at least one [[band]] is required".to_string(),
            ));
        }
        sample_bands(self.grid.points, &self.bands)
    }
}

impl FromStr for DesignConfig {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
