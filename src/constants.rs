//! Numeric defaults and tolerances
//!
//! Shared by the design, solver and diagnostic code so that tests and the
//! CLI agree on the same values.

use std::f64::consts::PI;

/// Default tap order N (filter length 2N+1)
pub const DEFAULT_ORDER: usize = 20;

/// Default DFT length for magnitude-response diagnostics
pub const DEFAULT_FFT_POINTS: usize = 256;

/// Default number of uniformly spaced grid points for band-based designs
pub const DEFAULT_GRID_POINTS: usize = 256;

/// Highest normalized frequency (cycles/sample)
pub const MAX_NORMALIZED_FREQ: f64 = 0.5;

/// Highest angular frequency accepted on a design grid (radians/sample)
pub const MAX_ANGULAR_FREQ: f64 = PI;

/// Slack allowed when checking grid points against [0, π].
/// Absorbs rounding from conversions like `2π·0.5`.
pub const GRID_EDGE_EPSILON: f64 = 1e-12;

/// Default solver iteration cap
pub const DEFAULT_SOLVER_MAX_ITER: u32 = 200;

/// Default solver gap and feasibility tolerance
pub const DEFAULT_SOLVER_TOLERANCE: f64 = 1e-8;
