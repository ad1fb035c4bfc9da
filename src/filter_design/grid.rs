use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_EDGE_EPSILON, MAX_ANGULAR_FREQ, MAX_NORMALIZED_FREQ};
use crate::error::{DesignError, Result};
use crate::signal_processing::db2mag;

/// Sampled angular frequencies (radians/sample) the design is fitted on
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    w: Vec<f64>,
}

impl FrequencyGrid {
    /// Create a grid from explicit angular frequencies
    ///
    /// # Errors
    /// Returns `DesignError::InvalidConfiguration` if the grid is empty or any
    /// point is non-finite or outside [0, π]
    pub fn new(w: Vec<f64>) -> Result<Self> {
        if w.is_empty() {
            return Err(DesignError::InvalidConfiguration(
                "frequency grid is empty".to_string(),
            ));
        }
        if let Some((i, &wi)) = w.iter().enumerate().find(|(_, wi)| {
            !wi.is_finite() || **wi < -GRID_EDGE_EPSILON || **wi > MAX_ANGULAR_FREQ + GRID_EDGE_EPSILON
        }) {
            return Err(DesignError::InvalidConfiguration(format!(
                "frequency w[{}] = {} is outside [0, π]",
                i, wi
            )));
        }
        Ok(Self { w })
    }

    /// `points` frequencies `π·i/points`, i.e. the first half of the bins of a
    /// `2·points`-point DFT
    pub fn uniform(points: usize) -> Result<Self> {
        Self::new(
            (0..points)
                .map(|i| PI * i as f64 / points as f64)
                .collect(),
        )
    }

    /// `points` evenly spaced frequencies from `start` to `stop` inclusive
    pub fn linspace(start: f64, stop: f64, points: usize) -> Result<Self> {
        let w = match points {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (points - 1) as f64;
                (0..points).map(|i| start + step * i as f64).collect()
            }
        };
        Self::new(w)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.w
    }

    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.w
    }
}

/// Target magnitudes paired element-wise with a `FrequencyGrid`
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredResponse {
    magnitudes: Vec<f64>,
}

impl DesiredResponse {
    /// # Errors
    /// Returns `DesignError::InvalidConfiguration` if any magnitude is non-finite
    pub fn new(magnitudes: Vec<f64>) -> Result<Self> {
        if let Some((i, &m)) = magnitudes.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(DesignError::InvalidConfiguration(format!(
                "desired[{}] = {} is not finite",
                i, m
            )));
        }
        Ok(Self { magnitudes })
    }

    /// Build a response from gains in dB
    pub fn from_db(gains_db: &[f64]) -> Result<Self> {
        Self::new(gains_db.iter().map(|&g| db2mag(g)).collect())
    }

    /// Check that every magnitude is strictly positive, as required when the
    /// error is weighted by the reciprocal of the desired magnitude
    pub fn ensure_positive(&self) -> Result<()> {
        match self.magnitudes.iter().enumerate().find(|(_, m)| **m <= 0.0) {
            Some((i, m)) => Err(DesignError::InvalidConfiguration(format!(
                "weighted design requires positive desired magnitudes, desired[{}] = {}",
                i, m
            ))),
            None => Ok(()),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.magnitudes
    }
}

/// A frequency band with constant target gain
///
/// Edges are normalized frequencies in cycles/sample (0.0 to 0.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Lower band edge
    pub start: f64,
    /// Upper band edge
    pub end: f64,
    /// Target gain in dB
    pub gain_db: f64,
}

impl BandSpec {
    pub fn new(start: f64, end: f64, gain_db: f64) -> Self {
        Self {
            start,
            end,
            gain_db,
        }
    }

    fn contains(&self, normalized_freq: f64) -> bool {
        normalized_freq >= self.start && normalized_freq <= self.end
    }
}

/// Sample piecewise-constant bands onto `FrequencyGrid::uniform(points)`
///
/// Grid points that fall between bands are transition regions and are left
/// out of the returned grid, so the optimizer places no constraint on them.
///
/// # Errors
/// Returns `DesignError::InvalidConfiguration` if a band has its edges out of
/// order or outside [0, 0.5], if bands overlap, or if no grid point lands in
/// any band
pub fn sample_bands(points: usize, bands: &[BandSpec]) -> Result<(FrequencyGrid, DesiredResponse)> {
    let mut sorted: Vec<&BandSpec> = bands.iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    for band in &sorted {
        if !(0.0..=MAX_NORMALIZED_FREQ).contains(&band.start)
            || !(0.0..=MAX_NORMALIZED_FREQ).contains(&band.end)
            || band.start > band.end
        {
            return Err(DesignError::InvalidConfiguration(format!(
                "invalid band [{}, {}]: edges must satisfy 0 <= start <= end <= {}",
                band.start, band.end, MAX_NORMALIZED_FREQ
            )));
        }
        if !band.gain_db.is_finite() {
            return Err(DesignError::InvalidConfiguration(format!(
                "band [{}, {}] has non-finite gain {}",
                band.start, band.end, band.gain_db
            )));
        }
    }

    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(DesignError::InvalidConfiguration(format!(
                "bands [{}, {}] and [{}, {}] overlap",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }
    }

    let uniform = FrequencyGrid::uniform(points)?;
    let mut w = Vec::with_capacity(points);
    let mut desired = Vec::with_capacity(points);

    for &wi in uniform.as_slice() {
        let normalized = wi / (2.0 * PI);
        if let Some(band) = sorted.iter().find(|b| b.contains(normalized)) {
            w.push(wi);
            desired.push(db2mag(band.gain_db));
        }
    }

    if w.is_empty() {
        return Err(DesignError::InvalidConfiguration(format!(
            "no grid points fall inside the configured bands ({} points)",
            points
        )));
    }

    log::debug!(
        "Sampled {} bands onto {} of {} grid points",
        sorted.len(),
        w.len(),
        points
    );

    Ok((FrequencyGrid::new(w)?, DesiredResponse::new(desired)?))
}
