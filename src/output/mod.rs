mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

use crate::filter_design::{FilterDesign, SolveStatus};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Summary of a finished design, as printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub generated: String,
    pub order: usize,
    pub num_taps: usize,
    pub norm: String,
    pub weighted: bool,
    pub status: SolveStatus,
    pub solver_iterations: u32,
    pub residual_norm: f64,
    pub max_abs_error: f64,
    pub group_delay_samples: usize,
    pub taps: Vec<f64>,
}

impl DesignReport {
    pub fn from_design(design: &FilterDesign) -> Self {
        let kernel = design.kernel();
        Self {
            generated: iso8601_timestamp(),
            order: kernel.order(),
            num_taps: kernel.num_taps(),
            norm: design.norm().to_string(),
            weighted: design.is_weighted(),
            status: design.status(),
            solver_iterations: design.solver_iterations(),
            residual_norm: design.residual_norm(),
            max_abs_error: design.max_abs_error(),
            group_delay_samples: kernel.group_delay_samples(),
            taps: kernel.taps().to_vec(),
        }
    }
}

/// One-sided magnitude response of a designed kernel
#[derive(Debug, Clone, Serialize)]
pub struct ResponseReport {
    pub generated: String,
    pub fft_points: usize,
    /// Bin center frequencies in cycles/sample
    pub frequencies: Vec<f64>,
    /// Magnitude in dB; `-inf` bins serialize as `null` in JSON
    pub magnitude_db: Vec<f64>,
}

impl ResponseReport {
    pub fn new(fft_points: usize, magnitude_db: Vec<f64>) -> Self {
        let frequencies = (0..magnitude_db.len())
            .map(|k| k as f64 / fft_points as f64)
            .collect();
        Self {
            generated: iso8601_timestamp(),
            fft_points,
            frequencies,
            magnitude_db,
        }
    }
}

pub trait Formatter {
    fn format_design(&self, report: &DesignReport) -> String;

    fn format_response(&self, report: &ResponseReport) -> String;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
pub(crate) fn sample_report() -> DesignReport {
    DesignReport {
        generated: "2026-01-01T00:00:00.000Z".to_string(),
        order: 1,
        num_taps: 3,
        norm: "2".to_string(),
        weighted: false,
        status: SolveStatus::Optimal,
        solver_iterations: 7,
        residual_norm: 0.125,
        max_abs_error: 0.0625,
        group_delay_samples: 1,
        taps: vec![0.25, 0.5, 0.25],
    }
}
