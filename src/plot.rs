//! Two-panel magnitude response chart (SVG)
//!
//! Top panel: linear magnitude of the designed kernel against the desired
//! targets. Bottom panel: the same in dB. Bins whose magnitude is exactly
//! zero have no finite dB value and are left out of the bottom panel.

use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;

use crate::error::{DesignError, Result};
use crate::filter_design::FilterDesign;
use crate::signal_processing::{fft_magnitude, mag2db};

/// Smallest DFT used for the designed curve so short grids still plot smoothly
const MIN_PLOT_FFT_POINTS: usize = 512;

/// Render `design` to an SVG file at `path`
pub fn plot_response<P: AsRef<Path>>(design: &FilterDesign, path: P, size: (u32, u32)) -> Result<()> {
    let fft_points = design.fft_points().max(MIN_PLOT_FFT_POINTS);
    let magnitude = fft_magnitude(design.kernel().taps(), fft_points)?;

    let designed: Vec<(f64, f64)> = magnitude
        .iter()
        .take(fft_points / 2 + 1)
        .enumerate()
        .map(|(k, &m)| (2.0 * PI * k as f64 / fft_points as f64, m))
        .collect();
    let desired: Vec<(f64, f64)> = design
        .frequencies()
        .iter()
        .copied()
        .zip(design.desired().iter().copied())
        .collect();

    let to_db = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(w, m)| (w, mag2db(m)))
            .filter(|(_, db)| db.is_finite())
            .collect()
    };
    let designed_db = to_db(&designed);
    let desired_db = to_db(&desired);

    let linear_max = designed
        .iter()
        .chain(&desired)
        .fold(0.0_f64, |acc, &(_, m)| acc.max(m));
    let (db_min, db_max) = designed_db
        .iter()
        .chain(&desired_db)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, db)| {
            (lo.min(db), hi.max(db))
        });
    let (db_min, db_max) = if db_min < db_max {
        (db_min - 3.0, db_max + 3.0)
    } else {
        (-60.0, 10.0)
    };

    let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let root = root
        .titled("Magnitude Response of the Designed Filter", ("sans-serif", 20))
        .map_err(plot_err)?;
    let panels = root.split_evenly((2, 1));

    draw_panel(
        &panels[0],
        "Linear magnitude",
        "|H|",
        0.0..(linear_max * 1.1).max(1e-6),
        &designed,
        &desired,
    )?;
    draw_panel(
        &panels[1],
        "Log magnitude",
        "dB",
        db_min..db_max,
        &designed_db,
        &desired_db,
    )?;

    root.present().map_err(plot_err)?;
    log::info!("Wrote response plot to {}", path.as_ref().display());
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    caption: &str,
    y_desc: &str,
    y_range: std::ops::Range<f64>,
    designed: &[(f64, f64)],
    desired: &[(f64, f64)],
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..PI, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("w (rad/sample)")
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(designed.iter().copied(), &BLUE))
        .map_err(plot_err)?
        .label("Designed Filter")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(
            desired
                .iter()
                .map(|&point| Circle::new(point, 2, RED.filled())),
        )
        .map_err(plot_err)?
        .label("Desired Filter")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

fn plot_err<E: Display>(e: E) -> DesignError {
    DesignError::Plot(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterSpec, NormOrder};
    use crate::filter_design::{BandSpec, FilterDesigner, sample_bands};

    #[test]
    fn test_plot_response_writes_svg() {
        let (grid, desired) = sample_bands(
            64,
            &[BandSpec::new(0.0, 0.1, 0.0), BandSpec::new(0.2, 0.5, -40.0)],
        )
        .unwrap();
        let mut designer = FilterDesigner::new(FilterSpec {
            order: 8,
            norm: NormOrder::L2,
            ..Default::default()
        });
        let design = designer.design(&grid, &desired).unwrap();

        let path = std::env::temp_dir().join(format!("linphase_plot_{}.svg", std::process::id()));
        plot_response(design, &path, (640, 640)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(svg.contains("<svg"));
    }
}
