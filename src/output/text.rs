use super::{DesignReport, Formatter, ResponseReport};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        let mut out = format!(
            "Filter: {} taps (order {}), L{} norm, {}\nStatus: {} (residual norm {:.4e}, max error {:.4e})",
            report.num_taps,
            report.order,
            report.norm,
            if report.weighted { "weighted" } else { "unweighted" },
            report.status,
            report.residual_norm,
            report.max_abs_error
        );
        if self.verbose {
            out.push_str(&format!(
                "\nSolver iterations: {}\nGroup delay: {} samples\nGenerated: {}",
                report.solver_iterations, report.group_delay_samples, report.generated
            ));
        }
        for (i, tap) in report.taps.iter().enumerate() {
            out.push_str(&format!("\n  h[{:>3}] = {:>+.10}", i, tap));
        }
        out
    }

    fn format_response(&self, report: &ResponseReport) -> String {
        let mut out = format!("Magnitude response ({}-point DFT)", report.fft_points);
        for (f, db) in report.frequencies.iter().zip(&report.magnitude_db) {
            out.push_str(&format!("\n  {:>8.5} cyc/sample  {:>9.3} dB", f, db));
        }
        out
    }
}
