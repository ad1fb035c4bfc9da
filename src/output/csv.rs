use super::{DesignReport, Formatter, ResponseReport};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        let mut out = String::from("index,tap");
        for (i, tap) in report.taps.iter().enumerate() {
            out.push_str(&format!("\n{},{:.12e}", i, tap));
        }
        out
    }

    fn format_response(&self, report: &ResponseReport) -> String {
        let mut out = String::from("bin,frequency,magnitude_db");
        for (k, (f, db)) in report
            .frequencies
            .iter()
            .zip(&report.magnitude_db)
            .enumerate()
        {
            out.push_str(&format!("\n{},{:.6},{:.4}", k, f, db));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_report;

    #[test]
    fn test_design_csv() {
        let csv = CsvFormatter.format_design(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "index,tap");
        assert!(lines[2].starts_with("1,5.0"));
    }

    #[test]
    fn test_response_csv() {
        let report = ResponseReport::new(4, vec![0.0, f64::NEG_INFINITY]);
        let csv = CsvFormatter.format_response(&report);
        assert_eq!(csv, "bin,frequency,magnitude_db\n0,0.000000,0.0000\n1,0.250000,-inf");
    }
}
