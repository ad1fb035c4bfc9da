use serde::Serialize;

use super::{DesignReport, Formatter, ResponseReport};

pub struct JsonFormatter;

impl JsonFormatter {
    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}

impl Formatter for JsonFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        Self::to_json(report)
    }

    fn format_response(&self, report: &ResponseReport) -> String {
        Self::to_json(report)
    }
}
