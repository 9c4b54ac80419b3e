// Output formatting for CLI

use std::io::Write;

use anyhow::Result;

use crate::cli::config::OutputFormat;

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output one report
    pub fn output_report(&self, report: &serde_json::Value, writer: &mut impl Write) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?,
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(report)?)?,
            OutputFormat::KeyValue => self.output_key_value("", report, writer)?,
        }
        Ok(())
    }

    /// Output nested objects as dotted key-value pairs
    fn output_key_value(&self, prefix: &str, value: &serde_json::Value, writer: &mut impl Write) -> Result<()> {
        match value {
            serde_json::Value::Object(obj) => {
                for (key, value) in obj {
                    let key = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                    self.output_key_value(&key, value, writer)?;
                }
            }
            _ => writeln!(writer, "{}: {}", prefix, format_value(value))?,
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

/// Format a scalar JSON value for display
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "(null)".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(arr) if arr.is_empty() => "[]".to_string(),
        serde_json::Value::Array(arr) => format!("[{} items]", arr.len()),
        serde_json::Value::Object(obj) => format!("{{{} items}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_value_flattens_objects() {
        let formatter = OutputFormatter::new(OutputFormat::KeyValue, true);
        let mut out = Vec::new();
        let report = json!({"path": "a.mp3", "id3v1": {"title": "T", "track": null}, "chapters": [1, 2]});
        formatter.output_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("path: a.mp3\n"));
        assert!(text.contains("id3v1.title: T\n"));
        assert!(text.contains("id3v1.track: (null)\n"));
        assert!(text.contains("chapters: [2 items]\n"));
    }

    #[test]
    fn test_compact_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json, true);
        let mut out = Vec::new();
        formatter.output_report(&json!({"a": 1}), &mut out).unwrap();
        assert_eq!(out, b"{\"a\":1}\n");
    }
}
