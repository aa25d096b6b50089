//! Output formatting module for revlens.
//!
//! Provides human-readable text and machine-readable JSON output for CLI
//! results. Text mode renders serialized values generically: objects become
//! `key: value` lines, arrays of objects become one row per item.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format - machine-readable output
    Json,
}

/// Formatter that can output data in text or JSON format
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter with the specified output format
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format data according to the configured output format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(data)?;
                Ok(output)
            }
            OutputFormat::Text => {
                let value = serde_json::to_value(data)?;
                Ok(render_text(&value))
            }
        }
    }

    /// Format and print data to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        let output = self.format(data)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    }

    /// Format and print a list, with a custom message when it is empty.
    ///
    /// JSON mode always prints the (possibly empty) array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn print_list<T: Serialize>(&self, data: &[T], empty_message: &str) -> Result<()> {
        if data.is_empty() && self.format == OutputFormat::Text {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{empty_message}")?;
            return Ok(());
        }
        self.print(&data)
    }
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_row)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => {
            let mut lines = Vec::new();
            for (key, val) in map {
                match val {
                    Value::Array(items) => {
                        lines.push(format!("{key}:"));
                        for item in items {
                            lines.push(format!("  {}", render_row(item)));
                        }
                    }
                    other => lines.push(format!("{key}: {}", render_scalar(other))),
                }
            }
            lines.join("\n")
        }
        other => render_scalar(other),
    }
}

fn render_row(value: &Value) -> String {
    if let Value::Object(map) = value {
        map.iter()
            .map(|(key, val)| format!("{key}={}", render_scalar(val)))
            .collect::<Vec<_>>()
            .join("  ")
    } else {
        render_scalar(value)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        label: String,
        polarity: Option<f64>,
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json);
        let row = Row {
            id: 1,
            label: "positive".to_string(),
            polarity: Some(0.5),
        };
        let output = formatter.format(&row).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["label"], "positive");
    }

    #[test]
    fn test_text_object_renders_key_value_lines() {
        let formatter = Formatter::new(OutputFormat::Text);
        let row = Row {
            id: 1,
            label: "positive".to_string(),
            polarity: None,
        };
        let output = formatter.format(&row).unwrap();
        assert!(output.contains("id: 1"));
        assert!(output.contains("label: positive"));
        // Nulls render as a dash.
        assert!(output.contains("polarity: -"));
    }

    #[test]
    fn test_text_array_renders_one_row_per_item() {
        let formatter = Formatter::new(OutputFormat::Text);
        let rows = vec![
            Row {
                id: 1,
                label: "positive".to_string(),
                polarity: Some(0.5),
            },
            Row {
                id: 2,
                label: "unscored".to_string(),
                polarity: None,
            },
        ];
        let output = formatter.format(&rows).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("id=1"));
        assert!(lines[1].contains("label=unscored"));
        assert!(lines[1].contains("polarity=-"));
    }
}
