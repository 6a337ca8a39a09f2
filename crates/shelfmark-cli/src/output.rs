//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde_json;
use shelfmark_pipeline::{BatchSummary, FileOutcome};
use shelfmark_store::Statistics;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a batch rename summary.
    pub fn format_summary(&self, summary: &BatchSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_summary_json(summary),
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Quiet => self.format_summary_quiet(summary),
        }
    }

    /// Format registry statistics.
    pub fn format_statistics(&self, stats: &Statistics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Table => self.format_statistics_table(stats),
            OutputFormat::Quiet => Ok(stats.total_documents.to_string()),
        }
    }

    /// Format a batch summary as JSON.
    fn format_summary_json(&self, summary: &BatchSummary) -> Result<String> {
        let files: Vec<serde_json::Value> = summary
            .files
            .iter()
            .map(|f| {
                serde_json::json!({
                    "path": f.path.display().to_string(),
                    "new_name": f.new_name,
                    "code": f.code,
                    "error": f.error,
                })
            })
            .collect();

        let value = serde_json::json!({
            "total": summary.total,
            "succeeded": summary.succeeded,
            "failed": summary.failed,
            "duration_seconds": summary.duration.as_secs_f64(),
            "cancelled": summary.cancelled,
            "files": files,
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Format a batch summary as a table.
    fn format_summary_table(&self, summary: &BatchSummary) -> Result<String> {
        if summary.files.is_empty() {
            return Ok(self.colorize("No supported documents found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Status", "File", "New Name", "Code"]);

        for file in &summary.files {
            let original = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.path.display().to_string());
            let (status, detail) = match &file.error {
                None => (
                    self.colorize("ok", "green"),
                    file.new_name.clone().unwrap_or_default(),
                ),
                Some(err) => (self.colorize("failed", "red"), err.clone()),
            };
            builder.push_record([
                status,
                original,
                detail,
                file.code.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut output = table.to_string();
        output.push('\n');
        output.push_str(&self.summary_line(summary));
        Ok(output)
    }

    /// Format a batch summary in quiet mode (new names only).
    fn format_summary_quiet(&self, summary: &BatchSummary) -> Result<String> {
        let names: Vec<&str> = summary
            .files
            .iter()
            .filter_map(|f: &FileOutcome| f.new_name.as_deref())
            .collect();
        Ok(names.join("\n"))
    }

    /// One-line totals appended below the table.
    fn summary_line(&self, summary: &BatchSummary) -> String {
        let line = format!(
            "{} processed, {} renamed, {} failed in {:.1}s",
            summary.total,
            summary.succeeded,
            summary.failed,
            summary.duration.as_secs_f64()
        );
        if summary.cancelled {
            self.colorize(&format!("{} (cancelled)", line), "yellow")
        } else if summary.failed > 0 {
            self.colorize(&line, "yellow")
        } else {
            self.colorize(&line, "green")
        }
    }

    /// Format statistics as a table.
    fn format_statistics_table(&self, stats: &Statistics) -> Result<String> {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Documents".to_string(), stats.total_documents.to_string()]);

        for (doc_type, count) in &stats.by_type {
            builder.push_record([format!("  {}", doc_type), count.to_string()]);
        }

        builder.push_record(["Codes".to_string(), stats.allocated_codes.to_string()]);
        for (status, count) in &stats.code_status {
            builder.push_record([format!("  {}", status), count.to_string()]);
        }

        builder.push_record([
            "Next code index".to_string(),
            stats.next_code_index.to_string(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn create_test_summary() -> BatchSummary {
        BatchSummary {
            total: 2,
            succeeded: 1,
            failed: 1,
            duration: Duration::from_millis(1500),
            cancelled: false,
            files: vec![
                FileOutcome {
                    path: PathBuf::from("/docs/hamilton.pdf"),
                    new_name: Some("c.Ga_Ct_App__2014__Hamilton__Unpub----AAAAA.pdf".into()),
                    code: Some("AAAAA".into()),
                    error: None,
                },
                FileOutcome {
                    path: PathBuf::from("/docs/gibberish.pdf"),
                    new_name: None,
                    code: None,
                    error: Some("document type could not be determined".into()),
                },
            ],
        }
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_summary(&create_test_summary()).unwrap();
        assert!(output.contains("\"succeeded\": 1"));
        assert!(output.contains("hamilton.pdf"));
        assert!(output.contains("could not be determined"));
    }

    #[test]
    fn test_quiet_summary_lists_new_names_only() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_summary(&create_test_summary()).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("----AAAAA.pdf"));
        assert!(!output.contains("gibberish"));
    }

    #[test]
    fn test_table_summary_includes_totals() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&create_test_summary()).unwrap();
        assert!(output.contains("hamilton.pdf"));
        assert!(output.contains("2 processed, 1 renamed, 1 failed"));
    }

    #[test]
    fn test_statistics_table() {
        let mut stats = Statistics::default();
        stats.total_documents = 3;
        stats.by_type.insert("caselaw".into(), 3);
        stats.allocated_codes = 3;
        stats.next_code_index = 3;

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_statistics(&stats).unwrap();
        assert!(output.contains("caselaw"));
        assert!(output.contains("Next code index"));
    }
}
