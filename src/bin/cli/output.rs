//! Output formatting for CLI operations.

use lovepatch::{EntryOutcome, Error, PatchReport};
use serde_json::json;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the result of a patch run
    fn format_report(&self, report: &PatchReport) -> String;

    /// Formats a fatal error
    fn format_error(&self, error: &Error) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &PatchReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("Input:          {}\n", report.paths.input.display()));
        output.push_str(&format!(
            "  Size:         {}\n",
            humanize_bytes(report.input_size)
        ));
        match report.stub_format {
            Some(format) => output.push_str(&format!(
                "  Stub:         {} ({})\n",
                format,
                humanize_bytes(report.offset() as u64)
            )),
            None => output.push_str("  Stub:         none (plain archive)\n"),
        }
        output.push_str(&format!("  Archive at:   offset {}\n", report.offset()));
        output.push_str(&format!("  Entries read: {}\n", report.entries_read));

        for skipped in &report.skipped {
            output.push_str(&format!("  Skipped:      {}\n", skipped));
        }

        output.push('\n');
        if report.transform.entries.is_empty() {
            output.push_str("No matching entry found.\n");
        }
        for entry in &report.transform.entries {
            let line = match entry.outcome {
                EntryOutcome::Modified => "injected debugger bootstrap",
                EntryOutcome::AlreadyApplied => "already patched",
                EntryOutcome::MarkerNotFound => "no `function love.run(` found",
            };
            output.push_str(&format!("{}: {}\n", entry.path, line));
        }

        if !report.changed() {
            output.push_str("Nothing changed, no files written.\n");
            return output;
        }

        output.push('\n');
        for artifact in &report.artifacts {
            output.push_str(&format!(
                "Wrote {:<14} {}\n",
                artifact.kind(),
                artifact.path().display()
            ));
        }
        if let (Some(archive), Some(total)) = (report.archive_size, report.output_size) {
            output.push_str(&format!(
                "Archive {} -> patched file {}\n",
                humanize_bytes(archive),
                humanize_bytes(total)
            ));
        }
        for warning in &report.warnings {
            output.push_str(&format!("Warning: {}\n", warning));
        }

        output
    }

    fn format_error(&self, error: &Error) -> String {
        format!("Error: {}", error)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &PatchReport) -> String {
        let obj = json!({
            "input": report.paths.input.display().to_string(),
            "input_size": report.input_size,
            "offset": report.offset(),
            "signature_found": report.scan.is_found(),
            "stub_format": report.stub_format.map(|f| f.name()),
            "entries_read": report.entries_read,
            "skipped": report.skipped.iter().map(|s| json!({
                "index": s.index,
                "name": s.name,
                "reason": s.reason,
            })).collect::<Vec<_>>(),
            "changed": report.changed(),
            "entries": report.transform.entries.iter().map(|e| json!({
                "path": e.path,
                "transform": e.transform,
                "outcome": e.outcome.as_str(),
            })).collect::<Vec<_>>(),
            "archive_size": report.archive_size,
            "output_size": report.output_size,
            "files_unpacked": report.materialized.as_ref().map(|m| m.files_written),
            "artifacts": report.artifacts.iter().map(|a| json!({
                "kind": a.kind(),
                "path": a.path().display().to_string(),
            })).collect::<Vec<_>>(),
            "warnings": report.warnings,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &Error) -> String {
        let obj = json!({
            "error": error.to_string(),
            "entry": error.entry_name(),
        });
        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Formats bytes as human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
