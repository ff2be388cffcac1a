//! Output formatting and styling module.
//!
//! All user-facing CLI output goes through [`OutputFormatter`]: colored
//! status lines, the placement log, progress bars and summary tables.
//! Diagnostics go to the `log` facade instead.

use crate::placement::{FileCopyEntry, PlacementLog, PlacementStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use projorg::output::OutputFormatter;
    /// OutputFormatter::success("Project created successfully!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for a multi-file placement.
    ///
    /// The bar draws to stderr and stays hidden when that is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Formats one placement log entry, e.g.
    /// `12:03:44 ✓ photo.png [png] → Images (/srv/Trip/Images/photo.png)`.
    pub fn entry_line(entry: &FileCopyEntry) -> String {
        let type_info = if entry.extension.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.extension)
        };
        let time = entry.started_at.format("%H:%M:%S");

        match &entry.status {
            PlacementStatus::Complete => {
                let destination = entry
                    .destination
                    .as_ref()
                    .map(|d| format!(" ({})", d.display().to_string().dimmed()))
                    .unwrap_or_default();
                format!(
                    "{} {} {}{} → {}{}",
                    time.to_string().dimmed(),
                    "✓".green(),
                    entry.filename,
                    type_info,
                    entry.category,
                    destination
                )
            }
            PlacementStatus::Failed(_) => format!(
                "{} {} {}{} {}",
                time.to_string().dimmed(),
                "✗".red(),
                entry.filename,
                type_info,
                entry.status.to_string().red()
            ),
            PlacementStatus::Processing => format!(
                "{} {} {}{} {}",
                time.to_string().dimmed(),
                "…".cyan(),
                entry.filename,
                type_info,
                entry.status
            ),
        }
    }

    /// Prints a summary table with placed file counts by category.
    pub fn summary_table(log: &PlacementLog) {
        let mut category_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for entry in log.entries().iter().filter(|e| e.status.is_complete()) {
            *category_counts.entry(entry.category.dir_name()).or_insert(0) += 1;
        }
        let failed = log.failed_count();

        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }
        if failed > 0 {
            println!(
                "{:<width$} | {} {}",
                "Failed",
                failed.to_string().red(),
                plural(failed),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            log.len().to_string().green().bold(),
            plural(log.len()),
            width = max_category_len
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::Local;
    use std::path::PathBuf;

    fn entry(status: PlacementStatus) -> FileCopyEntry {
        FileCopyEntry {
            filename: "photo.png".to_string(),
            extension: "png".to_string(),
            category: Category::Images,
            status,
            destination: Some(PathBuf::from("/root/Trip/Images/photo.png")),
            started_at: Local::now(),
        }
    }

    #[test]
    fn test_entry_line_complete() {
        colored::control::set_override(false);
        let line = OutputFormatter::entry_line(&entry(PlacementStatus::Complete));
        assert!(line.contains("photo.png [png] → Images (/root/Trip/Images/photo.png)"));
    }

    #[test]
    fn test_entry_line_failed() {
        colored::control::set_override(false);
        let line = OutputFormatter::entry_line(&entry(PlacementStatus::Failed(
            "disk full".to_string(),
        )));
        assert!(line.contains("Failed: disk full"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "file");
        assert_eq!(plural(0), "files");
        assert_eq!(plural(2), "files");
    }
}
