//! Batch summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::BatchResult;

/// Counts describing a finished batch
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub requested: usize,
    pub scanned: usize,
    pub skipped: usize,
    pub with_selection: usize,
    pub total_selected: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn from_batch(batch: &BatchResult, elapsed: Duration) -> Self {
        Self {
            requested: batch.requested(),
            scanned: batch.scanned(),
            skipped: batch.skipped().count(),
            with_selection: batch.with_selection(),
            total_selected: batch.total_selected(),
            elapsed,
        }
    }

    /// Render the summary as a table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Datasets Requested"),
            Cell::new(self.requested),
        ]);

        table.add_row(vec![
            Cell::new("🔬 Datasets Scanned"),
            Cell::new(self.scanned).fg(Color::Green),
        ]);

        table.add_row(vec![
            Cell::new("⏭️  Datasets Skipped"),
            Cell::new(self.skipped).fg(if self.skipped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🎯 Datasets With Selection"),
            Cell::new(self.with_selection),
        ]);

        table.add_row(vec![
            Cell::new("✅ Selected Subsets"),
            Cell::new(self.total_selected)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64())).fg(Color::Cyan),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("SCAN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}
