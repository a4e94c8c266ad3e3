pub mod chart;
pub mod table;
pub mod export;

use clap::ValueEnum;

use crate::error::Result;
use crate::models::SkillReport;

pub use chart::bar_chart;
pub use export::{download_filename, to_csv, write_download};
pub use table::{markdown, text_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

/// Renders a report; `show_table` appends the raw counts to the text chart.
pub fn render(report: &SkillReport, format: OutputFormat, show_table: bool) -> Result<String> {
    let output = match format {
        OutputFormat::Text => {
            let mut output = bar_chart(report);
            if show_table && !report.is_empty() {
                output.push_str("\nRaw skill counts:\n");
                output.push_str(&text_table(report));
            }
            output
        }
        OutputFormat::Markdown => markdown(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Csv => to_csv(report)?,
    };
    Ok(output)
}
