use crate::models::SkillReport;

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

/// Horizontal bar chart: label, bar scaled to the largest count, then the count.
pub fn bar_chart(report: &SkillReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== {} ===\n\n", report.title()));

    if report.is_empty() {
        output.push_str("No skills match the selected filters.\n");
        return output;
    }

    let label_width = report
        .skills
        .iter()
        .map(|s| s.skill.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = report.skills.iter().map(|s| s.count).max().unwrap_or(1);

    for entry in &report.skills {
        let padding = label_width - entry.skill.chars().count();
        output.push_str(&format!(
            "  {}{} | {} {}\n",
            entry.skill,
            " ".repeat(padding),
            bar(entry.count, max_count),
            entry.count
        ));
    }

    output.push_str(&format!(
        "\nNumber of mentions, from {} of {} rows\n",
        report.filtered_rows, report.total_rows
    ));

    output
}

fn bar(count: u64, max_count: u64) -> String {
    let cells = (count as f64 / max_count.max(1) as f64 * BAR_WIDTH as f64).round() as usize;
    BAR_CHAR.to_string().repeat(cells.clamp(1, BAR_WIDTH))
}
