use crate::models::SkillReport;

pub fn text_table(report: &SkillReport) -> String {
    let mut output = String::new();
    let width = report
        .skills
        .iter()
        .map(|s| s.skill.chars().count())
        .max()
        .unwrap_or(0)
        .max("skill".len());

    output.push_str(&format!("{:<width$}  count\n", "skill", width = width));
    for entry in &report.skills {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            entry.skill,
            entry.count,
            width = width
        ));
    }

    output
}

pub fn markdown(report: &SkillReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.title()));

    if report.is_empty() {
        output.push_str("_No skills match the selected filters._\n");
        return output;
    }

    output.push_str("| Rank | Skill | Count |\n");
    output.push_str("|------|-------|-------|\n");

    for (rank, entry) in report.skills.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            rank + 1,
            entry.skill.replace('|', "\\|"),
            entry.count
        ));
    }

    output.push_str(&format!(
        "\n*{} of {} rows matched*\n",
        report.filtered_rows, report.total_rows
    ));

    output
}
