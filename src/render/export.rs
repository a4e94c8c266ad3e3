use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::SkillReport;

/// Serializes the ranked counts as `skill,count` CSV.
pub fn to_csv(report: &SkillReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["skill", "count"])?;
    for entry in &report.skills {
        writer.write_record([entry.skill.as_str(), entry.count.to_string().as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download filename reflecting the active filters.
pub fn download_filename(report: &SkillReport) -> String {
    let sanitize = |label: &str| label.replace(['/', '\\'], "-");
    format!(
        "skills_{}_{}.csv",
        sanitize(&report.location_label),
        sanitize(&report.company_label)
    )
}

pub fn write_download(report: &SkillReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(download_filename(report));
    std::fs::write(&path, to_csv(report)?)?;
    Ok(path)
}
