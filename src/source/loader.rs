use crate::error::{Error, Result};
use crate::models::{Column, PostingSkillRow, SkillTable};
use crate::source::file::FileSource;
use crate::source::http::HttpSource;
use crate::source::provider::DataSource;
use crate::storage::Storage;

/// Cell values read as missing: the default NA markers of pandas' `read_csv`.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy)]
pub struct Cleaning {
    pub fill_missing_company: bool,
}

impl Default for Cleaning {
    fn default() -> Self {
        Self {
            fill_missing_company: true,
        }
    }
}

impl Cleaning {
    pub fn apply(&self, table: SkillTable) -> SkillTable {
        if self.fill_missing_company {
            table.fill_missing_company()
        } else {
            table
        }
    }
}

pub fn source_for(location: &str) -> Result<Box<dyn DataSource>> {
    let lower = location.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Parses the exploded CSV. Rows without a skill are dropped; absent columns are left out
/// of the table's column set instead of failing here. Short rows read as trailing nulls,
/// rows longer than the header are an error.
pub fn parse_csv(text: &str) -> Result<SkillTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let positions: Vec<(Column, usize)> = Column::ALL
        .into_iter()
        .filter_map(|column| {
            headers
                .iter()
                .position(|h| h.trim() == column.header())
                .map(|i| (column, i))
        })
        .collect();
    let position = |column: Column| {
        positions
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, i)| *i)
    };

    let skill_idx = position(Column::Skill);
    let location_idx = position(Column::Location);
    let company_idx = position(Column::CompanyName);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(Error::Source(format!(
                "line {}: expected {} fields, found {}",
                line,
                headers.len(),
                record.len()
            )));
        }
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|v| !NA_VALUES.contains(v))
        };

        match cell(skill_idx) {
            Some(skill) => rows.push(PostingSkillRow::new(
                skill,
                cell(location_idx),
                cell(company_idx),
            )),
            None => dropped += 1,
        }
    }

    if skill_idx.is_none() {
        tracing::warn!("Source has no '{}' column", Column::Skill.header());
    }
    if dropped > 0 {
        tracing::debug!("Dropped {} rows without a skill", dropped);
    }

    Ok(SkillTable::new(positions.into_iter().map(|(c, _)| c), rows))
}

/// Loads the table: from the snapshot when one matches the source's current fingerprint,
/// otherwise from the source, saving a new snapshot when `storage` is given.
pub async fn load_table(
    source: &dyn DataSource,
    storage: Option<&Storage>,
    refresh: bool,
    cleaning: Cleaning,
) -> Result<SkillTable> {
    let key = source.describe();

    if let (Some(storage), false) = (storage, refresh) {
        let cache_key = source.cache_key().await?;
        let fingerprint = source.fingerprint().await?;
        if let Some(cached) = storage.get_table(&cache_key, fingerprint.as_deref())? {
            tracing::info!(
                "Using cached table for {} from {}",
                key,
                cached.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            return Ok(cleaning.apply(cached.table));
        }
    }

    // Fingerprint before reading so a concurrent edit leaves the snapshot stale
    let fingerprint = match storage {
        Some(_) => source.fingerprint().await?,
        None => None,
    };
    let text = source.fetch().await?;
    let table = parse_csv(&text)?;
    tracing::info!("Loaded {} skill rows from {}", table.len(), key);

    if let Some(storage) = storage {
        let cache_key = source.cache_key().await?;
        storage.save_table(&cache_key, fingerprint.as_deref(), &table)?;
        tracing::debug!("Table snapshot saved for {}", key);
    }

    Ok(cleaning.apply(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAMPLE: &str = "\
title,extracted_skills,location,companyName
Data Scientist,Python,Remote,A
Data Scientist,SQL,Remote,
Analyst,,NYC,B
Analyst,Excel,,NaN
";

    struct StaticSource {
        text: &'static str,
        fetches: AtomicUsize,
    }

    impl StaticSource {
        fn new(text: &'static str) -> Self {
            Self {
                text,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        async fn fetch(&self) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }

        fn describe(&self) -> &str {
            "memory://sample"
        }
    }

    #[test]
    fn test_parse_drops_rows_without_skill() {
        let table = parse_csv(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.has_column(Column::Skill));
        assert_eq!(
            table.rows()[1],
            PostingSkillRow::new("SQL", Some("Remote"), None)
        );
        assert_eq!(table.rows()[2], PostingSkillRow::new("Excel", None, None));
    }

    #[test]
    fn test_parse_without_skill_column() {
        let table = parse_csv("location,companyName\nRemote,A\n").unwrap();
        assert!(!table.has_column(Column::Skill));
        assert!(table.has_column(Column::Location));
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_strips_bom() {
        let table = parse_csv("\u{feff}extracted_skills,location\nRust,Berlin\n").unwrap();
        assert!(table.has_column(Column::Skill));
        assert!(!table.has_column(Column::CompanyName));
        assert_eq!(table.rows()[0].skill, "Rust");
    }

    #[test]
    fn test_parse_row_longer_than_header() {
        let err = parse_csv("extracted_skills,location\nPython,Remote,extra\n").unwrap_err();
        assert!(matches!(err, Error::Source(_)));
        assert!(err.to_string().contains("expected 2 fields, found 3"));
    }

    #[test]
    fn test_parse_reads_none_as_missing() {
        let table = parse_csv(
            "extracted_skills,location,companyName\nPython,Remote,None\nNone,NYC,A\nSQL,1.#QNAN,#N/A N/A\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].company_name, None);
        assert_eq!(table.rows()[1], PostingSkillRow::new("SQL", None, None));

        let filled = Cleaning::default().apply(table);
        assert_eq!(filled.rows()[0].company_name.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_parse_short_row_fills_nulls() {
        let table = parse_csv("extracted_skills,location,companyName\nPython,Remote\nSQL\n").unwrap();
        assert_eq!(table.rows()[0], PostingSkillRow::new("Python", Some("Remote"), None));
        assert_eq!(table.rows()[1], PostingSkillRow::new("SQL", None, None));
    }

    #[test]
    fn test_cleaning_toggle() {
        let table = parse_csv(SAMPLE).unwrap();
        let kept = Cleaning {
            fill_missing_company: false,
        }
        .apply(table.clone());
        assert_eq!(kept.rows()[1].company_name, None);

        let filled = Cleaning::default().apply(table);
        assert_eq!(filled.rows()[1].company_name.as_deref(), Some("Unknown"));
        assert_eq!(filled.rows()[2].company_name.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_source_for_picks_by_scheme() {
        let http = source_for("https://example.com/skills.csv").unwrap();
        assert_eq!(http.describe(), "https://example.com/skills.csv");
        let file = source_for("data/skills.csv").unwrap();
        assert_eq!(file.describe(), "data/skills.csv");
    }

    #[tokio::test]
    async fn test_load_table_uses_cache_once_loaded() {
        let storage = Storage::in_memory().unwrap();
        let source = StaticSource::new(SAMPLE);

        let first = load_table(&source, Some(&storage), false, Cleaning::default())
            .await
            .unwrap();
        let second = load_table(&source, Some(&storage), false, Cleaning::default())
            .await
            .unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first.rows(), second.rows());

        load_table(&source, Some(&storage), true, Cleaning::default())
            .await
            .unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_edited_file_invalidates_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(&path, "extracted_skills,location,companyName\nPython,Remote,A\n").unwrap();

        let storage = Storage::in_memory().unwrap();
        let source = FileSource::new(&path);
        let first = load_table(&source, Some(&storage), false, Cleaning::default())
            .await
            .unwrap();
        assert_eq!(first.rows()[0].skill, "Python");

        std::fs::write(
            &path,
            "extracted_skills,location,companyName\nRust,NYC,B\nGo,NYC,B\n",
        )
        .unwrap();
        let second = load_table(&source, Some(&storage), false, Cleaning::default())
            .await
            .unwrap();
        assert_eq!(
            second.rows(),
            &[
                PostingSkillRow::new("Rust", Some("NYC"), Some("B")),
                PostingSkillRow::new("Go", Some("NYC"), Some("B")),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_table_without_cache() {
        let source = StaticSource::new(SAMPLE);
        let table = load_table(&source, None, false, Cleaning::default())
            .await
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
