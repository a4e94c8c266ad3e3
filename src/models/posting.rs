use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Logical columns of the exploded posting table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Skill,
    Location,
    CompanyName,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Skill, Column::Location, Column::CompanyName];

    /// Name used by callers when referring to the column, e.g. in filters.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Skill => "skill",
            Column::Location => "location",
            Column::CompanyName => "companyName",
        }
    }

    /// Header of the column in the exploded CSV.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Skill => "extracted_skills",
            Column::Location => "location",
            Column::CompanyName => "companyName",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One (job posting, skill) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostingSkillRow {
    pub skill: String,
    pub location: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
}

impl PostingSkillRow {
    pub fn new(
        skill: impl Into<String>,
        location: Option<&str>,
        company_name: Option<&str>,
    ) -> Self {
        Self {
            skill: skill.into(),
            location: location.map(str::to_string),
            company_name: company_name.map(str::to_string),
        }
    }

    pub fn value(&self, column: Column) -> Option<&str> {
        match column {
            Column::Skill => Some(self.skill.as_str()),
            Column::Location => self.location.as_deref(),
            Column::CompanyName => self.company_name.as_deref(),
        }
    }
}

/// The loaded posting table. Read-only once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillTable {
    columns: BTreeSet<Column>,
    rows: Vec<PostingSkillRow>,
}

impl SkillTable {
    pub fn new(columns: impl IntoIterator<Item = Column>, rows: Vec<PostingSkillRow>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows,
        }
    }

    /// Table carrying every logical column.
    pub fn from_rows(rows: Vec<PostingSkillRow>) -> Self {
        Self::new(Column::ALL, rows)
    }

    pub fn rows(&self) -> &[PostingSkillRow] {
        &self.rows
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replaces missing company names with [`UNKNOWN_COMPANY`].
    pub fn fill_missing_company(mut self) -> Self {
        for row in &mut self.rows {
            if row.company_name.is_none() {
                row.company_name = Some(UNKNOWN_COMPANY.to_string());
            }
        }
        self.columns.insert(Column::CompanyName);
        self
    }

    /// Sorted distinct non-null values of a column.
    pub fn distinct_values(&self, column: Column) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.value(column))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
