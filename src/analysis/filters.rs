use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Column, PostingSkillRow};

/// Selection value that disables a filter.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilterValue {
    #[default]
    Any,
    Exact(String),
}

impl FilterValue {
    pub fn exact(value: impl Into<String>) -> Self {
        FilterValue::Exact(value.into())
    }

    /// Case-sensitive equality; a null cell never matches a concrete value.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::Any => true,
            FilterValue::Exact(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FilterValue::Any)
    }

    pub fn label(&self, all_label: &str) -> String {
        match self {
            FilterValue::Any => all_label.to_string(),
            FilterValue::Exact(value) => value.clone(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(selection: &str) -> Self {
        if selection == ALL {
            FilterValue::Any
        } else {
            FilterValue::Exact(selection.to_string())
        }
    }
}

impl From<String> for FilterValue {
    fn from(selection: String) -> Self {
        FilterValue::from(selection.as_str())
    }
}

impl From<&FilterValue> for FilterValue {
    fn from(value: &FilterValue) -> Self {
        value.clone()
    }
}

/// Conjunction of equality filters over the filterable columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub location: FilterValue,
    pub company_name: FilterValue,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter set from (column name, value) pairs.
    ///
    /// Only `location` and `companyName` are filterable; any other name is rejected.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<FilterValue>,
    {
        let mut filters = Self::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            let column = Column::from_name(name).ok_or_else(|| {
                Error::invalid_input(format!("unrecognized filter column '{}'", name))
            })?;
            filters.set(column, value.into())?;
        }
        Ok(filters)
    }

    pub fn set(&mut self, column: Column, value: FilterValue) -> Result<()> {
        match column {
            Column::Location => self.location = value,
            Column::CompanyName => self.company_name = value,
            Column::Skill => {
                return Err(Error::invalid_input(format!(
                    "column '{}' cannot be filtered",
                    column
                )))
            }
        }
        Ok(())
    }

    pub fn with_location(mut self, value: impl Into<FilterValue>) -> Self {
        self.location = value.into();
        self
    }

    pub fn with_company(mut self, value: impl Into<FilterValue>) -> Self {
        self.company_name = value.into();
        self
    }

    pub fn matches(&self, row: &PostingSkillRow) -> bool {
        self.location.matches(row.value(Column::Location))
            && self.company_name.matches(row.value(Column::CompanyName))
    }

    pub fn apply<'a>(
        &'a self,
        rows: &'a [PostingSkillRow],
    ) -> impl Iterator<Item = &'a PostingSkillRow> + 'a {
        rows.iter().filter(move |row| self.matches(row))
    }

    pub fn is_active(&self) -> bool {
        !self.location.is_any() || !self.company_name.is_any()
    }
}
