use std::sync::Arc;

use crate::analysis::filters::{FilterSet, FilterValue, ALL};
use crate::analysis::ranking::{positive_top_n, rank_filtered};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::models::{Column, SkillReport, SkillTable};

/// One set of dashboard parameters.
#[derive(Debug, Clone)]
pub struct Selection {
    pub location: FilterValue,
    pub company: FilterValue,
    pub top_n: i64,
}

impl Selection {
    pub fn new(
        location: impl Into<FilterValue>,
        company: impl Into<FilterValue>,
        top_n: i64,
    ) -> Self {
        Self {
            location: location.into(),
            company: company.into(),
            top_n,
        }
    }
}

/// Sorted distinct values for each filter, each list led by [`ALL`].
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub companies: Vec<String>,
}

/// Holds the loaded table and turns selections into reports.
pub struct Dashboard {
    table: Arc<SkillTable>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(table: Arc<SkillTable>, config: DashboardConfig) -> Self {
        Self { table, config }
    }

    pub fn filter_options(&self) -> FilterOptions {
        let with_all = |mut values: Vec<String>| {
            values.insert(0, ALL.to_string());
            values
        };

        let companies = if self.config.company_filter {
            with_all(self.table.distinct_values(Column::CompanyName))
        } else {
            Vec::new()
        };

        FilterOptions {
            locations: with_all(self.table.distinct_values(Column::Location)),
            companies,
        }
    }

    pub fn run(&self, selection: &Selection) -> Result<SkillReport> {
        if !self.config.top_n_range.contains(&selection.top_n) {
            return Err(Error::invalid_input(format!(
                "top_n must be between {} and {}, got {}",
                self.config.top_n_range.start(),
                self.config.top_n_range.end(),
                selection.top_n
            )));
        }
        let top_n = positive_top_n(selection.top_n)?;

        if !self.config.company_filter && !selection.company.is_any() {
            return Err(Error::invalid_input("company filter is disabled"));
        }

        let filters = FilterSet::new()
            .with_location(&selection.location)
            .with_company(&selection.company);

        let skills = rank_filtered(&self.table, &filters, top_n)?;
        let filtered_rows = filters.apply(self.table.rows()).count();

        tracing::debug!(
            "Ranked {} skills from {} of {} rows",
            skills.len(),
            filtered_rows,
            self.table.len()
        );

        Ok(SkillReport {
            top_n: top_n.get(),
            location_label: selection.location.label("All Locations"),
            company_label: selection.company.label("All Companies"),
            filtered_rows,
            total_rows: self.table.len(),
            skills,
        })
    }
}
