use crate::error::{Error, Result};
use std::env;
use std::ops::RangeInclusive;

pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/Syedboo/job-skills-dashboard/main/exploded_skills.csv";
pub const DEFAULT_TOP_N: i64 = 15;
pub const TOP_N_RANGE: RangeInclusive<i64> = 5..=50;

#[derive(Debug, Clone)]
pub struct Config {
    pub source: String,
    pub cache_path: String,
    pub top_n: i64,
    pub fill_missing_company: bool,
    pub company_filter: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let source = env::var("SKILLTRENDS_SOURCE").unwrap_or_else(|_| DEFAULT_SOURCE.to_string());

        let cache_path =
            env::var("SKILLTRENDS_CACHE").unwrap_or_else(|_| "skilltrends.db".to_string());

        let top_n = match env::var("SKILLTRENDS_TOP_N") {
            Ok(v) => v.trim().parse().map_err(|_| {
                Error::Config(format!("SKILLTRENDS_TOP_N must be an integer, got '{}'", v))
            })?,
            Err(_) => DEFAULT_TOP_N,
        };

        let fill_missing_company = env_flag("SKILLTRENDS_FILL_MISSING_COMPANY", true);
        let company_filter = env_flag("SKILLTRENDS_COMPANY_FILTER", true);

        Ok(Self {
            source,
            cache_path,
            top_n,
            fill_missing_company,
            company_filter,
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| parse_flag(&v, default))
        .unwrap_or(default)
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

/// Settings of the dashboard surface wrapped around the ranking pipeline.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub top_n_range: RangeInclusive<i64>,
    pub company_filter: bool,
    pub fill_missing_company: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n_range: TOP_N_RANGE,
            company_filter: true,
            fill_missing_company: true,
        }
    }
}

impl From<&Config> for DashboardConfig {
    fn from(config: &Config) -> Self {
        Self {
            top_n_range: TOP_N_RANGE,
            company_filter: config.company_filter,
            fill_missing_company: config.fill_missing_company,
        }
    }
}
