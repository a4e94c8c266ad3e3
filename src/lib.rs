pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod analysis;
pub mod render;
pub mod storage;

pub use config::{Config, DashboardConfig};
pub use error::{Error, Result};
pub use analysis::{rank_skills, Dashboard, FilterSet, FilterValue, Selection};
pub use models::{PostingSkillRow, SkillCount, SkillReport, SkillTable};
pub use source::{DataSource, FileSource, HttpSource};
pub use storage::Storage;
