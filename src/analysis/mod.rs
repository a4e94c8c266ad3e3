pub mod filters;
pub mod ranking;
pub mod dashboard;

pub use filters::{FilterSet, FilterValue, ALL};
pub use ranking::{count_skills, rank_filtered, rank_skills};
pub use dashboard::{Dashboard, FilterOptions, Selection};
