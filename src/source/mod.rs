pub mod provider;
pub mod file;
pub mod http;
pub mod loader;

pub use provider::DataSource;
pub use file::FileSource;
pub use http::HttpSource;
pub use loader::{load_table, parse_csv, source_for, Cleaning};
