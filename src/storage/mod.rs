pub mod sqlite;

pub use sqlite::{CachedTable, Storage};
