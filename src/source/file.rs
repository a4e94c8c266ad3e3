use async_trait::async_trait;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::error::Result;
use crate::source::provider::DataSource;

pub struct FileSource {
    path: PathBuf,
    display: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        tracing::info!("Reading data from file: {}", self.display);
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(text)
    }

    fn describe(&self) -> &str {
        &self.display
    }

    async fn cache_key(&self) -> Result<String> {
        let canonical = tokio::fs::canonicalize(&self.path).await?;
        Ok(canonical.display().to_string())
    }

    async fn fingerprint(&self) -> Result<Option<String>> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Ok(Some(format!("{}:{}", metadata.len(), modified)))
    }
}
