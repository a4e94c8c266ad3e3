use async_trait::async_trait;
use crate::error::Result;

/// Where the exploded posting CSV comes from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Raw CSV text of the source.
    async fn fetch(&self) -> Result<String>;
    /// Path or URL as given by the user.
    fn describe(&self) -> &str;

    /// Key the table snapshot is stored under.
    async fn cache_key(&self) -> Result<String> {
        Ok(self.describe().to_string())
    }

    /// Identifies the current content; a snapshot taken under another fingerprint is stale.
    async fn fingerprint(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
