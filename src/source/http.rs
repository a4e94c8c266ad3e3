use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::source::provider::DataSource;

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/csv, text/plain, */*"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("skilltrends/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn download(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Source(format!(
                "Failed to download {}: {}",
                self.url, status
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        tracing::info!("Downloading data from: {}", self.url);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Downloading skill data...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.download().await;

        spinner.finish_and_clear();

        let text = result?;
        tracing::debug!("Downloaded {} bytes", text.len());
        Ok(text)
    }

    fn describe(&self) -> &str {
        &self.url
    }
}
