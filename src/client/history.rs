//! Translation history client.

use super::read_json;
use crate::config::ClientConfig;
use crate::error::{Result, TranslatorError};
use crate::retry::RetryExecutor;
use crate::types::{DeleteResponse, HistoryQuery, HistoryStats, Page, TranslationRecord};

/// Client for the history service (paginated search over stored translations).
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HistoryClient {
    pub fn new(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| TranslatorError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self::new(config, http))
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        match &self.config.retry_policy {
            Some(policy) => RetryExecutor::new(policy.clone()).execute(operation).await,
            None => {
                let mut operation = operation;
                operation().await
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.with_retry(move || async move {
            let response = self
                .http
                .get(url)
                .timeout(self.config.request_timeout)
                .send()
                .await?;
            read_json(response).await
        })
        .await
    }

    /// One page of records matching `query`.
    pub async fn search(&self, query: &HistoryQuery) -> Result<Page<TranslationRecord>> {
        let url = self.config.history_url("/translations/search");
        let pairs = query.to_query_pairs();
        tracing::debug!(target: "fanyi::history", page = query.page, size = query.size, text = ?query.text, "searching history");
        let (url, pairs) = (&url, &pairs);
        self.with_retry(move || async move {
            let response = self
                .http
                .get(url)
                .query(pairs)
                .timeout(self.config.request_timeout)
                .send()
                .await?;
            read_json(response).await
        })
        .await
    }

    pub async fn get(&self, id: i64) -> Result<TranslationRecord> {
        let url = self.config.history_url(&format!("/translations/{id}"));
        self.get_json(&url).await
    }

    pub async fn stats(&self) -> Result<HistoryStats> {
        let url = self.config.history_url("/translations/stats");
        self.get_json(&url).await
    }

    /// Delete a record; returns whether the service reported it deleted.
    ///
    /// Deletion is not retried.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let url = self.config.history_url(&format!("/translations/{id}"));
        tracing::debug!(target: "fanyi::history", id, "deleting history record");
        let response = self
            .http
            .delete(&url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        let response: DeleteResponse = read_json(response).await?;
        Ok(response.deleted)
    }
}
