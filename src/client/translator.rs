//! Translation backend client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use uuid::Uuid;

use super::{TranslationService, ensure_success, read_error_body, read_json};
use crate::config::ClientConfig;
use crate::error::{Result, TranslatorError};
use crate::retry::RetryExecutor;
use crate::streaming::{TranslationStream, decode_byte_stream};
use crate::types::{
    ApiCheck, BackendStatus, HealthResponse, LanguageMap, TranslateRequest, TranslateResponse,
};

const TRANSLATE_PATH: &str = "/api/translate";
const LANGUAGES_PATH: &str = "/api/languages";
const HEALTH_PATH: &str = "/api/health";
const CHECK_PATH: &str = "/api/check";

/// Client for the translation backend.
#[derive(Debug, Clone)]
pub struct TranslatorClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TranslatorClient {
    /// Wrap an existing `reqwest::Client`.
    ///
    /// A total timeout configured on `http` also cuts off streaming bodies.
    pub fn new(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// Validate `config` and build a dedicated HTTP client for it.
    ///
    /// The client carries no total timeout; plain requests set their own and
    /// streams run until they end or are cancelled.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| TranslatorError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self::new(config, http))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn translate_once(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        let url = self.config.api_url(TRANSLATE_PATH);
        let request_id = Uuid::new_v4();
        tracing::debug!(
            target: "fanyi::http",
            %request_id,
            url = %url,
            source_lang = %request.source_lang,
            target_lang = %request.target_lang,
            chars = request.text.chars().count(),
            "sending translation request"
        );

        let response = self
            .http
            .post(&url)
            .timeout(self.config.translate_timeout)
            .json(request)
            .send()
            .await?;
        let result: TranslateResponse = read_json(response).await?;
        tracing::debug!(target: "fanyi::http", %request_id, "translation complete");
        Ok(result)
    }

    /// Language code -> display name, as offered by the backend.
    pub async fn languages(&self) -> Result<LanguageMap> {
        self.fetch_languages(self.config.request_timeout).await
    }

    async fn fetch_languages(&self, timeout: std::time::Duration) -> Result<LanguageMap> {
        let response = self
            .http
            .get(self.config.api_url(LANGUAGES_PATH))
            .timeout(timeout)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.config.api_url(HEALTH_PATH))
            .timeout(self.config.health_timeout)
            .send()
            .await?;
        read_json(response).await
    }

    /// Probe `/api/health`, falling back to `/api/languages`.
    pub async fn probe_backend(&self) -> Result<BackendStatus> {
        match self.health().await {
            Ok(health) => Ok(BackendStatus::Healthy(health)),
            Err(e) => {
                tracing::warn!(target: "fanyi::http", error = %e, "health check failed, trying languages endpoint");
                let languages = self
                    .fetch_languages(self.config.health_timeout)
                    .await?;
                Ok(BackendStatus::ReachableViaLanguages(languages))
            }
        }
    }

    /// Ask whether the backend has an upstream API key configured.
    ///
    /// The backend answers "not configured" with a 500 and a status body,
    /// which is returned as a normal `ApiCheck` rather than an error.
    pub async fn check_api(&self) -> Result<ApiCheck> {
        let response = self
            .http
            .get(self.config.api_url(CHECK_PATH))
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        if response.status().is_success() {
            return read_json(response).await;
        }
        let status = response.status().as_u16();
        let body = read_error_body(response).await;
        match serde_json::from_str::<ApiCheck>(&body) {
            Ok(check) => Ok(check),
            Err(_) => Err(crate::error::classify_http_error(status, &body)),
        }
    }
}

#[async_trait]
impl TranslationService for TranslatorClient {
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        request.validate()?;
        match &self.config.retry_policy {
            Some(policy) => {
                RetryExecutor::new(policy.clone())
                    .execute(move || self.translate_once(request))
                    .await
            }
            None => self.translate_once(request).await,
        }
    }

    /// The stream is not bounded by `request_timeout`; only connecting is.
    /// A stalled stream ends when its session is cancelled or superseded.
    async fn translate_stream(&self, request: &TranslateRequest) -> Result<TranslationStream> {
        request.validate()?;
        let url = self.config.api_url(&self.config.stream_path);
        let request_id = Uuid::new_v4();
        tracing::debug!(
            target: "fanyi::http",
            %request_id,
            url = %url,
            source_lang = %request.source_lang,
            target_lang = %request.target_lang,
            "opening translation stream"
        );

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        tracing::debug!(target: "fanyi::http", %request_id, status = response.status().as_u16(), "stream opened");

        Ok(decode_byte_stream(response.bytes_stream()))
    }
}
