//! HTTP clients
//!
//! - [`TranslatorClient`]: translation backend (plain + streaming translate,
//!   languages, health, configuration check)
//! - [`HistoryClient`]: translation history service (search, stats, delete)

mod history;
mod translator;

pub use history::HistoryClient;
pub use translator::TranslatorClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{Result, TranslatorError, classify_http_error};
use crate::streaming::TranslationStream;
use crate::types::{TranslateRequest, TranslateResponse};

/// Backend operations the [`Translator`](crate::view::Translator) controller needs.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Plain request/response translation.
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse>;

    /// Start a streaming translation.
    ///
    /// Transport failures before the first chunk (connection, timeout,
    /// non-success status) are returned here; later failures surface as an
    /// `Err` item of the stream.
    async fn translate_stream(&self, request: &TranslateRequest) -> Result<TranslationStream>;
}

/// Return the response if its status is a success, or the classified error.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_error_body(response).await;
    let error = classify_http_error(status.as_u16(), &body);
    tracing::debug!(target: "fanyi::http", status = status.as_u16(), error = %error, "request failed");
    Err(error)
}

/// Body of a failed response, or an empty string if it cannot be read.
pub(crate) async fn read_error_body(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(target: "fanyi::http", status, error = %e, "could not read error body");
            String::new()
        }
    }
}

/// Check the status and deserialize a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TranslatorError::ParseError(format!("Unexpected response body: {e}")))
}
