//! Backend health and configuration-check types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::translation::LanguageMap;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Anything else the backend reports (version, timestamp, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Body of `GET /api/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCheck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiCheck {
    /// Whether the backend has an upstream API key configured.
    pub fn is_configured(&self) -> bool {
        self.status == "ok"
    }
}

/// Result of probing the translation backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    /// `/api/health` answered.
    Healthy(HealthResponse),
    /// `/api/health` failed but `/api/languages` answered; the language list
    /// is kept so callers do not need to fetch it again.
    ReachableViaLanguages(LanguageMap),
}

impl BackendStatus {
    pub fn languages(&self) -> Option<&LanguageMap> {
        match self {
            Self::Healthy(_) => None,
            Self::ReachableViaLanguages(langs) => Some(langs),
        }
    }
}
