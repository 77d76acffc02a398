//! Translation history types (history service, camelCase JSON).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One stored translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub id: i64,
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// A page of results as serialized by the history service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Search/pagination parameters for `GET /translations/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub text: Option<String>,
    pub user_id: Option<String>,
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDirection,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            text: None,
            user_id: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: "createdAt".to_string(),
            sort_dir: SortDirection::Desc,
        }
    }
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by text; blank input clears the filter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, dir: SortDirection) -> Self {
        self.sort_by = sort_by.into();
        self.sort_dir = dir;
        self
    }

    /// Move to `page` if it exists in a result set of `total_pages` pages.
    pub fn goto(&self, page: u32, total_pages: u32) -> Option<Self> {
        if page < total_pages {
            Some(self.clone().with_page(page))
        } else {
            None
        }
    }

    /// Query-string pairs in the order the service documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(text) = &self.text {
            pairs.push(("text", text.clone()));
        }
        if let Some(user_id) = &self.user_id {
            pairs.push(("userId", user_id.clone()));
        }
        pairs.push(("sortBy", self.sort_by.clone()));
        pairs.push(("sortDir", self.sort_dir.as_str().to_string()));
        pairs
    }
}

/// Body of `GET /translations/stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    #[serde(default)]
    pub total_translations: u64,
    #[serde(default)]
    pub today_translations: u64,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Body of `DELETE /translations/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub deleted: bool,
}
