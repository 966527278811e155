use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::user::User;

// ===== Success Shapes =====

/// Body of a successful login or registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Paginated list envelope, `{ "data": [...], "current_page": 1, ... }`.
/// Every posting list endpoint answers with this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next_page_url.is_some()
    }
}

// ===== Error Shape =====

/// What can be salvaged from a failed response body.
///
/// Parsed leniently: a body that is not JSON, or whose fields have unexpected
/// types, yields an empty `ErrorBody` rather than an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string);

        let mut errors = BTreeMap::new();
        if let Some(fields) = value.get("errors").and_then(Value::as_object) {
            for (field, messages) in fields {
                let messages: Vec<String> = match messages {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    Value::String(single) => vec![single.clone()],
                    _ => Vec::new(),
                };
                if !messages.is_empty() {
                    errors.insert(field.clone(), messages);
                }
            }
        }

        Self { message, errors }
    }
}
