//! Prompt data model and the JSON bodies exchanged with the proxy and the
//! upstream backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A verified user identifier.
///
/// Only session verification should produce one for the proxy; the upstream
/// credential (`Bearer <user-id>`) is always derived from this value and
/// never from anything the client claims.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header sent upstream.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{"prompt": ...}` as returned by `GET /prompt` and `GET /api/prompt`.
///
/// The backend answers `null` when the user has no override.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBody {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl PromptBody {
    /// The prompt to show in the editor. No override displays as empty.
    pub fn into_text(self) -> String {
        self.prompt.unwrap_or_default()
    }
}

/// Body of `POST /prompt`.
///
/// The proxy forwards whatever the client put under `prompt` without
/// validating it; an absent field stays absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<serde_json::Value>,
}

impl PromptUpdate {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(serde_json::Value::String(prompt.into())),
        }
    }

    /// Extract the `prompt` member of an arbitrary JSON request body.
    pub fn from_json(body: &serde_json::Value) -> Self {
        Self {
            prompt: body.get("prompt").cloned(),
        }
    }
}

/// `{"success": true}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub const OK: Self = Self { success: true };
}

/// `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{"id": "..."}` as returned by `GET /api/session`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBody {
    pub id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_prompt_reads_as_empty() {
        let body: PromptBody = serde_json::from_value(json!({"prompt": null})).unwrap();
        assert_eq!(body.into_text(), "");

        let body: PromptBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.into_text(), "");

        let body: PromptBody = serde_json::from_value(json!({"prompt": "Be terse."})).unwrap();
        assert_eq!(body.into_text(), "Be terse.");
    }

    #[test]
    fn update_forwards_prompt_member_untouched() {
        let update = PromptUpdate::from_json(&json!({"prompt": "hi", "extra": 1}));
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"prompt": "hi"}));

        let update = PromptUpdate::from_json(&json!({"prompt": 42}));
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"prompt": 42}));

        let update = PromptUpdate::from_json(&json!({"other": true}));
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));
    }

    #[test]
    fn user_id_bearer_header() {
        let user = UserId::new("u1");
        assert_eq!(user.bearer(), "Bearer u1");
        assert_eq!(user.to_string(), "u1");
        assert_eq!(serde_json::to_value(&user).unwrap(), json!("u1"));
    }

    #[test]
    fn success_and_error_bodies_serialize() {
        assert_eq!(
            serde_json::to_value(SuccessBody::OK).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(ErrorBody::new("Unauthorized")).unwrap(),
            json!({"error": "Unauthorized"})
        );
    }
}
