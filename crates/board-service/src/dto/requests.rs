//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; bodies also implement `Validate`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Submit feedback request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Comment must be between 1 and 500 characters"))]
    pub comment: String,

    /// Emoji rating; absent for boards without ratings
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[serde(default)]
    pub emoji: Option<i32>,

    /// Submission time; the server clock is used when absent
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query string of `GET /feedback`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, comment: &str, emoji: Option<i32>) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            name: name.to_string(),
            comment: comment.to_string(),
            emoji,
            created_at: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("Al", "Good service but room for improvement.", Some(4))
            .validate()
            .is_ok());
        assert!(request("Al", "x", None).validate().is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let errors = request("A", "fine", Some(3)).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(!fields.contains_key("comment"));
    }

    #[test]
    fn test_comment_bounds() {
        assert!(request("Alice", "", Some(3)).validate().is_err());
        assert!(request("Alice", &"x".repeat(500), Some(3)).validate().is_ok());
        assert!(request("Alice", &"x".repeat(501), Some(3)).validate().is_err());
        // Counted in characters, not bytes
        assert!(request("Alice", &"😄".repeat(500), Some(3)).validate().is_ok());
    }

    #[test]
    fn test_rating_range() {
        for bad in [0, 6, -1] {
            let errors = request("Alice", "ok", Some(bad)).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("emoji"));
        }
    }

    #[test]
    fn test_deserialize_minimal_body() {
        let req: CreateFeedbackRequest =
            serde_json::from_str(r#"{"name":"Bob","comment":"Nice"}"#).unwrap();
        assert!(req.emoji.is_none());
        assert!(req.created_at.is_none());

        let req: CreateFeedbackRequest = serde_json::from_str(
            r#"{"name":"Bob","comment":"Nice","emoji":5,"created_at":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.emoji, Some(5));
        assert!(req.created_at.is_some());
    }
}
