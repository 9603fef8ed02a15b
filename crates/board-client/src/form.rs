//! Submission form
//!
//! Holds the three fields, validates them locally, and performs exactly
//! one insert per accepted submit. A second submit while one is in flight
//! is refused rather than queued.

use crate::backend::{NewFeedback, SharedBackend};
use board_core::{CommentPolicy, Rating, Snowflake};
use chrono::Utc;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use validator::{ValidationError, ValidationErrors};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;

/// Current field values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub comment: String,
    pub rating: Option<i32>,
}

/// Toast shown after a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub destructive: bool,
}

impl Notification {
    pub fn success() -> Self {
        Self {
            title: "Success!".to_string(),
            body: "Your feedback has been submitted.".to_string(),
            destructive: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            title: "Error".to_string(),
            body: "Failed to submit feedback. Please try again.".to_string(),
            destructive: true,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.title, self.body)
    }
}

/// Result of one submit action
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Another submission is still in flight
    Busy,
    /// Local validation failed; nothing was sent
    Invalid(ValidationErrors),
    Submitted {
        id: Snowflake,
        notification: Notification,
    },
    /// The backend refused or could not be reached; fields are kept
    Failed(Notification),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Submitted { notification, .. } | Self::Failed(notification) => Some(notification),
            Self::Busy | Self::Invalid(_) => None,
        }
    }
}

/// Clears the in-flight flag on every exit path
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SubmissionForm {
    backend: SharedBackend,
    policy: CommentPolicy,
    rating_required: bool,
    fields: Mutex<FormFields>,
    in_flight: AtomicBool,
}

impl SubmissionForm {
    /// Form with a required rating
    pub fn new(backend: SharedBackend, policy: CommentPolicy) -> Self {
        Self {
            backend,
            policy,
            rating_required: true,
            fields: Mutex::new(FormFields::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Variant without a rating field; submissions carry no emoji
    pub fn without_rating(mut self) -> Self {
        self.rating_required = false;
        self
    }

    pub fn policy(&self) -> &CommentPolicy {
        &self.policy
    }

    pub fn rating_required(&self) -> bool {
        self.rating_required
    }

    /// Rating choices in display order
    pub fn rating_options(&self) -> &'static [Rating] {
        if self.rating_required {
            &Rating::ALL
        } else {
            &[]
        }
    }

    pub fn fields(&self) -> FormFields {
        self.fields.lock().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.fields.lock().name = name.into();
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        self.fields.lock().comment = comment.into();
    }

    pub fn set_rating(&self, rating: Option<i32>) {
        self.fields.lock().rating = rating;
    }

    /// Pick the preset comment at `index`; `false` if there is none
    pub fn select_preset(&self, index: usize) -> bool {
        match self.policy.options().get(index) {
            Some(option) => {
                self.fields.lock().comment.clone_from(option);
                true
            }
            None => false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        *self.fields.lock() = FormFields::default();
    }

    /// Check the current fields
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_fields(&self.fields())
    }

    fn validate_fields(&self, fields: &FormFields) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name_len = fields.name.chars().count();
        if name_len < NAME_MIN {
            errors.add("name", field_error("length", "Name must be at least 2 characters"));
        } else if name_len > NAME_MAX {
            errors.add("name", field_error("length", "Name must be at most 100 characters"));
        }

        if !self.policy.accepts(&fields.comment) {
            errors.add("comment", field_error("comment", self.policy.error_message()));
        }

        if self.rating_required
            && fields
                .rating
                .and_then(|v| Rating::try_from(v).ok())
                .is_none()
        {
            errors.add("rating", field_error("required", "Please select a rating"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, then insert once
    ///
    /// Success clears the fields. Failure keeps them so the visitor can try
    /// again by hand.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }
        let _guard = InFlight(&self.in_flight);

        let fields = self.fields();
        if let Err(errors) = self.validate_fields(&fields) {
            return SubmitOutcome::Invalid(errors);
        }

        let feedback = NewFeedback {
            name: fields.name,
            comment: fields.comment,
            emoji: if self.rating_required { fields.rating } else { None },
            created_at: Utc::now(),
        };

        match self.backend.insert(feedback).await {
            Ok(id) => {
                tracing::info!(id = %id, "Feedback submitted");
                self.reset();
                SubmitOutcome::Submitted {
                    id,
                    notification: Notification::success(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to submit feedback");
                SubmitOutcome::Failed(Notification::failure())
            }
        }
    }
}

impl std::fmt::Debug for SubmissionForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionForm")
            .field("policy", &self.policy)
            .field("rating_required", &self.rating_required)
            .field("fields", &*self.fields.lock())
            .field("in_flight", &self.is_submitting())
            .finish()
    }
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// First message recorded for `field`, if any
pub fn field_message<'a>(errors: &'a ValidationErrors, field: &str) -> Option<&'a str> {
    errors
        .field_errors()
        .get(field)
        .copied()
        .and_then(|list| list.first())
        .and_then(|error| error.message.as_deref())
}
