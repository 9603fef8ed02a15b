//! # board-client
//!
//! The two visitor-facing halves of the feedback board: the submission
//! form and the display board, both talking to a shared backend handle.

pub mod animation;
pub mod backend;
pub mod board;
pub mod feed;
pub mod form;

pub use animation::{AnimationCache, AnimationResource, AnimationSource, HttpAnimationSource};
pub use backend::{
    BackendError, BackendResult, FeedbackBackend, HttpBackend, MemoryBackend, NewFeedback,
    SharedBackend, Subscription,
};
pub use board::{BoardPhase, CardView, DisplayBoard};
pub use feed::FeedWindow;
pub use form::{Notification, SubmissionForm, SubmitOutcome};
