//! One-shot submission form
//!
//! ```bash
//! feedback-submit --name Ana --rating 5 --preset 1
//! feedback-submit --name Ana --rating 4 --comment "Lovely evening"
//! ```

use anyhow::Context;
use board_client::form::field_message;
use board_client::{HttpBackend, SharedBackend, SubmissionForm, SubmitOutcome};
use board_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use board_core::CommentPolicy;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "feedback-submit", about = "Submit feedback to the board")]
struct Args {
    /// Your name
    #[arg(long)]
    name: String,

    /// Emoji rating from 1 (disappointed) to 5 (very good)
    #[arg(long)]
    rating: i32,

    /// One of the preset comments, numbered 1-5
    #[arg(long, conflicts_with = "comment", required_unless_present = "comment")]
    preset: Option<usize>,

    /// Free-text comment
    #[arg(long)]
    comment: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = ClientConfig::load().context("Failed to load client configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::default()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let backend: SharedBackend = Arc::new(HttpBackend::new(&config)?);

    let form = match (args.preset, args.comment) {
        (Some(preset), _) => {
            let form = SubmissionForm::new(backend, CommentPolicy::presets());
            // Out-of-range numbers leave the comment empty and fail validation
            if let Some(index) = preset.checked_sub(1) {
                form.select_preset(index);
            }
            form
        }
        (None, comment) => {
            let form = SubmissionForm::new(backend, CommentPolicy::free_text());
            form.set_comment(comment.unwrap_or_default());
            form
        }
    };
    form.set_name(args.name);
    form.set_rating(Some(args.rating));

    match form.submit().await {
        SubmitOutcome::Submitted { id, notification } => {
            println!("{notification} (id {id})");
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Failed(notification) => {
            eprintln!("{notification}");
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Invalid(errors) => {
            for field in ["name", "comment", "rating"] {
                if let Some(message) = field_message(&errors, field) {
                    eprintln!("{field}: {message}");
                }
            }
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Busy => Ok(ExitCode::FAILURE),
    }
}
