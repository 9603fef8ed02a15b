//! Terminal display board
//!
//! Run with:
//! ```bash
//! cargo run -p board-client --bin feedback-board
//! ```
//!
//! Prints the feed every time it changes. Ctrl-C unmounts the board.

use anyhow::Context;
use board_client::{AnimationCache, DisplayBoard, HttpAnimationSource, HttpBackend, SharedBackend};
use board_common::{shutdown_signal, try_init_tracing_with_config, ClientConfig, TracingConfig};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Board failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::load().context("Failed to load client configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::default()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        api_url = %config.api_url,
        gateway_url = %config.gateway_url,
        window_size = config.window_size,
        animations = ?config.animation_strategy,
        "Starting display board"
    );

    let backend: SharedBackend = Arc::new(HttpBackend::new(&config)?);
    let source = HttpAnimationSource::from_config(&config)?;
    let animations = Arc::new(AnimationCache::new(Arc::new(source), config.animation_strategy));
    let board = DisplayBoard::new(backend, animations, config.window_size);

    let mut changes = board.changes();
    let live = async {
        board.mount().await;
        render(&board);
        while changes.changed().await.is_ok() {
            render(&board);
        }
    };

    tokio::select! {
        () = live => {}
        () = shutdown_signal() => {}
    }

    board.unmount();
    Ok(())
}

fn render(board: &DisplayBoard) {
    let cards = board.cards();

    println!();
    println!("── Feedback ({}/{}) ──", cards.len(), board.capacity());
    if cards.is_empty() {
        println!("  (no feedback yet)");
    }
    for card in cards {
        let motion = if card.animation.is_some() { "*" } else { " " };
        println!(
            "  [{}|+{:>2}s] {}{} {}: {}",
            card.lane,
            card.stagger.as_secs(),
            card.glyph,
            motion,
            card.name,
            card.comment
        );
    }
}
