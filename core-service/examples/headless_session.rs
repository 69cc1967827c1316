//! Headless walk through the mini-app core.
//!
//! Bootstraps a session, renders the home screen, registers for an event,
//! votes and sends feedback, printing what a UI would show.
//!
//! Run with:
//! ```bash
//! # Against the default backend, as a development guest
//! cargo run -p core-service --example headless_session
//!
//! # As a member, with a captured identity payload
//! MINIAPP_INIT_DATA='query_id=...' cargo run -p core-service --example headless_session
//!
//! # JSON logs
//! cargo run -p core-service --example headless_session -- json
//! ```

use anyhow::Context;
use bridge_traits::time::LogLevel;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{AppConfig, HeadlessHostBridge, MiniAppCore};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = match env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };
    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )
    .context("failed to initialize logging")?;

    let host = Arc::new(HeadlessHostBridge::from_env());
    let config = AppConfig::from_env()?
        .host_bridge(host.clone())
        .build()
        .context("invalid configuration")?;
    let core = MiniAppCore::new(config)?;

    let mut degraded = core.degradations();
    tokio::spawn(async move {
        while let Ok(event) = degraded.recv().await {
            println!("  [degraded] {}", event.description());
        }
    });

    let session = core.bootstrap().await;
    let user = session.user.as_ref().context("session has no profile")?;
    println!("Session: {:?} as {}", session.status, user.display_name());

    let home = core.content().home().await;
    println!("News ({}):", if home.news.is_fallback() { "offline" } else { "live" });
    for item in home.news.value() {
        println!("  - {}", item.title);
    }
    println!("Next event: {}", home.upcoming_event.value().title);
    println!("Open poll: {}", home.active_poll.value().question);

    let board = core.event_board();
    board.load().await;
    if let Some(event) = board.events().await.into_iter().find(|e| !e.is_registered && !e.is_full()) {
        let committed = board.register(&event.id).await?;
        println!(
            "Registered for '{}' ({} of {}){}",
            committed.value().title,
            committed.value().current_participants,
            committed.value().max_participants,
            if committed.is_assumed() { ", pending sync" } else { "" }
        );
    }

    let polls = core.poll_board();
    polls.load().await;
    if let Some(poll) = polls.visible().await.into_iter().find(|p| !p.has_voted()) {
        if let Some(option) = poll.options.first() {
            let committed = polls.vote(&poll.id, &option.id).await?;
            println!(
                "Voted '{}' in '{}' ({} votes total)",
                option.text,
                poll.question,
                committed.value().total_votes
            );
        }
    }

    let feedback = core.feedback_form();
    feedback.set_message("Отправлено из headless-клиента").await;
    feedback.submit().await?;
    println!("Feedback stage: {:?}", feedback.stage().await);
    println!("Alerts shown: {:?}", host.alerts());

    core.close();
    Ok(())
}
