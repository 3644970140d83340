//! Fact-check a passage, or a YouTube video, from the command line.
//!
//! ```text
//! GOOGLE_API_KEY=... cargo run -p fact-check --example fact_check -- "The Great Wall is visible from space."
//! GOOGLE_API_KEY=... cargo run -p fact-check --example fact_check -- https://youtu.be/dQw4w9WgXcQ
//! ```
//!
//! Video checks need the local agent service (`FACT_CHECK_AGENT_URL`).

use anyhow::{Context, Result};
use fact_check::{
    extract_video_id, AgentClient, CheckSession, FactCheckConfig, FactCheckResult, FactChecker,
    HistoryStore, JsonFileStore, SessionEvent, Settings, SettingsStore,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,fact_check=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let input = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if input.trim().is_empty() {
        anyhow::bail!("usage: fact_check <text | youtube url>");
    }

    let config = FactCheckConfig::from_env().context("Failed to load configuration")?;
    let store = JsonFileStore::open_with_config(".fact-check", &config).await?;

    // Stored settings win; fall back to the environment on first run
    let mut settings = store.load().await?;
    if !settings.has_credentials() {
        settings = Settings::from_env();
        store.save(&settings).await?;
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::StateChanged(state) => info!(state = %state, "Session"),
                SessionEvent::Notice(message) => info!("{}", message),
            }
        }
    });

    let mut session = CheckSession::new().with_progress(tx);
    let checker = FactChecker::for_session(&mut session, &settings, store, config)?;

    let result = if extract_video_id(&input).is_some() {
        let agent = AgentClient::from_config(checker.config())?;
        checker.check_video(&mut session, &input, &agent, &agent).await?
    } else {
        checker.check_text(&input).await?
    };

    print_result(&result);

    let history = checker.history().list().await?;
    info!(entries = history.len(), "History updated");
    Ok(())
}

fn print_result(result: &FactCheckResult) {
    println!("\n{}", result.summary());
    println!("Score: {:.0}%", result.overall_score * 100.0);
    if let Some(error) = &result.parse_error {
        println!("(could not parse structured response: {})", error);
    }

    for claim in &result.claims {
        let at = claim
            .timestamp_label()
            .map(|t| format!("[{}] ", t))
            .unwrap_or_default();
        println!("\n{}{} - {}", at, claim.status.label(), claim.text);
        if let Some(correction) = &claim.correction {
            println!("  {}", correction);
        }
        for source in &claim.sources {
            println!("  * {} ({})", source.name, source.url);
        }
    }
}
