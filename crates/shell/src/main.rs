//! Tally shell
//!
//! Restores the configured session, resolves its company link against the API
//! and prints the navigation decision and layout for each requested path. When
//! the user is linked, the current month's dashboard summary is printed too.

mod config;

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tally_client::{ApiClient, CompanyDirectory};
use tally_core::company::{CompanyCache, LocalStorage};
use tally_core::expense::DashboardSummary;
use tally_session::{IdentityEvent, RouteGuard, SessionResolver};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ShellConfig, DEFAULT_PATHS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_shell=info,tally_session=info,tally_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ShellConfig::from_env();
    tracing::info!("Using data directory: {:?}", config.data_dir);
    tracing::info!("API base URL: {}", config.api.base_url);

    let storage = LocalStorage::open(config.local_storage_path())
        .await
        .context("Failed to open local storage")?;
    let cache: Arc<dyn CompanyCache> = Arc::new(storage);

    let client = Arc::new(ApiClient::new(config.api.clone()));
    match client.health().await {
        Ok(_) => tracing::info!("API is reachable"),
        Err(e) => tracing::warn!("API health check failed: {}", e),
    }
    let directory: Arc<dyn CompanyDirectory> = client.clone();

    let resolver = Arc::new(SessionResolver::new(directory, cache));
    let mut guard = RouteGuard::new(&resolver);

    let (events_tx, events_rx) = mpsc::channel(16);
    let events = tokio::spawn(Arc::clone(&resolver).run(events_rx));
    events_tx
        .send(IdentityEvent::Restored(config.session.clone()))
        .await
        .context("Identity event loop stopped")?;

    let mut paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        paths = DEFAULT_PATHS.iter().map(|p| p.to_string()).collect();
    }

    let first = guard.settle(&paths[0]).await;
    let state = resolver.state();
    println!("{}", serde_json::to_string_pretty(&json!({ "session": state }))?);

    for (index, path) in paths.iter().enumerate() {
        let decision = if index == 0 { first } else { guard.decide(path) };
        println!(
            "{}",
            json!({ "path": path, "decision": decision, "layout": guard.layout(path) })
        );
    }

    if let Some(company_id) = state.company_id() {
        match client.expenses().for_company(company_id).await {
            Ok(expenses) => {
                let today = chrono::Local::now().date_naive();
                let summary = DashboardSummary::for_month(&expenses, today);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Err(e) => tracing::warn!("Could not load expenses for {}: {}", company_id, e),
        }
    }

    drop(events_tx);
    events.await.context("Identity event loop panicked")?;
    Ok(())
}
