//! `dashboard` and `categories` commands

use super::helpers::{load_dashboard, print_row};
use anyhow::Result;
use feedbackhub_core::{CategoryFilter, FeedbackHubConfig};
use tracing::debug;

/// Print the (optionally filtered) feedback list
pub async fn handle(
    config: &FeedbackHubConfig,
    filter: CategoryFilter,
    json: bool,
) -> Result<()> {
    let orchestrator = load_dashboard(config).await?;

    debug!("Applying filter {}", filter);
    orchestrator.change_filter(filter);
    let snapshot = orchestrator.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let categories: Vec<String> = snapshot.categories.iter().map(|c| c.label()).collect();
    println!("Admin Dashboard - {}", snapshot.operator.unwrap_or_default());
    println!("Categories: All, {}", categories.join(", "));
    println!();
    println!("Feedback ({})", snapshot.rows.len());
    println!();

    if snapshot.rows.is_empty() {
        println!("No feedback found");
        return Ok(());
    }

    for row in &snapshot.rows {
        print_row(row);
        println!();
    }
    Ok(())
}

/// Print the distinct categories of the collection
pub async fn handle_categories(config: &FeedbackHubConfig) -> Result<()> {
    let orchestrator = load_dashboard(config).await?;
    for category in orchestrator.categories() {
        println!("{}", category);
    }
    Ok(())
}
