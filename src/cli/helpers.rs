//! Shared helpers for CLI commands

use anyhow::Result;
use chrono::Local;
use feedbackhub_core::{
    AnalysisState, DashboardOrchestrator, DashboardRow, FeedbackError, FeedbackHubConfig,
    HttpDashboardService, HttpSentimentService,
};
use std::sync::Arc;

/// Orchestrator wired to the configured HTTP backends
pub fn build_orchestrator(config: &FeedbackHubConfig) -> Result<DashboardOrchestrator> {
    let dashboard = HttpDashboardService::new(&config.dashboard, &config.http)?;
    let sentiment = HttpSentimentService::new(&config.sentiment, &config.http)?;
    Ok(DashboardOrchestrator::new(
        Arc::new(dashboard),
        Arc::new(sentiment),
    ))
}

/// Load the dashboard, printing login guidance when it cannot be shown
pub async fn load_dashboard(config: &FeedbackHubConfig) -> Result<DashboardOrchestrator> {
    let orchestrator = build_orchestrator(config)?;
    match orchestrator.initialize().await {
        Ok(operator) => {
            eprintln!("Signed in as {}", operator.name);
            Ok(orchestrator)
        }
        Err(e) => {
            if let Some(guidance) = load_guidance(&e) {
                eprintln!("{}", guidance);
            }
            Err(e.into())
        }
    }
}

/// What to tell the operator when the dashboard itself cannot be shown
pub fn load_guidance(error: &FeedbackError) -> Option<String> {
    if !error.is_fatal_to_view() {
        return None;
    }
    Some(format!(
        "Please Register/Login To Proceed\n\
         Set a session cookie with {} or [http].session_cookie, then try again.",
        feedbackhub_core::config::SESSION_COOKIE_ENV
    ))
}

/// Sentiment line for a row, if there is anything to show
pub fn analysis_line(state: &AnalysisState) -> Option<String> {
    match state {
        AnalysisState::Absent => None,
        AnalysisState::Pending => Some("Sentiment: analysing...".to_string()),
        AnalysisState::Present(result) => Some(format!(
            "Sentiment: {} (score {})",
            result.polarity().label(),
            result.formatted_score()
        )),
    }
}

pub fn print_row(row: &DashboardRow) {
    let item = &row.item;
    let created = item.created_at.with_timezone(&Local);
    println!(
        "[{}] Page ID: {}  {}  (id {})",
        item.category.label(),
        item.page_id,
        created.format("%Y-%m-%d %H:%M:%S"),
        item.id
    );
    println!("    {}", item.content);
    if let Some(line) = analysis_line(&row.analysis) {
        println!("    {}", line);
    }
}
