//! `analyze` command: concurrent sentiment analysis of several items

use super::helpers::load_dashboard;
use anyhow::Result;
use feedbackhub_core::{AnalysisOutcome, FeedbackError, FeedbackHubConfig, FeedbackId};
use tracing::warn;

/// Analyse each id on its own task and report every outcome
///
/// A failure for one id is reported and does not stop the others.
pub async fn handle(config: &FeedbackHubConfig, ids: Vec<String>) -> Result<()> {
    let orchestrator = load_dashboard(config).await?;

    let mut tasks = Vec::new();
    for raw in ids {
        let id = FeedbackId::from(raw);
        match orchestrator.item(&id) {
            Some(item) => {
                let handle = orchestrator.spawn_analysis(item.id.clone(), item.content.clone());
                tasks.push((id, handle));
            }
            None => println!("{}: {}", id, FeedbackError::FeedbackNotFound(id.clone())),
        }
    }

    let mut failures = 0;
    for (id, handle) in tasks {
        match handle.await? {
            Ok(AnalysisOutcome::Completed(result)) => println!(
                "{}: {} (score {})",
                id,
                result.polarity().label(),
                result.formatted_score()
            ),
            Ok(AnalysisOutcome::Suppressed) => println!("{}: already being analysed", id),
            Ok(AnalysisOutcome::Discarded) => {
                println!("{}: item is no longer in the collection", id)
            }
            Err(e) => {
                warn!("{}", e);
                println!("{}: Error analyzing feedback", id);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} analysis request(s) failed", failures);
    }
    Ok(())
}
