//! `delete` command

use super::helpers::load_dashboard;
use anyhow::Result;
use feedbackhub_core::{FeedbackHubConfig, PageId};

pub async fn handle(config: &FeedbackHubConfig, page_id: String) -> Result<()> {
    let orchestrator = load_dashboard(config).await?;
    let page_id = PageId::from(page_id);

    match orchestrator.delete_item(&page_id).await {
        Ok(removed) => {
            println!("Feedback deleted successfully ({} item(s) for page {})", removed, page_id);
            Ok(())
        }
        Err(e) => {
            println!("Failed to delete feedback");
            Err(e.into())
        }
    }
}
