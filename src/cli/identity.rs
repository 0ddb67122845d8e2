//! `whoami` and `logout` commands

use anyhow::Result;
use feedbackhub_core::{FeedbackHubConfig, HttpIdentityService, IdentityService};

pub async fn handle_whoami(config: &FeedbackHubConfig) -> Result<()> {
    let identity = HttpIdentityService::new(&config.identity, &config.http)?;
    match identity.current_user().await? {
        Some(user) => match user.first_name {
            Some(name) => println!("Hi, {}", name),
            None => println!("Signed in"),
        },
        None => println!("Not signed in. Please log in to generate feedback links."),
    }
    Ok(())
}

pub async fn handle_logout(config: &FeedbackHubConfig) -> Result<()> {
    let identity = HttpIdentityService::new(&config.identity, &config.http)?;
    identity.logout().await?;
    println!("Logged out");
    Ok(())
}
