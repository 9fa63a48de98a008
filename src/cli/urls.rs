use anyhow::Result;
use formpilot_api::UrlStatus;
use formpilot_core::UrlTracker;

use super::{banner, UrlsCommand};
use crate::app::App;

pub async fn run(app: &App, command: UrlsCommand) -> Result<()> {
    let tracker = UrlTracker::new(app.auth.clone());

    match command {
        UrlsCommand::Save {
            url,
            title,
            company,
            status,
        } => {
            let saved = tracker
                .save(&url, title, company, status)
                .await
                .map_err(banner)?;
            println!("✅ Saved #{} ({})", saved.id, saved.status);
        }
        UrlsCommand::Status { id, status } => {
            tracker.update_status(&id, status).await.map_err(banner)?;
            println!("✅ #{} is now {}", id, status);
        }
        UrlsCommand::List => {
            let urls = tracker.list().await.map_err(banner)?;
            if urls.is_empty() {
                println!("No tracked URLs");
            }
            for url in urls {
                let title = url.title.as_deref().unwrap_or(&url.url);
                match &url.company {
                    Some(company) => {
                        println!("#{:<5} {:<13} {} ({})", url.id, url.status, title, company)
                    }
                    None => println!("#{:<5} {:<13} {}", url.id, url.status, title),
                }
            }
        }
        UrlsCommand::Stats => {
            let stats = tracker.stats().await.map_err(banner)?;
            println!("Total: {}", stats.total);
            for status in UrlStatus::ALL {
                println!("  {:<13} {}", status, stats.count(status));
            }
        }
    }
    Ok(())
}
