use anyhow::Result;
use formpilot_core::{FieldAssistant, Translator};

use super::banner;
use crate::app::App;

fn mark(present: bool) -> &'static str {
    if present {
        "✅"
    } else {
        "❌"
    }
}

pub async fn documents(app: &App) -> Result<()> {
    let status = FieldAssistant::new(app.auth.clone())
        .document_status()
        .await
        .map_err(banner)?;

    println!("{} Resume", mark(status.has_resume));
    println!("{} Personal info", mark(status.has_personal_info));
    println!("Documents: {}", status.total_documents);
    Ok(())
}

pub async fn translate(app: &App, text: &str, to: &str) -> Result<()> {
    let response = Translator::new(app.auth.clone())
        .translate(text, to)
        .await
        .map_err(banner)?;
    println!("{}", response.translated_text);
    Ok(())
}
