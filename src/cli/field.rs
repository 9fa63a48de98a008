use std::path::Path;

use anyhow::{Context, Result};
use formpilot_core::FieldAssistant;
use formpilot_dom::{Document, FieldDescriptor, NodeId};

use super::banner;
use crate::app::App;

fn load_page(path: &Path, field: &str) -> Result<(Document, NodeId)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page snapshot {}", path.display()))?;
    let doc = Document::from_json(&json).context("Invalid page snapshot")?;
    let element = doc
        .require_by_id(field)
        .with_context(|| format!("No field with id '{}'", field))?;
    Ok((doc, element))
}

pub fn label(path: &Path, field: &str, json: bool) -> Result<()> {
    let (doc, element) = load_page(path, field)?;
    let descriptor = FieldDescriptor::capture(&doc, element);

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        println!("{}", descriptor.label);
    }
    Ok(())
}

pub async fn fill(app: &App, path: &Path, field: &str, url: Option<String>) -> Result<()> {
    let (mut doc, element) = load_page(path, field)?;

    let mut assistant = FieldAssistant::new(app.auth.clone());
    if let Some(url) = url {
        assistant = assistant.with_page_url(url);
    }

    let filled = assistant.fill(&mut doc, element).await.map_err(banner)?;
    println!("{}: {}", filled.descriptor.label, filled.answer);
    if let Some(source) = &filled.data_source {
        println!("  (from {})", source);
    }
    Ok(())
}
