use anyhow::Result;
use formpilot_core::AuthState;

use super::banner;
use crate::app::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let session = app.auth.login(email, password).await.map_err(banner)?;
    println!("✅ Logged in as {}", session.email.as_deref().unwrap_or(email));
    Ok(())
}

pub async fn register(app: &App, email: &str, password: &str) -> Result<()> {
    let session = app.auth.register(email, password).await.map_err(banner)?;
    println!("✅ Account created, logged in as {}", session.email.as_deref().unwrap_or(email));
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.auth.logout().await.map_err(banner)?;
    println!("👋 Logged out");
    Ok(())
}

pub async fn status(app: &App) -> Result<()> {
    match app.sync.state().await {
        AuthState::LoggedIn(session) => {
            println!("Logged in");
            println!("  user:  {}", session.user_id);
            if let Some(email) = &session.email {
                println!("  email: {}", email);
            }
        }
        AuthState::LoggedOut => println!("Not logged in"),
    }
    Ok(())
}

pub async fn validate(app: &App) -> Result<()> {
    if app.auth.validate().await.map_err(banner)? {
        println!("✅ Session is valid");
    } else {
        println!("⚠️  No valid session. Please log in again.");
    }
    Ok(())
}
