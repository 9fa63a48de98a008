use std::time::Duration;

use anyhow::Result;
use formpilot_core::{SessionEvent, SyncWatcher};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::App;

pub async fn run(app: &App, interval: Duration) -> Result<()> {
    let mut events = app.sync.subscribe();
    let watcher = SyncWatcher::spawn(app.sync.clone(), interval, CancellationToken::new());
    info!(context = %app.sync.context(), "Watching session, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    watcher.stop().await;
    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::LoggedIn { session, .. } => println!("🔓 logged in as {}", session.user_id),
        SessionEvent::SessionChanged { session, .. } => {
            println!("🔄 session changed for {}", session.user_id)
        }
        SessionEvent::LoggedOut { .. } => println!("🔒 logged out"),
    }
}
