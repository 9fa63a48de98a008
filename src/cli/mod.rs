//! CLI module for FormPilot
//!
//! Every command runs as one extension context over the shared store:
//! - session: `login`, `register`, `logout`, `status`, `validate`
//! - fields: `label`, `fill` against a JSON page snapshot
//! - `urls`, `documents`, `translate`: authenticated backend features
//! - `watch`: follow session changes the way a context's poller would

use clap::{Parser, Subcommand, ValueEnum};
use formpilot_api::UrlStatus;
use formpilot_core::{format_error_banner, SyncConfig};
use std::path::PathBuf;
use std::time::Duration;

pub mod assist;
pub mod field;
pub mod session;
pub mod urls;
pub mod watch;

/// FormPilot form autofill CLI
#[derive(Parser, Debug)]
#[command(name = "formpilot")]
#[command(about = "Form-field autofill: label resolution, session sync and backend access")]
#[command(version)]
pub struct Cli {
    /// Context this invocation acts as
    #[arg(long, value_enum, global = true, default_value_t = SyncContext::Popup)]
    pub context: SyncContext,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which extension context a command plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SyncContext {
    WebApp,
    Extension,
    Popup,
}

impl SyncContext {
    pub fn name(&self) -> &'static str {
        match self {
            SyncContext::WebApp => "web_app",
            SyncContext::Extension => "extension",
            SyncContext::Popup => "popup",
        }
    }

    /// Poll interval this context uses.
    pub fn poll_interval(&self, config: &SyncConfig) -> Duration {
        match self {
            SyncContext::WebApp => config.web_app_poll(),
            SyncContext::Extension => config.extension_poll(),
            SyncContext::Popup => config.popup_poll(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the session here and on the backend
    Logout,
    /// Show the stored session
    Status,
    /// Check the stored session against the backend
    Validate,
    /// Resolve the label of a field in a page snapshot
    Label {
        /// JSON page snapshot
        #[arg(long)]
        page: PathBuf,
        /// `id` of the field
        #[arg(long)]
        field: String,
        /// Print the full descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer a field in a page snapshot
    Fill {
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        field: String,
        /// URL the snapshot was taken from
        #[arg(long)]
        url: Option<String>,
    },
    /// Job application URL tracker
    Urls {
        #[command(subcommand)]
        command: UrlsCommand,
    },
    /// Show which documents the backend holds
    Documents,
    /// Translate text
    Translate {
        text: String,
        /// Target language code
        #[arg(long, default_value = "en")]
        to: String,
    },
    /// Print session changes until interrupted
    Watch {
        /// Poll interval override in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrlsCommand {
    /// Bookmark a URL
    Save {
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long, default_value = "saved")]
        status: UrlStatus,
    },
    /// Change a bookmark's status
    Status { id: String, status: UrlStatus },
    /// List bookmarks
    List,
    /// Count bookmarks per status
    Stats,
}

/// Convert a core error into the banner shown to the user
pub(crate) fn banner(error: formpilot_core::Error) -> anyhow::Error {
    anyhow::anyhow!(format_error_banner(&error))
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let config = crate::app::load_config()?;
    let app = crate::app::App::new(config, cli.context.name())?;

    match command {
        Commands::Login { email, password } => session::login(&app, &email, &password).await,
        Commands::Register { email, password } => {
            session::register(&app, &email, &password).await
        }
        Commands::Logout => session::logout(&app).await,
        Commands::Status => session::status(&app).await,
        Commands::Validate => session::validate(&app).await,
        Commands::Label { page, field, json } => field::label(&page, &field, json),
        Commands::Fill { page, field, url } => field::fill(&app, &page, &field, url).await,
        Commands::Urls { command } => urls::run(&app, command).await,
        Commands::Documents => assist::documents(&app).await,
        Commands::Translate { text, to } => assist::translate(&app, &text, &to).await,
        Commands::Watch { interval_ms } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| cli.context.poll_interval(&app.config.sync));
            watch::run(&app, interval).await
        }
    }
}
