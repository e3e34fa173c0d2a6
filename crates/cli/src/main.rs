//! Bento reporting client CLI.
//!
//! Session state lives in a file-backed store under the session
//! directory; every authenticated request goes through the shared
//! transport with its retry and refresh-on-401 behavior.

mod commands;
mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use bento_client::Transport;
use bento_core::{CoreError, ReportId, ReportKind, ReportStatus};
use bento_session::{FileSessionStore, SessionStore};
use clap::{Args, Parser, Subcommand};

const PASSWORD_ENV: &str = "BENTO_PASSWORD";

/// Bento school financial reporting client.
#[derive(Parser)]
#[command(name = "bento", version, about = "Bento school financial reporting client")]
struct Cli {
    /// Central Server base URL (overrides BENTO_SERVER and the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Session directory (overrides BENTO_SESSION_DIR and the config file)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with username and password
    Login {
        username: String,
        /// Password (falls back to BENTO_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete the local session
    Logout,

    /// Show the cached user profile
    Whoami {
        /// Re-fetch the profile instead of using the cache
        #[arg(long)]
        refresh: bool,
    },

    /// List the status transitions the server allows for a report
    Transitions {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Change a report's workflow status
    SetStatus {
        #[command(flatten)]
        report: ReportArgs,

        /// Target status (draft, review, approved, rejected, received, archived)
        #[arg(long)]
        to: String,

        /// Free-text comment attached to the change
        #[arg(long)]
        comment: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Identity of the report being addressed.
#[derive(Args)]
struct ReportArgs {
    /// Report kind: daily, payroll, monthly, or liquidation
    #[arg(long)]
    kind: String,

    /// School identifier
    #[arg(long)]
    school: u32,

    #[arg(long)]
    year: i32,

    #[arg(long)]
    month: u8,

    /// Category code (required for liquidation reports)
    #[arg(long)]
    category: Option<String>,
}

impl ReportArgs {
    fn to_report_id(&self) -> Result<ReportId, CoreError> {
        let kind = ReportKind::from_str(&self.kind)?;
        let mut id = ReportId::new(kind, self.school, self.year, self.month);
        id.category = self.category.clone();
        id.validate()?;
        Ok(id)
    }
}

fn main() {
    let cli = Cli::parse();

    let settings = match config::resolve(cli.server, cli.session_dir) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(1);
        }
    };

    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(settings.session_dir));
    let transport = Transport::new(settings.server, store).with_termination_hook(|| {
        eprintln!("session terminated; log in again with `bento login`");
    });

    let result = match cli.command {
        Commands::Login { username, password } => {
            let password = password
                .or_else(|| std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty()));
            let password = match password {
                Some(password) => password,
                None => match prompt_password() {
                    Ok(password) => password,
                    Err(message) => {
                        eprintln!("error: {}", message);
                        process::exit(1);
                    }
                },
            };
            commands::auth::login(&transport, &username, &password)
        }
        Commands::Logout => commands::auth::logout(&transport),
        Commands::Whoami { refresh } => commands::auth::whoami(&transport, refresh),
        Commands::Transitions { report } => match report.to_report_id() {
            Ok(id) => commands::status::transitions(&transport, id),
            Err(e) => Err(e.into()),
        },
        Commands::SetStatus {
            report,
            to,
            comment,
            yes,
        } => {
            let parsed = report
                .to_report_id()
                .and_then(|id| Ok((id, ReportStatus::from_str(&to)?)));
            match parsed {
                Ok((id, target)) => {
                    commands::status::set_status(&transport, id, target, comment, yes)
                }
                Err(e) => Err(e.into()),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(if e.is_auth_failure() { 2 } else { 1 });
    }
}

fn prompt_password() -> Result<String, String> {
    eprint!("password: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| format!("could not read password: {}", e))?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err("empty password".to_string());
    }
    Ok(password)
}
