mod client;
mod commands;
mod filter;
mod form;
mod render;
mod session;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::client::{Client, ENV_BACKEND_URL, Transport};
use crate::commands::submit::SubmitArgs;
use crate::filter::RecordFilter;
use crate::session::{ClientSession, Page};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Submit attendance and browse the admin dashboard")]
struct Cli {
    /// Backend endpoint (defaults to $ROLLCALL_BACKEND_URL)
    #[arg(long, global = true, env = ENV_BACKEND_URL)]
    url: Option<String>,

    /// Send requests as a JSON POST body instead of query parameters
    #[arg(long, global = true)]
    post: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events open for attendance
    Events,
    /// Fill in the attendance form
    Submit {
        #[arg(long)]
        roll_number: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Event id or exact event name
        #[arg(long)]
        event: Option<String>,

        /// Present, Absent or Excused
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Log in as an admin and remember the session token
    Login {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the session token
    Logout,
    /// Open the dashboard, logging in first if needed
    Admin,
    /// Show attendance counts and records
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,

        /// Refresh every 10 seconds until Ctrl+C
        #[arg(short, long)]
        watch: bool,
    },
    /// Export the filtered records as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: attendance_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add a new event
    AddEvent { name: String },
}

#[derive(Args)]
struct FilterArgs {
    /// Search roll number, name or email (case-insensitive)
    #[arg(short, long)]
    search: Option<String>,

    /// Only this event (exact name)
    #[arg(short, long)]
    event: Option<String>,

    /// Only this status
    #[arg(long)]
    status: Option<String>,
}

impl From<FilterArgs> for RecordFilter {
    fn from(args: FilterArgs) -> Self {
        RecordFilter::new(args.search, args.event, args.status)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let transport = if cli.post {
        Transport::Body
    } else {
        Transport::Query
    };
    let client = Client::new(cli.url, transport);

    match cli.command {
        Commands::Events => commands::events::run(&client).await,
        Commands::Submit {
            roll_number,
            name,
            email,
            event,
            status,
            notes,
        } => {
            let args = SubmitArgs {
                roll_number,
                full_name: name,
                email,
                event,
                status,
                notes,
            };
            commands::submit::run(&client, args).await
        }
        Commands::Login { username, password } => {
            let mut session = ClientSession::load()?;
            commands::login::run(&client, &mut session, username, password).await
        }
        Commands::Logout => {
            let mut session = ClientSession::load()?;
            commands::login::logout(&mut session)
        }
        Commands::Admin => {
            let mut session = ClientSession::load()?;
            if session.landing_page() == Page::Login {
                commands::login::run(&client, &mut session, None, None).await?;
            }
            commands::dashboard::run(&client, &session, &RecordFilter::default(), false).await
        }
        Commands::Dashboard { filter, watch } => {
            let session = ClientSession::load()?;
            commands::dashboard::run(&client, &session, &filter.into(), watch).await
        }
        Commands::Export { filter, output } => {
            let session = ClientSession::load()?;
            commands::export::run(&client, &session, &filter.into(), output).await
        }
        Commands::AddEvent { name } => {
            let session = ClientSession::load()?;
            commands::add_event::run(&client, &session, &name).await
        }
    }
}
