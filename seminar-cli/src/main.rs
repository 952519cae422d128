mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use seminar_core::{Banner, DeskConfig, Desk, HttpTransport, Mirror, RecordId};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

pub type CliDesk = Desk<HttpTransport, Banner>;

#[derive(Parser)]
#[command(name = "seminar")]
#[command(about = "Manage seminars, attendance and evaluations, online or offline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration paths and the backend URL
    Config,
    /// Check whether the backend is reachable
    Health,
    /// Remember who is using this desk
    Login {
        email: String,

        #[arg(long)]
        name: Option<String>,

        /// e.g. "admin" or "participant"
        #[arg(long)]
        role: Option<String>,
    },
    /// Manage seminars
    #[command(subcommand)]
    Seminars(SeminarCommands),
    /// Register for a seminar
    Join {
        seminar: RecordId,

        /// Defaults to the logged-in participant
        #[arg(short, long)]
        email: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        section: Option<String>,
    },
    /// Check a participant in
    TimeIn {
        seminar: RecordId,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Check a participant out
    TimeOut {
        seminar: RecordId,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Check in (or out) from scanned QR data
    Scan {
        qr: String,

        /// Record a check-out instead of a check-in
        #[arg(long)]
        out: bool,
    },
    /// List attendance for a seminar
    Attendance { seminar: RecordId },
    /// List registered participants for a seminar
    Participants { seminar: RecordId },
    /// Submit evaluation answers
    Evaluate {
        seminar: RecordId,

        #[arg(short, long)]
        email: Option<String>,

        /// Answer as key=value, repeatable
        #[arg(short, long = "answer", value_name = "KEY=VALUE")]
        answers: Vec<String>,
    },
    /// Whether a participant has evaluated a seminar
    Evaluated {
        seminar: RecordId,

        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum SeminarCommands {
    /// List seminars
    List {
        /// date, title, speaker, created_at, duration, capacity, year or semester
        #[arg(long)]
        sort: Option<String>,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Group by year and semester
        #[arg(long)]
        group: bool,
    },
    /// Create a seminar
    Create(SeminarArgs),
    /// Replace the editable fields of a seminar
    Update {
        id: RecordId,

        #[command(flatten)]
        fields: SeminarArgs,
    },
    /// Delete a seminar
    Delete {
        id: Option<RecordId>,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Attach a certificate template image to a seminar
    Template { id: RecordId, file: PathBuf },
}

#[derive(Args)]
pub struct SeminarArgs {
    #[arg(short, long)]
    pub title: String,

    /// YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,

    /// e.g. "09:00 AM"
    #[arg(long)]
    pub start: Option<String>,

    /// e.g. "11:30 AM"
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub speaker: Option<String>,

    /// Hours
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub capacity: Option<String>,

    /// 1 or 2; derived from the date when omitted
    #[arg(long)]
    pub semester: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DeskConfig::load()?;

    match cli.command {
        Commands::Config => commands::config::run(&config),
        Commands::Health => commands::health::run(&open_desk(&config)?).await,
        Commands::Login { email, name, role } => {
            commands::login::run(&open_desk(&config)?, email, name, role)
        }
        Commands::Seminars(command) => {
            let desk = open_desk(&config)?;
            match command {
                SeminarCommands::List { sort, order, group } => {
                    commands::seminars::list(&desk, sort.as_deref(), &order, group).await
                }
                SeminarCommands::Create(fields) => commands::seminars::create(&desk, fields).await,
                SeminarCommands::Update { id, fields } => {
                    commands::seminars::update(&desk, id, fields).await
                }
                SeminarCommands::Delete { id, force } => {
                    commands::seminars::delete(&desk, id, force).await
                }
                SeminarCommands::Template { id, file } => {
                    commands::seminars::template(&desk, &id, &file).await
                }
            }
        }
        Commands::Join {
            seminar,
            email,
            name,
            year,
            section,
        } => {
            let registration = commands::participants::Join {
                email,
                name,
                year,
                section,
            };
            commands::participants::join(&open_desk(&config)?, &seminar, registration).await
        }
        Commands::TimeIn { seminar, email } => {
            commands::attendance::time_in(&open_desk(&config)?, &seminar, email).await
        }
        Commands::TimeOut { seminar, email } => {
            commands::attendance::time_out(&open_desk(&config)?, &seminar, email).await
        }
        Commands::Scan { qr, out } => commands::attendance::scan(&open_desk(&config)?, &qr, out).await,
        Commands::Attendance { seminar } => {
            commands::attendance::list(&open_desk(&config)?, &seminar).await
        }
        Commands::Participants { seminar } => {
            commands::participants::list(&open_desk(&config)?, &seminar).await
        }
        Commands::Evaluate {
            seminar,
            email,
            answers,
        } => commands::evaluations::submit(&open_desk(&config)?, &seminar, email, &answers).await,
        Commands::Evaluated { seminar, email } => {
            commands::evaluations::check(&open_desk(&config)?, &seminar, email).await
        }
    }
}

fn open_desk(config: &DeskConfig) -> Result<CliDesk> {
    let transport = HttpTransport::new(config.api_base(), config.request_timeout())?;
    let mirror = Mirror::open(config.data_path())?;
    debug!(api = config.api_base(), mirror = %mirror.path().display(), "Opened desk");

    Ok(Desk::new(transport, mirror, Banner::new()))
}
