//! Jatim Bissa CLI - route policy and backend debugging tools.
//!
//! # Usage
//!
//! ```bash
//! # Where does the route guard send an admin opening the admins page?
//! jb-cli guard --path /management-admin --role admin --token t
//!
//! # List job vacancies, second page, A-Z
//! jb-cli list jobs --token "$TOKEN" --sort name --page 2
//! ```
//!
//! # Commands
//!
//! - `guard` - Print the route guard decision for a synthetic session
//! - `list` - Run the list controller against the configured backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use jatim_bissa_admin::listing::ListQuery;

mod commands;

use commands::guard::SessionArgs;
use commands::list::EntityKind;

#[derive(Parser)]
#[command(name = "jb-cli")]
#[command(author, version, about = "Jatim Bissa dashboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route guard decision for a path
    Guard {
        /// Request path, e.g. `/management-admin/3`
        #[arg(short, long)]
        path: String,

        /// Role claim (`superadmin`, `admin`, `user`)
        #[arg(short, long)]
        role: Option<String>,

        /// Session token; any non-empty value counts
        #[arg(short, long)]
        token: Option<String>,

        /// Profile completion flag; omit for unknown
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        profile_complete: Option<bool>,
    },
    /// List one page of an entity collection
    List {
        #[arg(value_enum)]
        entity: EntityKind,

        /// Bearer token issued by the backend at login
        #[arg(short, long, env = "JB_TOKEN")]
        token: String,

        #[arg(short, long)]
        search: Option<String>,

        /// Status value, or `all`
        #[arg(long)]
        status: Option<String>,

        /// `newest`, `oldest`, `name` or `company`
        #[arg(long)]
        sort: Option<String>,

        #[arg(long)]
        page: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Before parsing, so `JB_TOKEN` can come from `.env`.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jatim_bissa_admin=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Guard {
            path,
            role,
            token,
            profile_complete,
        } => {
            let args = SessionArgs {
                role,
                token,
                profile_complete,
            };
            commands::guard::run(&path, &args)?;
        }
        Commands::List {
            entity,
            token,
            search,
            status,
            sort,
            page,
        } => {
            let query = ListQuery {
                q: search,
                status,
                sort,
                page,
            };
            commands::list::run(entity, token, &query).await?;
        }
    }
    Ok(())
}
