use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use pagewise_core::transform::EmphasisStyle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::context::{Overrides, Services};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(about = "Pagewise - read PDFs page by page with synced progress", long_about = None)]
struct Cli {
    /// File server base URL (overrides config and PAGEWISE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Keep downloaded documents in the local cache
    #[arg(long, global = true)]
    cache: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents stored on the server
    List,
    /// Delete one document and its progress
    Delete { id: String },
    /// Delete every document and all progress
    DeleteAll,
    /// Show the saved reading position of a document
    Progress { id: String },
    /// Read a document interactively
    Read {
        id: String,

        /// Start in bionic reading mode
        #[arg(long)]
        bionic: bool,

        /// Emphasis markers for bionic text (md, html, ansi)
        #[arg(long, default_value_t = EmphasisStyle::Ansi)]
        markers: EmphasisStyle,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let services = Services::build(Overrides {
        base_url: cli.base_url,
        cache: cli.cache,
    })?;

    match cli.command {
        Commands::List => commands::library::list(&services).await?,
        Commands::Delete { id } => commands::library::delete(&services, &id).await?,
        Commands::DeleteAll => commands::library::delete_all(&services).await?,
        Commands::Progress { id } => commands::progress::show(&services, &id).await?,
        Commands::Read {
            id,
            bionic,
            markers,
        } => commands::read::run(&services, &id, bionic, markers).await?,
    }

    Ok(())
}
