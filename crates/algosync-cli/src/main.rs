mod context;
mod import;
mod index_names;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::CliContext;

#[derive(Debug, Parser)]
#[command(name = "algosync-cli")]
#[command(about = "Saleor to Algolia search sync command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import the full Saleor catalog into Algolia
    Import {
        /// Products per Algolia batch call (defaults to ALGOSYNC_IMPORT_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Fetch the catalog and report what would be written without calling Algolia
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that the stored Algolia settings are accepted
    Ping,
    /// Print the Algolia index names for a set of channels
    IndexNames {
        /// Channel as `slug:CURRENCY`; repeatable. When omitted, channels are
        /// collected from the catalog's variant listings.
        #[arg(long = "channel", value_name = "SLUG:CURRENCY")]
        channels: Vec<String>,

        /// Index name prefix (defaults to the stored setting)
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("algosync-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = algosync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let ctx = CliContext::new(config)?;
    match command {
        Commands::Import {
            batch_size,
            dry_run,
        } => import::run_import(&ctx, batch_size, dry_run).await,
        Commands::Ping => import::run_ping(&ctx).await,
        Commands::IndexNames { channels, prefix } => {
            index_names::run_index_names(&ctx, &channels, prefix.as_deref()).await
        }
    }
}
