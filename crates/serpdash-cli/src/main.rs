mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "serpdash-cli")]
#[command(about = "SERP ranking dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the dashboard overview: source, load diagnostics, metrics.
    Report,
    /// Compare one keyword's rankings between two dates.
    Compare {
        #[arg(long)]
        keyword: String,
        /// Baseline date (YYYY-MM-DD).
        #[arg(long)]
        t1: NaiveDate,
        /// Comparison date (YYYY-MM-DD).
        #[arg(long)]
        t2: NaiveDate,
    },
    /// Write the comparison CSV for two dates to a file.
    Export {
        /// Restrict the export to one keyword; omit for all keywords.
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        t1: NaiveDate,
        #[arg(long)]
        t2: NaiveDate,
        /// Output path for the CSV.
        #[arg(long, default_value = "serp_comparison.csv")]
        out: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = serpdash_core::load_app_config()?;

    match cli.command {
        Commands::Report => commands::report(&config).await,
        Commands::Compare { keyword, t1, t2 } => {
            commands::compare(&config, &keyword, t1, t2).await
        }
        Commands::Export {
            keyword,
            t1,
            t2,
            out,
        } => commands::export(&config, keyword.as_deref(), t1, t2, &out).await,
    }
}
