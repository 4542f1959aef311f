//! Salespulse CLI - Sales performance analysis API
//!
//! # Main Commands
//!
//! ```bash
//! salespulse serve data.csv            # Load the dataset and start the HTTP server
//! ```
//!
//! # Debug Commands (offline, no API key needed)
//!
//! ```bash
//! salespulse inspect data.csv          # Parse the file and print load statistics
//! salespulse rep data.csv 183          # Print one rep's summary as JSON
//! salespulse team data.csv             # Print the team summary as JSON
//! salespulse trends data.csv monthly   # Print trend buckets as JSON
//! ```

use clap::{Parser, Subcommand};
use salespulse::{load_file, start_server, AppState, MistralClient, Reporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "salespulse")]
#[command(about = "Sales performance analysis API with LLM-generated insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and start the HTTP server
    Serve {
        /// Activity data file (delimited, with header row)
        data: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Parse the data file and print load statistics
    Inspect {
        /// Activity data file
        data: PathBuf,
    },

    /// Print one rep's summary as JSON (no insights)
    Rep {
        /// Activity data file
        data: PathBuf,

        /// Rep identifier
        rep_id: i64,
    },

    /// Print the team summary as JSON (no insights)
    Team {
        /// Activity data file
        data: PathBuf,
    },

    /// Print trend buckets as JSON (no insights)
    Trends {
        /// Activity data file
        data: PathBuf,

        /// Bucketing period: monthly or quarterly
        time_period: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { data, port } => cmd_serve(&data, port).await,
        Commands::Inspect { data } => cmd_inspect(&data),
        Commands::Rep { data, rep_id } => cmd_rep(&data, rep_id),
        Commands::Team { data } => cmd_team(&data),
        Commands::Trends { data, time_period } => cmd_trends(&data, &time_period),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Load the dataset and print operator-facing stats. Any load failure
/// here is fatal: the process must not serve without data.
fn load_reporter(data: &Path) -> Result<Reporter, Box<dyn std::error::Error>> {
    eprintln!("📄 Loading: {}", data.display());

    let result = load_file(data)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match result.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", result.headers.len());
    eprintln!(
        "✅ Loaded {} records ({} dropped)",
        result.dataset.len(),
        result.skipped
    );

    Ok(Reporter::new(Arc::new(result.dataset)))
}

async fn cmd_serve(data: &Path, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = load_reporter(data)?;

    let insights = MistralClient::from_env()?;
    let state = AppState::new(reporter, Arc::new(insights));

    start_server(port, state).await
}

fn cmd_inspect(data: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = load_reporter(data)?;

    let team = reporter.team_summary();
    eprintln!("   Reps: {}", team.total_reps);
    eprintln!("   Total leads: {}", team.total_leads);
    eprintln!("   Total revenue: {}", team.total_revenue_confirmed);

    Ok(())
}

fn cmd_rep(data: &Path, rep_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = load_reporter(data)?;

    let summary = reporter.rep_summary(rep_id)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn cmd_team(data: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = load_reporter(data)?;

    let summary = reporter.team_summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn cmd_trends(data: &Path, time_period: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = load_reporter(data)?;

    let buckets = reporter.trend_summary(time_period)?;
    println!("{}", serde_json::to_string_pretty(&buckets)?);

    Ok(())
}
