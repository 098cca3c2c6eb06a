use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use surfsup::config::Config;
use surfsup::gateway;
use surfsup::store::{self, measurement, station};
use tracing_subscriber::EnvFilter;

/// Read-only JSON API over the Hawaii climate dataset.
#[derive(Parser, Debug)]
#[command(name = "surfsup", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Address to bind (overrides gateway.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides gateway.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite dataset (overrides dataset.db_path)
        #[arg(long)]
        db: Option<String>,
    },

    /// Print the routes listed at `/`
    Routes,

    /// Open the dataset, verify its schema and print a summary
    Check,

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve { host, port, db } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(db) = db {
                config.dataset.db_path = db;
            }
            config.validate()?;
            gateway::run_gateway(config).await
        }
        Commands::Routes => {
            print!("{}", gateway::api::route_listing());
            Ok(())
        }
        Commands::Check => {
            let config = Config::load(cli.config.as_deref())?;
            check_dataset(&config)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "surfsup", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn check_dataset(config: &Config) -> Result<()> {
    let db_path = config.dataset.resolved_db_path();
    let conn = store::open_dataset(&db_path)
        .with_context(|| format!("Dataset check failed for {}", db_path.display()))?;

    let counts = store::count_rows(&conn)?;
    let stations = station::list_stations(&conn)?;
    let located = stations
        .iter()
        .filter(|s| s.latitude.is_some() && s.longitude.is_some())
        .count();
    println!("Dataset:      {}", db_path.display());
    println!("Measurements: {}", counts.measurements);
    println!(
        "Stations:     {} ({} distinct, {} with coordinates)",
        counts.stations,
        stations.len(),
        located
    );

    match measurement::trailing_window(&conn, config.dataset.window_days)? {
        Some(window) => println!("Window:       {window}"),
        None => println!("Window:       (no measurements)"),
    }

    let station_id = &config.dataset.observation_station;
    match station::find_station(&conn, station_id)? {
        Some(found) => println!("Observations: {} ({})", found.station, found.name),
        None => {
            tracing::warn!("Observation station {station_id} is not in the station table");
            println!("Observations: {station_id} (unknown station)");
        }
    }
    Ok(())
}
