use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use welllog::config::Config;
use welllog::database::{connection, migrations::Migrator};
use welllog::events::NullSink;
use welllog::services::{
    AnalysisService, FileService, GroqClient, LlmService, VisualizationService, WellService,
};
use welllog::storage::LocalBlobStore;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a LAS file and parse it into curve samples
    Ingest {
        /// Path to the LAS file
        file: PathBuf,
    },
    /// Process an already-uploaded, unprocessed file
    Process {
        /// File record ID
        file_id: i32,
    },
    /// List wells
    Wells,
    /// Show curve names and depth range for a well
    Curves { well_id: i32 },
    /// Depth-aligned curve series for a depth window, as JSON
    Series {
        well_id: i32,
        /// Comma-separated curve names (empty = all)
        #[clap(short, long, default_value = "")]
        curves: String,
        #[clap(long)]
        depth_min: f64,
        #[clap(long)]
        depth_max: f64,
    },
    /// Per-curve statistics and anomalies for a depth window
    Stats {
        well_id: i32,
        #[clap(short, long, default_value = "")]
        curves: String,
        #[clap(long)]
        depth_min: f64,
        #[clap(long)]
        depth_max: f64,
    },
    /// LLM interpretation of the statistics for a depth window
    Interpret {
        well_id: i32,
        #[clap(short, long, default_value = "")]
        curves: String,
        #[clap(long)]
        depth_min: f64,
        #[clap(long)]
        depth_max: f64,
    },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let cfg = Config::from_env();
    let db = connect(&cfg).await?;

    match args.command {
        Commands::Ingest { file } => {
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("file path has no usable file name")?
                .to_string();
            let bytes =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;

            let files = file_service(&cfg, &db);
            let record = files.upload(&file_name, &bytes).await?;
            info!(file_id = record.id, "uploaded {file_name}");
            let outcome = files.process_file(record.id).await?;
            println!(
                "Ingested {} samples into well '{}' (id={})",
                outcome.sample_count, outcome.well.name, outcome.well.id
            );
        }
        Commands::Process { file_id } => {
            let outcome = file_service(&cfg, &db).process_file(file_id).await?;
            println!(
                "Processed file {} into well '{}' ({} samples)",
                file_id, outcome.well.name, outcome.sample_count
            );
        }
        Commands::Wells => {
            for well in WellService::new(db.clone()).list().await? {
                println!("{}\t{}\t{}", well.id, well.name, well.created_at);
            }
        }
        Commands::Curves { well_id } => {
            let wells = WellService::new(db.clone());
            let names = wells.curve_names(well_id).await?;
            let range = wells.depth_range(well_id).await?;
            println!("curves: {}", names.join(", "));
            match range {
                Some((min, max)) => println!("depth range: {min} to {max}"),
                None => println!("depth range: (no samples)"),
            }
        }
        Commands::Series {
            well_id,
            curves,
            depth_min,
            depth_max,
        } => {
            let names = split_names(&curves);
            let series = VisualizationService::new(db.clone())
                .curve_data(well_id, &names, depth_min, depth_max)
                .await?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Stats {
            well_id,
            curves,
            depth_min,
            depth_max,
        } => {
            let names = split_names(&curves);
            let report = AnalysisService::new(db.clone())
                .analyze(well_id, &names, depth_min, depth_max)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Interpret {
            well_id,
            curves,
            depth_min,
            depth_max,
        } => {
            let api_key = cfg.groq_api_key.clone().unwrap_or_default();
            let client = Arc::new(GroqClient::new(api_key)?);
            let names = split_names(&curves);
            let result = LlmService::new(db.clone(), client)
                .interpret(well_id, &names, depth_min, depth_max)
                .await?;
            println!("{}", result.interpretation);
        }
        Commands::Migrate => {
            // connect() already ran the migrations
            info!("migrations applied");
        }
    }

    Ok(())
}

async fn connect(cfg: &Config) -> Result<DatabaseConnection> {
    let db = connection::establish_connection(&cfg.database_url)
        .await
        .with_context(|| format!("connecting to {}", cfg.database_url))?;
    Migrator::up(&db, None).await.context("running migrations")?;
    Ok(db)
}

fn file_service(cfg: &Config, db: &DatabaseConnection) -> FileService {
    FileService::new(
        db.clone(),
        Arc::new(LocalBlobStore::new(cfg.blob_root.clone())),
        Arc::new(NullSink),
    )
}

fn split_names(curves: &str) -> Vec<String> {
    curves
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .init();
}
