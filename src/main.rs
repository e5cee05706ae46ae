use anyhow::Result;
use clap::{Parser, Subcommand};
use costboard::combiner::Combiner;
use costboard::config::Config;
use costboard::query::QueryEngine;
use costboard::report::ReportRenderer;
use costboard::{logging, server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "costboard")]
#[command(about = "Per-service cloud cost allocation and dashboard API")]
#[command(version)]
struct Cli {
    /// Explicit config file (defaults to costboard.toml lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect and persist cost datasets
    Collect {
        /// Period label to collect (defaults to every configured period)
        #[arg(long)]
        period: Option<String>,
        /// Output the combine report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the aggregated cost report for a period
    Report {
        /// Period label to report on
        #[arg(long)]
        period: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Serve the dashboard query API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    let _log_guard = logging::init_logging(&config);

    let renderer = ReportRenderer::new();

    match cli.command {
        Commands::Collect { period, json } => {
            let combiner = Combiner::new(&config);
            match period {
                Some(label) => {
                    let report = combiner.combine(&label)?;
                    renderer.render_combine(&report, json);
                }
                None => {
                    for (label, result) in combiner.combine_all() {
                        match result {
                            Ok(report) => renderer.render_combine(&report, json),
                            Err(e) => eprintln!("Error collecting {label}: {e}"),
                        }
                    }
                }
            }
            Ok(())
        }
        Commands::Report { period, json } => {
            let engine = QueryEngine::new(Arc::new(config));
            let overview = engine.overview(&period);
            renderer.render_overview(&period, &overview, json);
            Ok(())
        }
        Commands::Serve { bind } => {
            let engine = Arc::new(QueryEngine::new(Arc::new(config)));
            server::serve(engine, bind).await
        }
    }
}
