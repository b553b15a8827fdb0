use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use series_aggregator::{
    config::{AggregatorConfig, load_config_path},
    request::{AggregationRequest, handle_message},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Bucketed payment aggregation over a BSON dump")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// BSON dump to read; overrides config and AGGREGATOR_SOURCE_PATH
    #[arg(long, value_name = "FILE")]
    source: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run one aggregation and print the series as JSON
    Query {
        /// Range start, e.g. "2022-09-01T00:00:00"
        #[arg(long)]
        from: String,
        /// Range end (inclusive), e.g. "2022-12-31T23:59:00"
        #[arg(long)]
        upto: String,
        /// hour, day or month
        #[arg(long)]
        group: String,
    },
    /// Answer one JSON request per stdin line until EOF
    Serve,
}

fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(cli.config.as_deref(), cli.source)?;

    match cli.cmd {
        Cmd::Query { from, upto, group } => {
            let req = AggregationRequest {
                dt_from: from,
                dt_upto: upto,
                group_type: group,
            };
            let series = req.execute(&cfg.source.path)?;
            println!("{}", series.to_json_pretty(cfg.response.indent)?);
        }
        Cmd::Serve => serve(&cfg)?,
    }

    Ok(())
}

/// defaults < file < env < flag
fn resolve_config(
    path: Option<&std::path::Path>,
    source: Option<PathBuf>,
) -> Result<AggregatorConfig> {
    let mut cfg = match path {
        Some(p) => load_config_path(p)?,
        None => AggregatorConfig::default(),
    };
    cfg.apply_env()?;
    if let Some(src) = source {
        cfg.source.path = src;
    }
    cfg.validate()?;
    tracing::info!(source = %cfg.source.path.display(), "configuration resolved");
    Ok(cfg)
}

fn serve(cfg: &AggregatorConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("read request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_message(&line, &cfg.source.path, cfg.response.indent);
        writeln!(stdout, "{reply}").context("write reply")?;
        stdout.flush().context("flush reply")?;
    }

    Ok(())
}
