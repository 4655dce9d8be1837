use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use coderater::{AnalysisOrchestrator, InMemoryStore, LintStyleAnalyzer, ScoringConfig};

/// Analyze Java source files and print their quality reports as JSON
#[derive(Parser)]
#[command(name = "coderater", version, about)]
struct Cli {
    /// Java source files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file overriding the default scoring weights and thresholds
    #[arg(long)]
    scoring_config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let scoring = match &cli.scoring_config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
            toml::from_str::<ScoringConfig>(&raw)
                .with_context(|| format!("Invalid scoring config {}", path.display()))?
        }
        None => ScoringConfig::default(),
    };

    let orchestrator = AnalysisOrchestrator::with_scoring(
        InMemoryStore::new(),
        LintStyleAnalyzer::default(),
        scoring,
    );

    let mut keys = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed.java".to_string());
        let key = path.display().to_string();
        orchestrator.ingest(&key, &file_name, content)?;
        keys.push(key);
    }

    let reports = keys
        .par_iter()
        .map(|key| orchestrator.analyze(key))
        .collect::<Result<Vec<_>, _>>()?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{output}");

    Ok(())
}
