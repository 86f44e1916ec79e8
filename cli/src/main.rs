//! orgtree CLI: infer, evaluate and audit reporting hierarchies
//!
//! Runs the inference pipeline locally on CSV relations, or serves it over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use orgtree::evaluation::{format_cycle, CycleReport, DEFAULT_CYCLE_LIMIT};
use orgtree::http::{AppState, HttpServer};
use orgtree::persistence::{load_connections, load_employees, load_predictions, write_predictions};
use orgtree::{audit_cycles, embed, evaluate, EmployeeId, HierarchyPipeline, OrgTreeConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orgtree", version, about = "Reporting-hierarchy inference")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "ORGTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the hierarchy and write the prediction relation
    Predict {
        #[arg(long, default_value = "data/employees.csv")]
        employees: PathBuf,

        #[arg(long, default_value = "data/connections.csv")]
        connections: PathBuf,

        #[arg(long, default_value = "submission.csv")]
        output: PathBuf,

        /// Employee forced to be the root
        #[arg(long)]
        root: Option<i64>,

        /// Weight of profile-embedding similarity
        #[arg(long)]
        weight_similarity: Option<f64>,

        /// Weight of the shared-neighbor count
        #[arg(long)]
        weight_common_neighbors: Option<f64>,

        /// Weight of the seniority-gap bonus
        #[arg(long)]
        weight_seniority_gap: Option<f64>,

        /// Weight of the location-match bonus
        #[arg(long)]
        weight_location: Option<f64>,
    },
    /// Score a prediction relation against ground truth
    Evaluate {
        predictions: PathBuf,
        ground_truth: PathBuf,
    },
    /// List reporting cycles in a prediction relation
    Audit {
        predictions: PathBuf,

        /// Maximum number of cycles to list
        #[arg(long, default_value_t = DEFAULT_CYCLE_LIMIT)]
        limit: usize,
    },
    /// Serve the prediction API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = OrgTreeConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            info!(path = %path.display(), "loaded configuration");
            config
        }
        None => OrgTreeConfig::default(),
    };

    match cli.command {
        Commands::Predict {
            employees,
            connections,
            output,
            root,
            weight_similarity,
            weight_common_neighbors,
            weight_seniority_gap,
            weight_location,
        } => {
            if let Some(root) = root {
                config.root.employee_id = Some(EmployeeId::new(root));
            }
            let weights = &mut config.scoring;
            for (flag, target) in [
                (weight_similarity, &mut weights.embedding_similarity),
                (weight_common_neighbors, &mut weights.common_neighbors),
                (weight_seniority_gap, &mut weights.seniority_gap),
                (weight_location, &mut weights.location_match),
            ] {
                if let Some(value) = flag {
                    *target = value;
                }
            }
            run_predict(config, &employees, &connections, &output, &cli.format).await
        }
        Commands::Evaluate {
            predictions,
            ground_truth,
        } => run_evaluate(&predictions, &ground_truth, &cli.format),
        Commands::Audit { predictions, limit } => run_audit(&predictions, limit, &cli.format),
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_serve(config).await
        }
    }
}

async fn run_predict(
    config: OrgTreeConfig,
    employees_path: &Path,
    connections_path: &Path,
    output: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let employees = load_employees(employees_path)?;
    let connections = load_connections(connections_path)?;

    let pipeline = HierarchyPipeline::from_config(config)?;
    let outcome = pipeline.run(&employees, &connections).await?;

    write_predictions(output, &outcome.predictions)
        .with_context(|| format!("writing predictions to {}", output.display()))?;

    print_report(&serde_json::to_value(&outcome.report)?, format)?;
    eprintln!("Cycle-free predictions written to {}", output.display());
    Ok(())
}

fn run_evaluate(predictions: &Path, ground_truth: &Path, format: &OutputFormat) -> Result<()> {
    let predicted = load_predictions(predictions)?;
    let truth = load_predictions(ground_truth)?;
    let report = evaluate(&predicted, &truth)?;

    match format {
        OutputFormat::Table => {
            print_report(&serde_json::to_value(&report)?, format)?;
            println!("Manager Prediction Accuracy: {:.2}%", report.accuracy * 100.0);
        }
        _ => print_report(&serde_json::to_value(&report)?, format)?,
    }
    Ok(())
}

fn run_audit(predictions: &Path, limit: usize, format: &OutputFormat) -> Result<()> {
    let rows = load_predictions(predictions)?;
    let report = audit_cycles(&rows, limit);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            println!("cycle,length,path");
            for (i, cycle) in report.cycles.iter().enumerate() {
                println!("{},{},{}", i + 1, cycle.len(), format_cycle(cycle));
            }
        }
        OutputFormat::Table => print_cycle_table(&report),
    }
    Ok(())
}

fn print_cycle_table(report: &CycleReport) {
    if report.duplicate_rows > 0 {
        eprintln!("Warning: {} row(s) repeat an employee id", report.duplicate_rows);
    }
    if report.is_acyclic() {
        println!("No cycles found in {} employees; the hierarchy is a valid forest.", report.employees);
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Length", "Cycle"]);
    for (i, cycle) in report.cycles.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), cycle.len().to_string(), format_cycle(cycle)]);
    }
    println!("{}", table);
    println!(
        "{} cycle(s) in {} component(s){}",
        report.cycles.len(),
        report.cyclic_components,
        if report.truncated { " (truncated)" } else { "" }
    );
}

async fn run_serve(config: OrgTreeConfig) -> Result<()> {
    config.validate()?;
    let embedder = embed::from_config(&config.embedding)?;
    let server = HttpServer::new(Arc::new(AppState { config, embedder }));
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {}", e))
}

/// Flatten a JSON object into `a.b = value` rows
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&key, inner, rows);
            }
        }
        Value::Null => rows.push((prefix.to_string(), String::new())),
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

fn print_report(report: &Value, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => {
            let mut rows = Vec::new();
            flatten("", report, &mut rows);
            println!("metric,value");
            for (key, value) in rows {
                println!("{},{}", key, value);
            }
        }
        OutputFormat::Table => {
            let mut rows = Vec::new();
            flatten("", report, &mut rows);
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Metric", "Value"]);
            for (key, value) in rows {
                table.add_row(vec![key, value]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
