use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use hypecycle_core::{PipelineConfig, Verbosity};
use hypecycle_graph::MemoryGraphStore;
use hypecycle_pipeline::{NullExternalSearch, Pipeline, TechRef};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "hypecycle")]
#[command(about = "Hype Cycle Analytical Pipeline CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a `hypecycle.toml` config file (optional; env vars and
    /// defaults still apply).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format.
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Verbosity passed through to the orchestrator's logging hook.
    #[arg(long, global = true, value_enum, default_value = "normal")]
    verbosity: VerbosityArg,

    /// Run against the in-process `MemoryGraphStore` and a deterministic
    /// fake LLM provider instead of the configured backends. Useful for
    /// demos and CI since it needs no network access.
    #[arg(long, global = true)]
    offline: bool,

    /// Analysis anchor date (ISO-8601, e.g. `2026-07-27`). Defaults to
    /// today if omitted; set explicitly for reproducible runs.
    #[arg(long, global = true)]
    anchor_date: Option<chrono::NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, ValueEnum)]
enum VerbosityArg {
    Silent,
    Normal,
    Verbose,
    Debug,
}

impl From<VerbosityArg> for Verbosity {
    fn from(v: VerbosityArg) -> Self {
        match v {
            VerbosityArg::Silent => Verbosity::Silent,
            VerbosityArg::Normal => Verbosity::Normal,
            VerbosityArg::Verbose => Verbosity::Verbose,
            VerbosityArg::Debug => Verbosity::Debug,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the twelve-stage pipeline for a single technology.
    Analyze {
        /// Technology id as it appears in the property graph.
        id: String,
        /// Display name.
        #[arg(short, long)]
        name: String,
        /// Domain label shown on the chart record.
        #[arg(short, long, default_value = "unspecified")]
        domain: String,
    },

    /// Run the pipeline over an explicit list of `id:name:domain` triples.
    Batch {
        /// One `id:name:domain` triple per technology.
        #[arg(required = true)]
        techs: Vec<String>,
    },

    /// Sample technologies and emit the full chart document (spec §6.1).
    Chart,
}

fn init_tracing(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Silent => "error",
        Verbosity::Normal => "warn,hypecycle=info",
        Verbosity::Verbose => "info,hypecycle=debug",
        Verbosity::Debug => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .try_init();
}

fn parse_tech(spec: &str) -> Result<TechRef> {
    let mut parts = spec.splitn(3, ':');
    let id = parts.next().context("missing tech id")?.to_string();
    let name = parts.next().unwrap_or(&id).to_string();
    let domain = parts.next().unwrap_or("unspecified").to_string();
    Ok(TechRef { id, name, domain })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity.clone().into());

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(anchor) = cli.anchor_date {
        config.analysis_anchor_date = Some(anchor);
    }
    config.verbosity = cli.verbosity.clone().into();
    if cli.offline {
        config.llm_provider = "fake".to_string();
    }

    let graph = Arc::new(MemoryGraphStore::new());
    let llm = hypecycle_ai::create_provider(&config.llm_provider).context("failed to construct LLM provider")?;
    let external_search = Arc::new(NullExternalSearch);

    let pipeline = Pipeline::new(graph, llm, external_search, config);

    let output = match &cli.command {
        Commands::Analyze { id, name, domain } => {
            let tech = TechRef {
                id: id.clone(),
                name: name.clone(),
                domain: domain.clone(),
            };
            let state = pipeline.analyze_one(&tech).await;
            serde_json::to_value(hypecycle_pipeline::format_tech_record(&state))?
        }
        Commands::Batch { techs } => {
            let techs: Vec<TechRef> = techs.iter().map(|s| parse_tech(s)).collect::<Result<_>>()?;
            let states = pipeline.analyze_many(&techs, CancellationToken::new()).await;
            let records: Vec<_> = states.iter().map(hypecycle_pipeline::format_tech_record).collect();
            serde_json::to_value(records)?
        }
        Commands::Chart => {
            let document = pipeline.generate_chart(CancellationToken::new()).await;
            serde_json::to_value(document)?
        }
    };

    print_output(&cli.output, &output)?;
    Ok(())
}

fn print_output(format: &OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Pretty => print_pretty(value)?,
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                let key_colored = key.cyan().bold();
                match val {
                    serde_json::Value::String(s) => println!("{}: {}", key_colored, s.green()),
                    serde_json::Value::Number(n) => println!("{}: {}", key_colored, n.to_string().yellow()),
                    serde_json::Value::Bool(b) => {
                        let colored = if *b { "true".green() } else { "false".red() };
                        println!("{}: {}", key_colored, colored);
                    }
                    _ => println!("{}: {}", key_colored, val),
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                println!("\n{}{}:", "Item ".cyan(), (i + 1).to_string().yellow());
                print_pretty(item)?;
            }
        }
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
