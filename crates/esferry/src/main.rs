//! esferry CLI
//!
//! Transfer Elasticsearch indices between clusters or dump them to
//! chunked JSONL files.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use esferry::{ProgressBarReporter, TransferConfig, TransferTask};

#[derive(Parser)]
#[command(name = "esferry")]
#[command(version)]
#[command(about = "Ferry Elasticsearch indices between clusters or dump them to JSONL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Page size override
    #[arg(long)]
    docs_per_request: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a transfer from a config file
    Run {
        /// Configuration file path
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Count the documents the configured source query matches
    Count {
        /// Configuration file path
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Generate an example configuration
    Init {
        /// Sink mode (index, jsonl)
        #[arg(short, long)]
        mode: String,

        /// Output file path
        #[arg(short, long, default_value = "transfer.yaml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Run { config }) => {
            run_transfer(&config, cli.docs_per_request).await?;
        }
        Some(Commands::Validate { config }) => {
            validate_config(&config)?;
        }
        Some(Commands::Count { config }) => {
            count_matching(&config).await?;
        }
        Some(Commands::Init { mode, output }) => {
            generate_config(&mode, &output)?;
        }
        None => {
            if let Some(config) = cli.config {
                run_transfer(&config, cli.docs_per_request).await?;
            } else {
                eprintln!("Usage: esferry --config <FILE> or esferry <COMMAND>");
                eprintln!("Try 'esferry --help' for more information.");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_transfer(
    config_path: &PathBuf,
    docs_per_request: Option<usize>,
) -> anyhow::Result<()> {
    info!("Loading configuration from {:?}", config_path);

    let mut config = TransferConfig::from_file(config_path)?;

    if let Some(page_size) = docs_per_request {
        config.options.docs_per_request = page_size;
    }

    let mut task = TransferTask::new(config, Box::new(ProgressBarReporter::new()))?;
    let summary = task.run().await?;

    println!("\n✅ Transfer Complete!");
    println!("   Written:    {}", summary.written);
    println!("   Estimated:  {}", summary.total_estimate);
    println!("   Duration:   {:.2}s", summary.duration_secs);
    println!("   Throughput: {:.0} docs/sec", summary.throughput());

    Ok(())
}

fn validate_config(config_path: &PathBuf) -> anyhow::Result<()> {
    let config = TransferConfig::from_file(config_path)?;
    config.validate()?;

    println!("✅ Configuration is valid!");
    println!("   Source index: {}", config.source.index);
    match &config.sink {
        esferry::SinkConfig::Index(sink) => {
            println!("   Destination index: {}", sink.index);
        }
        esferry::SinkConfig::Jsonl(sink) => {
            println!("   Dump directory: {}", sink.dir.display());
            println!("   Docs per file: {}", sink.docs_per_file);
        }
    }
    println!("   Docs per request: {}", config.options.docs_per_request);

    Ok(())
}

async fn count_matching(config_path: &PathBuf) -> anyhow::Result<()> {
    let config = TransferConfig::from_file(config_path)?;
    config.validate()?;

    let source = esferry::IndexSource::new(&config.source, config.options.docs_per_request)?;
    let count = source.count().await?;

    println!("📊 {}: {} matching documents", config.source.index, count);

    Ok(())
}

fn generate_config(mode: &str, output: &PathBuf) -> anyhow::Result<()> {
    let template = match mode.to_lowercase().as_str() {
        "index" => INDEX_TEMPLATE,
        "jsonl" => JSONL_TEMPLATE,
        _ => {
            eprintln!("Unknown sink mode: {}", mode);
            eprintln!("Supported modes: index, jsonl");
            std::process::exit(1);
        }
    };

    std::fs::write(output, template)?;
    println!("✅ Generated configuration: {:?}", output);
    println!("   Edit the file and run: esferry run --config {:?}", output);

    Ok(())
}

const INDEX_TEMPLATE: &str = r#"# esferry Transfer Configuration - cluster to cluster
source:
  hosts: http://localhost:9200  # comma-separated for several nodes
  index: your_index
  # query:                      # full request body; default is match-all
  #   query:
  #     term:
  #       status: active

sink:
  type: index
  hosts: http://localhost:9201
  index: your_index_copy

options:
  docs_per_request: 10000
"#;

const JSONL_TEMPLATE: &str = r#"# esferry Transfer Configuration - index to JSONL dump
source:
  hosts: http://localhost:9200  # comma-separated for several nodes
  index: your_index

sink:
  type: jsonl
  dir: ./dumps
  docs_per_file: 100

options:
  docs_per_request: 10000
"#;
