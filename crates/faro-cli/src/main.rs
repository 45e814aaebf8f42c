use anyhow::Context;
use clap::Parser;
use tracing::info;

use faro_config::FaroConfig;
use faro_lake::{S3InsightSink, S3RecordSource};
use faro_model::HttpModelGateway;
use faro_pipeline::Runner;

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("faro error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        cli::Commands::Run(args) => run_pipeline(&args).await,
    }
}

async fn run_pipeline(args: &cli::RunArgs) -> anyhow::Result<()> {
    let config = FaroConfig::load_with_dotenv().context("failed to load configuration")?;
    config.require_run_sections()?;

    let gateway = HttpModelGateway::new(&config.model)?;
    let records = S3RecordSource::new(&config.storage)?;
    let sink = S3InsightSink::new(&config.storage)?;
    let runner = Runner {
        records: &records,
        gateway: &gateway,
        sink: &sink,
        model: &config.model,
        pipeline: &config.pipeline,
    };

    let targets: Vec<(String, String)> = match &args.source {
        Some(label) => {
            let prefix = config
                .sources
                .get(label)
                .with_context(|| format!("unknown source '{label}' (configured: {})", source_labels(&config)))?;
            vec![(label.clone(), prefix.clone())]
        }
        None => config
            .sources
            .iter()
            .map(|(label, prefix)| (label.clone(), prefix.clone()))
            .collect(),
    };

    let mut all_fatal_sources = Vec::new();
    for (label, prefix) in targets {
        info!(source = %label, prefix = %prefix, "running source");
        let report = runner.run_source(&label, &prefix).await;
        println!(
            "{}: {} records, {} conversations, {} summaries ({} failed), {} documents persisted, {} fatal records",
            report.source,
            report.records,
            report.conversations,
            report.summaries,
            report.summarization_failures,
            report.successes,
            report.fatals,
        );
        if report.is_all_fatal() {
            all_fatal_sources.push(label);
        }
    }

    if !all_fatal_sources.is_empty() {
        anyhow::bail!(
            "sources ended with only fatal records: {}",
            all_fatal_sources.join(", ")
        );
    }
    Ok(())
}

fn source_labels(config: &FaroConfig) -> String {
    config
        .sources
        .keys()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FARO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
