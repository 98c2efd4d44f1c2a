use anyhow::Context;
use clap::Parser;
use scoreswing::cli::Cli;
use scoreswing::{Config, FileLineSource, Pipeline};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration from environment")?;
    let config = cli.apply(config).context("applying command-line overrides")?;

    let source = FileLineSource::new(&cli.input);
    let report = Pipeline::new(config)
        .run_to_file(cli.job, &source, &cli.output)
        .await
        .with_context(|| format!("running {} on {}", cli.job, cli.input.display()))?;

    tracing::info!(
        run_id = %report.run_id,
        output_lines = report.output_lines,
        digest = %report.output_digest,
        "done"
    );
    Ok(())
}
