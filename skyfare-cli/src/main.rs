use anyhow::Context;
use clap::Parser;
use skyfare_cli::{execute, Cli, Config};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyfare_cli=info,skyfare_offer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config_dir)
        .with_context(|| format!("Failed to load config from {}", cli.config_dir.display()))?;

    let today = chrono::Local::now().date_naive();
    let report = execute(&cli, &config, today).await;
    println!("{}", report.text);

    Ok(if report.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
