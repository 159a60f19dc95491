use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weedwise_cli::build_cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "weedwise=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = build_cli().get_matches();
    let mut out = std::io::stdout();

    let status = weedwise_cli::run(&matches, &mut out).await?;
    Ok(status.exit_code())
}
