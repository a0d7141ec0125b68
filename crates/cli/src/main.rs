mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use mx_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = cli::load_config(cli.config.as_deref())?;
    init_cli_tracing(&config.observability, cli.log_json);
    tracing::debug!(config = %config_path, "configuration loaded");

    cli::query::run(config, cli).await
}

/// Initialize stderr-only tracing for one-shot queries.
///
/// Defaults to the configured filter (`warn` unless overridden) so
/// diagnostic output does not pollute stdout. `RUST_LOG` wins when set.
fn init_cli_tracing(obs: &ObservabilityConfig, force_json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&obs.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if obs.json || force_json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
