pub mod query;

use clap::Parser;

/// mapexplorer: ask a model about places and get them back as map overlays.
#[derive(Debug, Parser)]
#[command(name = "mapexplorer", version, about)]
pub struct Cli {
    /// What to explore, e.g. "street food in Bangkok".
    pub prompt: String,
    /// Plan a time-sequenced day trip instead of listing points of interest.
    #[arg(long)]
    pub planner: bool,
    /// Path to the config file (overrides `MX_CONFIG`).
    #[arg(long)]
    pub config: Option<String>,
    /// Model override (e.g. "gemini-2.5-pro").
    #[arg(long)]
    pub model: Option<String>,
    /// Output the full result as JSON instead of plain text.
    #[arg(long)]
    pub json: bool,
    /// Also write the drawn overlay as a GeoJSON FeatureCollection to this path.
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<String>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    pub log_json: bool,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from `--config`, else `MX_CONFIG`, else
/// `mapexplorer.toml`. A missing file yields defaults. Returns the parsed
/// [`Config`](mx_domain::config::Config) and the path that was used.
pub fn load_config(
    explicit: Option<&str>,
) -> anyhow::Result<(mx_domain::config::Config, String)> {
    let config_path = match explicit {
        Some(path) => path.to_string(),
        None => std::env::var("MX_CONFIG").unwrap_or_else(|_| "mapexplorer.toml".into()),
    };

    let config = mx_domain::config::Config::load_or_default(&config_path)
        .map_err(|e| anyhow::anyhow!("loading {config_path}: {e}"))?;

    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "mapexplorer",
            "Kyoto temples",
            "--planner",
            "--json",
            "--geojson",
            "out.geojson",
        ]);
        assert_eq!(cli.prompt, "Kyoto temples");
        assert!(cli.planner);
        assert!(cli.json);
        assert_eq!(cli.geojson.as_deref(), Some("out.geojson"));
        assert!(!cli.log_json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn missing_explicit_config_yields_defaults() {
        let (config, path) = load_config(Some("/nonexistent/mapexplorer.toml")).unwrap();
        assert_eq!(path, "/nonexistent/mapexplorer.toml");
        assert_eq!(config.provider.id, "google");
    }
}
