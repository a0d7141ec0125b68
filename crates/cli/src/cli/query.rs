//! `mapexplorer <prompt>`: run one query and print what landed on the map.

use std::io::Write;

use anyhow::Context;
use mx_domain::config::Config;
use mx_explorer::{Explorer, GeoJsonMap, Mode, QueryResult};

use super::Cli;

/// Run one query against the configured provider and render the result to
/// stdout. Diagnostics go to stderr through `tracing`.
pub async fn run(config: Config, cli: Cli) -> anyhow::Result<()> {
    let provider = mx_providers::from_config(&config.provider)
        .context("initializing model provider")?;

    let mut settings = config.explorer.clone();
    if cli.model.is_some() {
        settings.model = cli.model.clone();
    }

    let explorer = Explorer::new(provider, GeoJsonMap::new(), settings);
    let mode = Mode::from_planner_flag(cli.planner);
    let result = explorer.run_query_in(&cli.prompt, mode).await?;

    if let Some(path) = &cli.geojson {
        let collection = explorer.with_store(|store| store.map().feature_collection());
        let body = serde_json::to_string_pretty(&collection)?;
        std::fs::write(path, body).with_context(|| format!("writing {path}"))?;
        tracing::info!(path = %path, "wrote GeoJSON overlay");
    }

    let mut out = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        render_text(&mut out, &result, mode)?;
    }
    Ok(())
}

fn render_text(out: &mut impl Write, result: &QueryResult, mode: Mode) -> std::io::Result<()> {
    if mode.is_planner() && !result.day_plan.is_empty() {
        writeln!(out, "Day plan")?;
        for stop in &result.day_plan {
            let time = stop.time.as_deref().unwrap_or("");
            match &stop.duration {
                Some(duration) => writeln!(out, "  {time}  {} ({duration})", stop.name)?,
                None => writeln!(out, "  {time}  {}", stop.name)?,
            }
            if !stop.description.is_empty() {
                writeln!(out, "         {}", stop.description)?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "Locations ({})", result.locations.len())?;
    for loc in &result.locations {
        writeln!(
            out,
            "  {} [{:.4}, {:.4}]",
            loc.name, loc.position.lat, loc.position.lng
        )?;
        if !loc.description.is_empty() {
            writeln!(out, "    {}", loc.description)?;
        }
    }

    if !result.lines.is_empty() {
        writeln!(out)?;
        writeln!(out, "Routes ({})", result.lines.len())?;
        for route in &result.lines {
            let mut detail = Vec::new();
            if let Some(t) = &route.transport {
                detail.push(t.as_str());
            }
            if let Some(t) = &route.travel_time {
                detail.push(t.as_str());
            }
            if detail.is_empty() {
                writeln!(out, "  {}", route.name)?;
            } else {
                writeln!(out, "  {} ({})", route.name, detail.join(", "))?;
            }
        }
    }
    Ok(())
}
