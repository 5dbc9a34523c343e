//! Command-line checker for climate-statistic query expressions
//!
//! Parses an expression, resolves its units against a series registry and
//! prints either the resolved units or the annotated diagnostic tree.
//!
//! Usage:
//!   nimbus [--registry series.json] [--show-tree] '<expression>'
//!
//! The registry file maps series names to unit strings, e.g.
//!   { "Observed Rainfall": "mm", "Observed Max Temp": "Kelvin" }

use anyhow::{Context, Result};
use clap::Parser;
use nimbus_dsl::InMemoryRegistry;
use nimbus_units::Units;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[clap(name = "nimbus")]
#[clap(about = "Check climate-statistic query expressions for dimensional consistency")]
struct Args {
    /// JSON file mapping series names to unit strings
    #[clap(short, long)]
    registry: Option<PathBuf>,

    /// Print the parsed expression tree before analyzing it
    #[clap(long)]
    show_tree: bool,

    /// The query expression to check
    expression: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let registry = load_registry(args.registry.as_deref())?;

    let expr = match nimbus_dsl::parse(&args.expression) {
        Ok(expr) => expr,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    debug!(expression = %args.expression, "parsed expression");

    if args.show_tree {
        println!("{}", nimbus_dsl::printer::render(&expr));
    }

    match nimbus_dsl::units(&expr, &registry) {
        Ok(units) => {
            let text = units.to_string();
            if text.is_empty() {
                println!("dimensionless");
            } else {
                println!("{text}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn load_registry(path: Option<&Path>) -> Result<InMemoryRegistry> {
    let Some(path) = path else {
        return default_registry();
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file {}", path.display()))?;
    let entries: HashMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("registry file {} is not a JSON object", path.display()))?;

    let mut registry = InMemoryRegistry::new();
    for (name, unit_text) in entries {
        let units = Units::parsed_from(&unit_text)
            .with_context(|| format!("invalid units '{unit_text}' for series '{name}'"))?;
        registry.insert(&name, units);
    }
    debug!("loaded series registry from {}", path.display());
    Ok(registry)
}

/// The portal's stock series, used when no registry file is given.
fn default_registry() -> Result<InMemoryRegistry> {
    let mut registry = InMemoryRegistry::new();
    for (name, unit_text) in [
        ("Observed Rainfall", "mm"),
        ("Gridded Rainfall", "mm"),
        ("Projected Rainfall", "mm"),
        ("Observed Max Temp", "Kelvin"),
        ("Observed Min Temp", "Kelvin"),
    ] {
        registry.insert(name, Units::parsed_from(unit_text)?);
    }
    Ok(registry)
}
