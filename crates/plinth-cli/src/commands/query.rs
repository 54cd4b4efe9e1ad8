//! `plinth query`: what a dependency edge resolves to.

use plinth_config::{PlinthConfig, ReportFormat};
use plinth_graph::{BuildLabel, GraphError};

use super::load_graph;
use crate::cli::QueryArgs;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::ui;

pub fn execute(args: &QueryArgs, config: &PlinthConfig) -> Result<()> {
    let labels = resolve(args, config)?;
    match config.report {
        ReportFormat::Text => {
            for label in &labels {
                println!("{label}");
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&labels)?),
    }
    Ok(())
}

/// Load the manifest and compute `dependent_targets(FROM, TO)`.
pub fn resolve(args: &QueryArgs, config: &PlinthConfig) -> Result<Vec<BuildLabel>> {
    let from = BuildLabel::parse(&args.from).map_err(GraphError::from)?;
    let to = BuildLabel::parse(&args.to).map_err(GraphError::from)?;

    let manifest = Manifest::load(&args.manifest)?;
    let graph = load_graph(&manifest, config.jobs)?;

    for label in [&from, &to] {
        if !graph.contains(label) {
            ui::warning(&format!("{label} is not declared in the manifest"));
        }
    }
    let declared = graph
        .target(&from)
        .is_some_and(|target| target.declared_dependencies().contains(&to));
    if graph.contains(&from) && !declared {
        ui::info(&format!("{from} does not declare a dependency on {to}"));
    }
    Ok(graph.dependent_targets(&from, &to))
}
