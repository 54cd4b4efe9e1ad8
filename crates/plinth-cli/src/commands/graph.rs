//! `plinth graph`: load a manifest and report the linked graph.

use std::fmt::Write as _;
use std::path::Path;

use plinth_config::{PlinthConfig, ReportFormat};
use plinth_graph::{BuildGraph, BuildLabel, GraphStatistics, TargetState};
use serde::Serialize;
use tracing::debug;

use super::load_graph;
use crate::error::{CliError, Result};
use crate::manifest::Manifest;
use crate::ui;

/// One target as it stands after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub label: BuildLabel,
    pub state: TargetState,
    /// Every declared dependency has been linked to registered targets.
    pub resolved: bool,
    /// Every linked dependency has been built.
    pub ready: bool,
    pub dependencies: Vec<BuildLabel>,
    pub reverse_dependencies: Vec<BuildLabel>,
}

/// A label that was depended on but never registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReport {
    pub label: BuildLabel,
    pub waiters: Vec<BuildLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    pub targets: Vec<TargetReport>,
    pub pending: Vec<PendingReport>,
    pub statistics: GraphStatistics,
}

impl GraphReport {
    pub fn collect(graph: &BuildGraph) -> Self {
        let targets = graph
            .all_targets()
            .into_iter()
            .map(|target| {
                let mut dependencies: Vec<BuildLabel> = target
                    .dependencies()
                    .iter()
                    .map(|dep| dep.label.clone())
                    .collect();
                dependencies.sort();
                let mut reverse_dependencies: Vec<BuildLabel> = graph
                    .reverse_dependencies(&target)
                    .iter()
                    .map(|rdep| rdep.label.clone())
                    .collect();
                reverse_dependencies.sort();

                TargetReport {
                    label: target.label.clone(),
                    state: target.state(),
                    resolved: graph.all_dependencies_resolved(&target),
                    ready: graph.all_deps_built(&target),
                    dependencies,
                    reverse_dependencies,
                }
            })
            .collect();

        let pending = graph
            .pending_labels()
            .into_iter()
            .map(|label| PendingReport {
                waiters: graph.pending_waiters(&label),
                label,
            })
            .collect();

        Self {
            targets,
            pending,
            statistics: graph.statistics(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for target in &self.targets {
            let status = match (target.resolved, target.ready) {
                (true, true) => "ready",
                (true, false) => "resolved",
                (false, _) => "waiting",
            };
            let _ = writeln!(out, "{} [{}]", target.label, status);
            if !target.dependencies.is_empty() {
                let _ = writeln!(out, "  deps:  {}", join(&target.dependencies));
            }
            if !target.reverse_dependencies.is_empty() {
                let _ = writeln!(out, "  rdeps: {}", join(&target.reverse_dependencies));
            }
        }
        for pending in &self.pending {
            let _ = writeln!(
                out,
                "{} [missing] wanted by {}",
                pending.label,
                join(&pending.waiters)
            );
        }
        let stats = &self.statistics;
        let _ = writeln!(
            out,
            "{} targets, {} packages, {} edges, {} pending",
            stats.target_count,
            stats.package_count,
            stats.resolved_edge_count,
            stats.pending_label_count
        );
        out
    }
}

fn join(labels: &[BuildLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn execute(manifest_path: &Path, config: &PlinthConfig) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    debug!(
        path = %manifest_path.display(),
        packages = manifest.packages.len(),
        targets = manifest.target_count(),
        "manifest parsed"
    );

    let graph = load_graph(&manifest, config.jobs)?;
    let report = GraphReport::collect(&graph);

    match config.report {
        ReportFormat::Text => print!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.pending.is_empty() {
        ui::success(&format!(
            "linked {} targets across {} packages",
            report.statistics.target_count, report.statistics.package_count
        ));
        return Ok(());
    }

    let labels: Vec<BuildLabel> = report.pending.into_iter().map(|p| p.label).collect();
    if config.strict {
        return Err(CliError::UnresolvedDependencies { labels });
    }
    ui::warning(&format!(
        "{} dependencies never appeared in the manifest: {}",
        labels.len(),
        join(&labels)
    ));
    Ok(())
}
