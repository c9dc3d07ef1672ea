use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::analysis::backbone::{Backbone, BackboneGraph, Branch, GraphEdge};
use crate::analysis::pipeline::Analysis;
use crate::data::model::DifferenceRecord;

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One difference record flattened for CSV output.
#[derive(Debug, Serialize)]
pub struct DifferenceRow<'a> {
    pub peak_1: f64,
    pub peak_2: f64,
    pub peak_difference: f64,
    pub assigned: Option<&'a str>,
    pub assigned_symbol: &'a str,
    pub assigned_mass: f64,
    pub ion_type: String,
    pub kind: String,
    pub unit_count: usize,
}

impl<'a> From<&'a DifferenceRecord> for DifferenceRow<'a> {
    fn from(record: &'a DifferenceRecord) -> Self {
        DifferenceRow {
            peak_1: record.peak1,
            peak_2: record.peak2,
            peak_difference: record.delta,
            assigned: record.assigned_name(),
            assigned_symbol: record.assigned_symbol(),
            assigned_mass: record.assigned_mass(),
            ion_type: record
                .assignment
                .as_ref()
                .map(|a| a.ion_label())
                .unwrap_or_default(),
            kind: record.kind().map(|k| k.to_string()).unwrap_or_default(),
            unit_count: record.unit_count(),
        }
    }
}

/// Graph in a layout-ready shape: nodes, labelled edges, backbone and branches.
#[derive(Debug, Serialize)]
pub struct GraphReport<'a> {
    pub nodes: &'a [f64],
    pub edges: Vec<&'a GraphEdge>,
    pub backbone: &'a Backbone,
    pub branches: Vec<Branch>,
}

impl<'a> From<&'a BackboneGraph> for GraphReport<'a> {
    fn from(graph: &'a BackboneGraph) -> Self {
        GraphReport {
            nodes: graph.nodes(),
            edges: graph.edges().collect(),
            backbone: graph.backbone(),
            branches: graph.branches(),
        }
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write every result table plus the graph into `dir`, creating it if needed.
///
/// Files: `peaks.csv`, `differences.csv`, `assigned.csv`, `unassigned.csv`,
/// `unmatched.csv`, `histogram.csv`, `graph.json`.
pub fn write_report(analysis: &Analysis, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    write_csv(&dir.join("peaks.csv"), &analysis.peaks)?;
    write_csv(
        &dir.join("differences.csv"),
        analysis.differences().map(DifferenceRow::from),
    )?;
    write_csv(
        &dir.join("assigned.csv"),
        analysis.assigned.iter().map(DifferenceRow::from),
    )?;
    write_csv(
        &dir.join("unassigned.csv"),
        analysis.unassigned.iter().map(DifferenceRow::from),
    )?;
    write_csv(&dir.join("unmatched.csv"), &analysis.unmatched)?;
    write_csv(&dir.join("histogram.csv"), &analysis.histogram)?;
    write_graph(&dir.join("graph.json"), &analysis.graph)?;

    info!("Wrote report to {}", dir.display());
    Ok(())
}

fn write_csv<I, T>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

pub fn write_graph(path: &Path, graph: &BackboneGraph) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &GraphReport::from(graph)).context("serialising graph")?;
    Ok(())
}
