//! Pipeline orchestration for the `strata` commands.
//!
//! `run` drives the full flow: read the benchmark, load or synthesize die
//! assignments, build the die topology, migrate instances, synthesize the
//! cross-die interconnect, legalize rows, and report. `report` stops after
//! reading the benchmark. Printing is kept apart from execution so the
//! pipeline itself stays testable.

use std::error::Error;
use std::path::Path;

use strata_common::DiagnosticSink;
use strata_db::stats::{design_hpwl, utilization};
use strata_db::Design;
use strata_legalize::{legalize_design, LegalizeMode};
use strata_partition::{apply_assignments, bisect_by_area, read_assignments, DieStackFlow};

use crate::config::{load_config, load_config_from_str, ConfigError, FlowConfig};
use crate::{GlobalArgs, ReportArgs, ReportFormat, RunArgs};

/// Resolved flow parameters (config file merged with CLI flags).
#[derive(Debug, Clone, Copy)]
pub struct FlowParams {
    /// Number of dies to stack.
    pub dies: usize,
    /// Area ratio between adjacent dies.
    pub area_ratio: f64,
    /// Which legalizer path to run.
    pub mode: LegalizeMode,
}

/// Per-block outcome for reporting.
#[derive(Debug, Clone)]
pub struct BlockSummary {
    /// Block name.
    pub name: String,
    /// Cell count after migration.
    pub cells: usize,
    /// Cell area over die area.
    pub utilization: f64,
    /// The legalizer skipped the block as overfull.
    pub skipped_overfull: bool,
    /// Legalization failure, if any.
    pub error: Option<String>,
}

/// Everything a `run` produced, ready for rendering.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Instances migrated into die blocks.
    pub moved: usize,
    /// Cross-die bond nets synthesized.
    pub bond_nets: usize,
    /// Total half-perimeter wirelength over all blocks.
    pub hpwl: i64,
    /// Root block followed by each die block.
    pub blocks: Vec<BlockSummary>,
    /// Warnings and errors accumulated along the way.
    pub diagnostics: Vec<String>,
    /// Count of blocks whose legalization failed.
    pub failures: usize,
}

/// Executes the full pipeline on a benchmark file.
pub fn execute_run(
    bench: &Path,
    assignments: Option<&Path>,
    params: FlowParams,
) -> Result<RunOutcome, Box<dyn Error>> {
    let (mut design, _info) = strata_bench::read_bench(bench)?;
    let sink = DiagnosticSink::new();

    let assignments = match assignments {
        Some(path) => read_assignments(path)?,
        None => bisect_by_area(&design, params.dies),
    };
    apply_assignments(&mut design, &sink, &assignments);

    let flow = DieStackFlow::new(params.dies, params.area_ratio);
    flow.build_dies(&mut design)?;
    let (moved, interconnect) = flow.distribute(&mut design, &sink)?;

    let results = legalize_design(&mut design, params.mode, &sink);

    let mut blocks = Vec::new();
    let mut failures = 0;
    for (block_id, result) in &results {
        let block = design.block(*block_id);
        let (skipped, error) = match result {
            Ok(report) => (report.skipped_overfull, None),
            Err(e) => {
                failures += 1;
                (false, Some(e.to_string()))
            }
        };
        blocks.push(BlockSummary {
            name: block.name.clone(),
            cells: cell_count(&design, *block_id),
            utilization: utilization(&design, *block_id),
            skipped_overfull: skipped,
            error,
        });
    }

    Ok(RunOutcome {
        moved,
        bond_nets: interconnect.bond_nets,
        hpwl: design_hpwl(&design),
        blocks,
        diagnostics: sink
            .take_all()
            .into_iter()
            .map(|d| d.to_string())
            .collect(),
        failures,
    })
}

fn cell_count(design: &Design, block: strata_db::BlockId) -> usize {
    design
        .block(block)
        .instances()
        .filter(|(_, inst)| inst.master().is_some())
        .count()
}

/// Loads `strata.toml`, honoring an explicit `--config` path.
fn load_flow_config(global: &GlobalArgs) -> Result<FlowConfig, ConfigError> {
    match &global.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            load_config_from_str(&content)
        }
        None => load_config(Path::new(".")),
    }
}

/// Checks the merged flow parameters against the same bounds the config
/// loader enforces; CLI flags must not bypass them.
fn validate_params(params: &FlowParams) -> Result<(), ConfigError> {
    if params.dies == 0 {
        return Err(ConfigError::ValidationError(
            "dies must be at least 1".to_string(),
        ));
    }
    if !(params.area_ratio > 0.0 && params.area_ratio <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "area ratio must be in (0, 1], got {}",
            params.area_ratio
        )));
    }
    Ok(())
}

/// Runs the `strata run` command. CLI flags win over `strata.toml`.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_flow_config(global)?;
    let mode = match args.legalizer {
        Some(choice) => choice.into(),
        // validate_config already restricted the string.
        None if config.flow.legalizer == "shift" => LegalizeMode::Shift,
        None => LegalizeMode::Abacus,
    };
    let params = FlowParams {
        dies: args.dies.unwrap_or(config.flow.dies),
        area_ratio: args.area_ratio.unwrap_or(config.flow.area_ratio),
        mode,
    };
    validate_params(&params)?;
    let outcome = execute_run(&args.bench, args.assignments.as_deref(), params)?;

    match args.format {
        ReportFormat::Text => render_run_text(&outcome, global.quiet),
        ReportFormat::Json => render_run_json(&outcome)?,
    }
    Ok(if outcome.failures > 0 { 1 } else { 0 })
}

fn render_run_text(outcome: &RunOutcome, quiet: bool) {
    for diag in &outcome.diagnostics {
        eprintln!("{diag}");
    }
    if !quiet {
        println!(
            "migrated {} instances, synthesized {} cross-die nets",
            outcome.moved, outcome.bond_nets
        );
        for block in &outcome.blocks {
            let status = if let Some(error) = &block.error {
                format!("failed: {error}")
            } else if block.skipped_overfull {
                "skipped (overfull)".to_string()
            } else {
                "legalized".to_string()
            };
            println!(
                "block {:<12} {:>8} cells  util {:>6.2}%  {}",
                block.name,
                block.cells,
                block.utilization * 100.0,
                status
            );
        }
        println!("total HPWL: {}", outcome.hpwl);
    }
}

fn render_run_json(outcome: &RunOutcome) -> Result<(), Box<dyn Error>> {
    let blocks: Vec<serde_json::Value> = outcome
        .blocks
        .iter()
        .map(|block| {
            serde_json::json!({
                "name": block.name,
                "cells": block.cells,
                "utilization": block.utilization,
                "skipped_overfull": block.skipped_overfull,
                "error": block.error,
            })
        })
        .collect();
    let value = serde_json::json!({
        "migrated": outcome.moved,
        "bond_nets": outcome.bond_nets,
        "hpwl": outcome.hpwl,
        "blocks": blocks,
        "diagnostics": outcome.diagnostics,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Runs the `strata report` command: parse and report, no mutation.
pub fn report(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let (design, info) = strata_bench::read_bench(&args.bench)?;
    let root = design.root;
    let summary = serde_json::json!({
        "instances": design.root_block().insts.len(),
        "nets": design.root_block().nets.len(),
        "rows": design.root_block().rows.len(),
        "dies": info.dies.len(),
        "die_area": [info.die_area.dx(), info.die_area.dy()],
        "utilization": utilization(&design, root),
        "hpwl": design_hpwl(&design),
    });
    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                println!("benchmark {}", args.bench.display());
                println!("  instances: {}", design.root_block().insts.len());
                println!("  nets:      {}", design.root_block().nets.len());
                println!("  rows:      {}", design.root_block().rows.len());
                println!(
                    "  die area:  {} x {}",
                    info.die_area.dx(),
                    info.die_area.dy()
                );
                println!("  HPWL:      {}", design_hpwl(&design));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(0)
}
