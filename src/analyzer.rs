//! The batch pipeline: scan, parse, catalog interfaces, then resolve
//! controllers against the frozen catalog.

use anyhow::Result;
use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogBuilder;
use crate::config::AnalyzerConfig;
use crate::inventory::{Inventory, InventoryBuilder};
use crate::model::SourceUnit;
use crate::resolve::resolve_unit;
use crate::scan::scan_sources;
use crate::syntax::parse_file;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub interfaces: usize,
    pub ambiguous_interfaces: usize,
    pub controllers: usize,
    pub endpoints: usize,
    pub controller_collisions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub inventory: Inventory,
    pub stats: AnalysisStats,
}

pub fn analyze_project(root: &Path, config: &AnalyzerConfig) -> Result<Analysis> {
    let files = scan_sources(root, &config.extensions)?;
    info!("found {} source files under {}", files.len(), root.display());

    let units = parse_units(&files, config.lenient);
    let mut analysis = analyze_units(&units);
    analysis.stats.files_discovered = files.len();
    analysis.stats.files_failed = files.len() - units.len();
    Ok(analysis)
}

/// Parses `files` in parallel. Failures are logged and dropped; the
/// surviving units keep the order of `files`.
pub fn parse_units(files: &[PathBuf], lenient: bool) -> Vec<SourceUnit> {
    files
        .par_iter()
        .filter_map(|path| match parse_file(path, lenient) {
            Ok(unit) => Some(unit),
            Err(err) => {
                error!("Error parsing file: {} - {err}", path.display());
                None
            }
        })
        .collect()
}

/// Runs both passes over already parsed units. Units are resolved in slice
/// order, so a controller declared twice keeps its last declaration.
pub fn analyze_units(units: &[SourceUnit]) -> Analysis {
    let mut catalog = CatalogBuilder::new();
    for unit in units {
        catalog.register_unit(unit);
    }
    let catalog = catalog.build();

    for (simple, qualified) in catalog.ambiguous_names() {
        warn!(
            "interface name {simple} is declared as {}; unqualified references may resolve to the wrong one",
            qualified.join(", ")
        );
    }

    let mut builder = InventoryBuilder::new();
    for unit in units {
        for controller in resolve_unit(unit, &catalog) {
            builder.insert(controller);
        }
    }
    let controller_collisions = builder.collisions();
    let inventory = builder.finish();

    // counted on the flattened inventory, after both kinds of collision
    let stats = AnalysisStats {
        files_parsed: units.len(),
        interfaces: catalog.interface_count(),
        ambiguous_interfaces: catalog.ambiguous_names().len(),
        controllers: inventory.len(),
        endpoints: inventory.endpoint_count(),
        controller_collisions,
        ..AnalysisStats::default()
    };
    info!(
        "catalogued {} interfaces, found {} controllers with {} endpoints",
        stats.interfaces, stats.controllers, stats.endpoints
    );

    Analysis { inventory, stats }
}
