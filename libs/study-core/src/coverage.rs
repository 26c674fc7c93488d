//! Mind map coverage of the module catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Catalog, Module};

/// Modules that no mind map points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total_modules: usize,
    pub total_mindmaps: usize,
    pub missing: Vec<Module>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// List modules without a mind map, in planning order.
pub fn mindmap_coverage(catalog: &Catalog) -> CoverageReport {
    let covered: HashSet<i64> = catalog
        .mindmaps()
        .iter()
        .filter_map(|m| m.module_id)
        .collect();

    CoverageReport {
        total_modules: catalog.modules().len(),
        total_mindmaps: catalog.mindmaps().len(),
        missing: catalog
            .modules()
            .iter()
            .filter(|m| !covered.contains(&m.id))
            .cloned()
            .collect(),
    }
}
