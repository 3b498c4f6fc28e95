//! Relation registry
//!
//! Loads every known relation's configuration once, plus the region and
//! subregion display names, and hands out `Relation` handles. Everything
//! after `load` is a pure read.

use crate::error::{MapdiffError, Result};
use crate::relation::{Relation, RelationConfig, RelationFiles};
use crate::workspace::Workspace;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;

/// Display metadata for one administrative region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionInfo {
    pub name: String,
    /// Subregion id to display name, in file order.
    #[serde(default)]
    pub subregions: IndexMap<String, String>,
}

/// The configured set of relations and their grouping metadata.
#[derive(Debug, Clone)]
pub struct Registry {
    workspace: Workspace,
    relations: IndexMap<String, RelationConfig>,
    regions: IndexMap<String, RegionInfo>,
}

impl Registry {
    /// Load `relations.json` and `regions.json` from the data directory.
    /// The region file is optional; missing display names degrade to ids.
    pub fn load(workspace: &Workspace) -> Result<Self> {
        let relations_path = workspace.relations_path();
        if !relations_path.exists() {
            return Err(MapdiffError::config(format!(
                "no relation configuration at {}",
                relations_path.display()
            )));
        }
        let content = fs::read_to_string(&relations_path)?;
        let mut relations: IndexMap<String, RelationConfig> = serde_json::from_str(&content)?;
        relations.sort_keys();

        let regions_path = workspace.regions_path();
        let regions = if regions_path.exists() {
            let content = fs::read_to_string(&regions_path)?;
            serde_json::from_str(&content)?
        } else {
            IndexMap::new()
        };

        log::debug!("registry: loaded {} relations", relations.len());
        Ok(Self {
            workspace: workspace.clone(),
            relations,
            regions,
        })
    }

    /// Hand out the aggregate for one configured relation.
    pub fn get_relation(&self, name: &str) -> Result<Relation> {
        let config = self
            .relations
            .get(name)
            .ok_or_else(|| MapdiffError::unknown_relation(name))?;
        let files = RelationFiles::new(&self.workspace, name);
        Ok(Relation::new(name, config.clone(), files))
    }

    /// All configured relation names, alphabetical.
    pub fn names(&self) -> Vec<String> {
        self.relations.keys().cloned().collect()
    }

    /// Region ids referenced by at least one relation, sorted.
    pub fn regions(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .relations
            .values()
            .map(|config| config.region.clone())
            .collect();
        set.into_iter().collect()
    }

    /// Display name for a region id, when configured.
    pub fn region_name(&self, region: &str) -> Option<&str> {
        self.regions.get(region).map(|info| info.name.as_str())
    }

    /// Subregion ids of a region, in configuration order.
    pub fn subregion_ids(&self, region: &str) -> Vec<String> {
        self.regions
            .get(region)
            .map(|info| info.subregions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Display name for a subregion id, when configured.
    pub fn subregion_name(&self, region: &str, subregion: &str) -> Option<&str> {
        self.regions
            .get(region)
            .and_then(|info| info.subregions.get(subregion))
            .map(String::as_str)
    }
}
