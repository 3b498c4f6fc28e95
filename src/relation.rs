//! Relation aggregate: configuration, cached artifacts, operations
//!
//! A relation is one named area. It owns the four cached tables (map and
//! reference, streets and house numbers) and the two percentage scalars,
//! and computes diffs on demand. Cached artifacts only ever go from absent
//! to present, via the `update_*` operations; nothing here deletes them.

use crate::error::{MapdiffError, Result};
use crate::overpass::OverpassClient;
use crate::percent::{self, Percent};
use crate::query;
use crate::reconcile::{self, HousenumberTotals, MissingSet, StreetNumbers};
use crate::tabular::{self, Table};
use crate::workspace::Workspace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Whether street coverage is tracked for a relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetPolicy {
    /// House numbers only.
    No,
    /// Both streets and house numbers.
    #[default]
    Yes,
    /// Streets only; house numbers are not checked at all.
    Only,
}

impl StreetPolicy {
    pub fn checks_streets(self) -> bool {
        self != Self::No
    }

    pub fn checks_housenumbers(self) -> bool {
        self != Self::Only
    }
}

/// How one street's missing numbers are grouped for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Two parity buckets with range compression.
    #[default]
    EvenOdd,
    /// One flat list, no compression.
    All,
}

/// Per-street override flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetFilter {
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// Per-relation settings, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    /// Administrative region id in the reference dataset.
    pub region: String,
    /// Subregion id within the region.
    pub subregion: String,
    /// Relation id in the map database; basis of the Overpass area id.
    pub area_id: u64,
    #[serde(default)]
    pub streets: StreetPolicy,
    #[serde(default)]
    pub filters: IndexMap<String, StreetFilter>,
}

impl RelationConfig {
    /// Streets follow the even/odd convention unless overridden.
    pub fn street_is_even_odd(&self, street: &str) -> bool {
        self.filters
            .get(street)
            .map_or(true, |f| f.interpolation == Interpolation::EvenOdd)
    }
}

/// Paths and streams of one relation's cached artifacts.
#[derive(Debug, Clone)]
pub struct RelationFiles {
    map_streets: PathBuf,
    map_housenumbers: PathBuf,
    ref_streets: PathBuf,
    ref_housenumbers: PathBuf,
    streets_percent: PathBuf,
    housenumbers_percent: PathBuf,
}

impl RelationFiles {
    pub fn new(workspace: &Workspace, name: &str) -> Self {
        Self {
            map_streets: workspace.map_streets_path(name),
            map_housenumbers: workspace.map_housenumbers_path(name),
            ref_streets: workspace.ref_streets_path(name),
            ref_housenumbers: workspace.ref_housenumbers_path(name),
            streets_percent: workspace.streets_percent_path(name),
            housenumbers_percent: workspace.housenumbers_percent_path(name),
        }
    }

    /// Read a cached table; absent file is the distinct "run an update
    /// first" condition, never an empty-result success.
    fn read_required(path: &Path) -> Result<Table> {
        if !path.exists() {
            return Err(MapdiffError::artifact_absent(path));
        }
        tabular::read_table(path)
    }

    pub fn read_map_streets(&self) -> Result<Table> {
        Self::read_required(&self.map_streets)
    }

    pub fn read_map_housenumbers(&self) -> Result<Table> {
        Self::read_required(&self.map_housenumbers)
    }

    pub fn read_ref_streets(&self) -> Result<Table> {
        Self::read_required(&self.ref_streets)
    }

    pub fn read_ref_housenumbers(&self) -> Result<Table> {
        Self::read_required(&self.ref_housenumbers)
    }

    pub fn write_map_streets(&self, table: &Table) -> Result<()> {
        tabular::write_table(&self.map_streets, table)
    }

    pub fn write_map_housenumbers(&self, table: &Table) -> Result<()> {
        tabular::write_table(&self.map_housenumbers, table)
    }

    pub fn write_ref_streets(&self, table: &Table) -> Result<()> {
        tabular::write_table(&self.ref_streets, table)
    }

    pub fn write_ref_housenumbers(&self, table: &Table) -> Result<()> {
        tabular::write_table(&self.ref_housenumbers, table)
    }

    pub fn map_streets_path(&self) -> &Path {
        &self.map_streets
    }

    pub fn map_housenumbers_path(&self) -> &Path {
        &self.map_housenumbers
    }

    pub fn ref_streets_path(&self) -> &Path {
        &self.ref_streets
    }

    pub fn ref_housenumbers_path(&self) -> &Path {
        &self.ref_housenumbers
    }

    pub fn streets_percent_path(&self) -> &Path {
        &self.streets_percent
    }

    pub fn housenumbers_percent_path(&self) -> &Path {
        &self.housenumbers_percent
    }
}

/// One named area and its operations.
#[derive(Debug, Clone)]
pub struct Relation {
    name: String,
    config: RelationConfig,
    files: RelationFiles,
}

impl Relation {
    pub fn new(name: impl Into<String>, config: RelationConfig, files: RelationFiles) -> Self {
        Self {
            name: name.into(),
            config,
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RelationConfig {
        &self.config
    }

    pub fn files(&self) -> &RelationFiles {
        &self.files
    }

    /// Query text sent to Overpass for this relation's streets.
    pub fn streets_query(&self) -> String {
        query::streets_query(self.config.area_id)
    }

    /// Query text sent to Overpass for this relation's house numbers.
    pub fn housenumbers_query(&self) -> String {
        query::housenumbers_query(self.config.area_id)
    }

    /// Street names present in the reference but not in the map data,
    /// plus the intersection. Pure read, persists nothing.
    pub fn get_missing_streets(&self) -> Result<MissingSet> {
        let reference = self.files.read_ref_streets()?;
        let map = self.files.read_map_streets()?;
        Ok(reconcile::missing_streets(&reference, &map))
    }

    /// Reference house numbers grouped per street minus the map data, with
    /// aggregate counts. Pure read, persists nothing.
    pub fn get_missing_housenumbers(&self) -> Result<(Vec<StreetNumbers>, HousenumberTotals)> {
        let reference = self.files.read_ref_housenumbers()?;
        let map = self.files.read_map_housenumbers()?;
        Ok(reconcile::missing_housenumbers(&reference, &map))
    }

    /// Like `get_missing_streets`, but also persists the coverage scalar.
    pub fn write_missing_streets(&self) -> Result<(MissingSet, Percent)> {
        let result = self.get_missing_streets()?;
        let ratio = Percent::compute(result.done.len(), result.todo.len());
        percent::write_percent(&self.files.streets_percent, ratio)?;
        log::info!("{}: streets {}% done", self.name, ratio);
        Ok((result, ratio))
    }

    /// Like `get_missing_housenumbers`, but also persists the coverage
    /// scalar.
    pub fn write_missing_housenumbers(
        &self,
    ) -> Result<(Vec<StreetNumbers>, HousenumberTotals, Percent)> {
        let (results, totals) = self.get_missing_housenumbers()?;
        let ratio = Percent::compute(totals.done_count, totals.todo_count);
        percent::write_percent(&self.files.housenumbers_percent, ratio)?;
        log::info!("{}: house numbers {}% done", self.name, ratio);
        Ok((results, totals, ratio))
    }

    /// Fetch fresh street data from Overpass and replace the cached table.
    /// Query errors propagate untouched; the cache is only written on
    /// success. Returns the row count.
    pub fn update_map_streets(&self, client: &mut OverpassClient) -> Result<usize> {
        let table = client.query(&self.streets_query())?;
        self.files.write_map_streets(&table)?;
        log::info!("{}: cached {} map streets", self.name, table.len());
        Ok(table.len())
    }

    /// Fetch fresh house-number data from Overpass and replace the cached
    /// table. Returns the row count.
    pub fn update_map_housenumbers(&self, client: &mut OverpassClient) -> Result<usize> {
        let table = client.query(&self.housenumbers_query())?;
        self.files.write_map_housenumbers(&table)?;
        log::info!("{}: cached {} map house numbers", self.name, table.len());
        Ok(table.len())
    }

    /// Extract this relation's rows from the country-wide street reference
    /// (region, subregion, street) and replace the cached table. Returns
    /// the row count.
    pub fn update_ref_streets(&self, source: &Path) -> Result<usize> {
        let table = self.extract_reference(&read_source(source)?, 3, source)?;
        self.files.write_ref_streets(&table)?;
        log::info!("{}: cached {} reference streets", self.name, table.len());
        Ok(table.len())
    }

    /// Extract this relation's rows from the country-wide house-number
    /// references (region, subregion, street, number), concatenated before
    /// parsing. Returns the row count.
    pub fn update_ref_housenumbers(&self, sources: &[PathBuf]) -> Result<usize> {
        let mut content = String::new();
        for source in sources {
            content.push_str(&read_source(source)?);
            if !content.ends_with('\n') {
                content.push('\n');
            }
        }
        let merged = Table::parse(&content);
        let first = sources.first().map(PathBuf::as_path).unwrap_or(Path::new(""));
        let table = self.extract_reference(&merged, 4, first)?;
        self.files.write_ref_housenumbers(&table)?;
        log::info!("{}: cached {} reference house numbers", self.name, table.len());
        Ok(table.len())
    }

    /// Filter reference rows down to this relation's region/subregion and
    /// drop the two id columns. The column shape is validated up front so
    /// a malformed source never mutates the cached artifact.
    fn extract_reference(&self, source: &Table, width: usize, origin: &Path) -> Result<Table> {
        for (index, row) in source.rows().iter().enumerate() {
            if row.len() != width {
                return Err(MapdiffError::malformed_reference(format!(
                    "{}: row {} has {} columns, expected {}",
                    origin.display(),
                    index + 1,
                    row.len(),
                    width
                )));
            }
        }

        let rows = source
            .rows()
            .iter()
            .filter(|row| row[0] == self.config.region && row[1] == self.config.subregion)
            .map(|row| row[2..].to_vec())
            .collect();
        Ok(Table::new(rows))
    }

    /// Render one street's missing numbers per its grouping convention.
    pub fn format_housenumber_groups(&self, street: &str, numbers: &[reconcile::HouseNumber]) -> Vec<String> {
        if self.config.street_is_even_odd(street) {
            reconcile::format_even_odd(numbers)
        } else {
            reconcile::format_flat(numbers)
        }
    }
}

fn read_source(source: &Path) -> Result<String> {
    if !source.exists() {
        return Err(MapdiffError::invalid_input(format!(
            "reference source not found: {}",
            source.display()
        )));
    }
    Ok(fs::read_to_string(source)?)
}
