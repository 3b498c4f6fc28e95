//! Workspace management: settings and on-disk layout
//!
//! A workspace root carries `mapdiff.json` (installation settings), a data
//! directory with the relation and region configuration, and a work
//! directory holding the cached per-relation artifacts. Exact file names
//! live here and nowhere else; the table and percent formats are the
//! contract, the paths are deployment detail.

use crate::error::{MapdiffError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file in the workspace root.
pub const SETTINGS_FILE: &str = "mapdiff.json";

/// Installation-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory for cached artifacts, relative to the root.
    #[serde(default = "default_workdir")]
    pub workdir: String,
    /// Directory for relation/region configuration, relative to the root.
    #[serde(default = "default_datadir")]
    pub datadir: String,
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,
    /// Country-wide reference street list.
    pub reference_streets: String,
    /// Country-wide reference house-number lists, concatenated on use.
    pub reference_housenumbers: Vec<String>,
    /// Locale identifier recorded for the deployment; report sorting is
    /// locale-aware but locale-independent in implementation.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// RFC 3339 UTC offset for timestamp display, e.g. "+01:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

fn default_workdir() -> String {
    "workdir".to_string()
}

fn default_datadir() -> String {
    "data".to_string()
}

fn default_overpass_url() -> String {
    crate::overpass::DEFAULT_API_URL.to_string()
}

fn default_locale() -> String {
    "hu_HU.UTF-8".to_string()
}

fn default_utc_offset() -> String {
    "+01:00".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            datadir: default_datadir(),
            overpass_url: default_overpass_url(),
            reference_streets: "reference/streets.tsv".to_string(),
            reference_housenumbers: vec!["reference/housenumbers.tsv".to_string()],
            locale: default_locale(),
            utc_offset: default_utc_offset(),
        }
    }
}

impl Settings {
    /// Timestamp display offset; configuration error when unparsable.
    pub fn timezone(&self) -> Result<FixedOffset> {
        self.utc_offset
            .parse()
            .map_err(|_| MapdiffError::config(format!("invalid utc_offset: {}", self.utc_offset)))
    }
}

/// Manages the workspace directory layout.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory where mapdiff.json lives.
    pub root: PathBuf,
    /// Relation/region configuration directory.
    pub data_dir: PathBuf,
    /// Cached artifact directory.
    pub work_dir: PathBuf,
    pub settings: Settings,
}

impl Workspace {
    /// Open an existing workspace.
    pub fn open(root: &Path) -> Result<Self> {
        let settings_path = root.join(SETTINGS_FILE);
        if !settings_path.exists() {
            return Err(MapdiffError::config(format!(
                "no {} in {} (run `mapdiff init` first)",
                SETTINGS_FILE,
                root.display()
            )));
        }
        let content = fs::read_to_string(&settings_path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(Self::from_parts(root.to_path_buf(), settings))
    }

    /// Scaffold a new workspace with default settings.
    pub fn create_new(root: PathBuf) -> Result<Self> {
        let workspace = Self::from_parts(root, Settings::default());

        fs::create_dir_all(&workspace.data_dir)?;
        fs::create_dir_all(&workspace.work_dir)?;

        let settings_path = workspace.root.join(SETTINGS_FILE);
        if !settings_path.exists() {
            fs::write(
                &settings_path,
                serde_json::to_string_pretty(&workspace.settings)?,
            )?;
        }

        log::info!("Created mapdiff workspace at: {}", workspace.root.display());
        Ok(workspace)
    }

    fn from_parts(root: PathBuf, settings: Settings) -> Self {
        let data_dir = root.join(&settings.datadir);
        let work_dir = root.join(&settings.workdir);
        Self {
            root,
            data_dir,
            work_dir,
            settings,
        }
    }

    /// Relation configuration file.
    pub fn relations_path(&self) -> PathBuf {
        self.data_dir.join("relations.json")
    }

    /// Region/subregion display-name file.
    pub fn regions_path(&self) -> PathBuf {
        self.data_dir.join("regions.json")
    }

    /// Cached map street names for one relation.
    pub fn map_streets_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("streets-{}.tsv", name))
    }

    /// Cached map house numbers for one relation.
    pub fn map_housenumbers_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("housenumbers-{}.tsv", name))
    }

    /// Cached reference street names for one relation.
    pub fn ref_streets_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("ref-streets-{}.tsv", name))
    }

    /// Cached reference house numbers for one relation.
    pub fn ref_housenumbers_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("ref-housenumbers-{}.tsv", name))
    }

    /// Persisted street-coverage scalar for one relation.
    pub fn streets_percent_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("streets-{}.percent", name))
    }

    /// Persisted house-number-coverage scalar for one relation.
    pub fn housenumbers_percent_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("housenumbers-{}.percent", name))
    }

    /// Country-wide reference street source, resolved against the root.
    pub fn reference_streets_source(&self) -> PathBuf {
        self.root.join(&self.settings.reference_streets)
    }

    /// Country-wide reference house-number sources, resolved against the root.
    pub fn reference_housenumber_sources(&self) -> Vec<PathBuf> {
        self.settings
            .reference_housenumbers
            .iter()
            .map(|p| self.root.join(p))
            .collect()
    }

    /// Get workspace statistics.
    pub fn stats(&self) -> Result<WorkspaceStats> {
        let mut stats = WorkspaceStats::default();

        if !self.work_dir.exists() {
            return Ok(stats);
        }

        for entry in fs::read_dir(&self.work_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let size = entry.metadata()?.len();
            stats.total_size += size;
            if name.ends_with(".percent") {
                stats.percent_count += 1;
            } else if name.ends_with(".tsv") {
                stats.table_count += 1;
            }
        }

        Ok(stats)
    }
}

/// Statistics about the cached artifacts.
#[derive(Debug, Default, Serialize)]
pub struct WorkspaceStats {
    pub table_count: usize,
    pub percent_count: usize,
    pub total_size: u64,
}

/// Last-modified time of an artifact, formatted in the display offset.
/// `None` when the artifact does not exist yet.
pub fn last_modified(path: &Path, offset: FixedOffset) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let timestamp: DateTime<Utc> = modified.into();
    Some(
        timestamp
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    )
}
