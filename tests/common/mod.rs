//! Common test utilities and helpers

use mapdiff::{Registry, Result, Workspace};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture manager for creating temporary workspaces
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub workspace: Workspace,
}

impl TestFixture {
    /// Create a new test fixture with a scaffolded workspace
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let workspace = Workspace::create_new(temp_dir.path().to_path_buf())?;

        Ok(Self {
            temp_dir,
            workspace,
        })
    }

    /// Create a fixture with one default relation already configured
    pub fn with_relation(name: &str) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.seed_relations(&format!(
            r#"{{"{}": {{"region": "01", "subregion": "011", "area_id": 42}}}}"#,
            name
        ))?;
        Ok(fixture)
    }

    /// Write the relation configuration file
    pub fn seed_relations(&self, json: &str) -> Result<()> {
        fs::write(self.workspace.relations_path(), json)?;
        Ok(())
    }

    /// Write the region display-name file
    pub fn seed_regions(&self, json: &str) -> Result<()> {
        fs::write(self.workspace.regions_path(), json)?;
        Ok(())
    }

    /// Load a registry over the seeded configuration
    pub fn registry(&self) -> Result<Registry> {
        Registry::load(&self.workspace)
    }

    /// Seed a cached map-streets table
    pub fn write_map_streets(&self, relation: &str, names: &[&str]) -> Result<()> {
        self.write_rows(self.workspace.map_streets_path(relation), names)
    }

    /// Seed a cached reference-streets table
    pub fn write_ref_streets(&self, relation: &str, names: &[&str]) -> Result<()> {
        self.write_rows(self.workspace.ref_streets_path(relation), names)
    }

    /// Seed a cached map house-number table
    pub fn write_map_housenumbers(&self, relation: &str, rows: &[(&str, &str)]) -> Result<()> {
        self.write_pairs(self.workspace.map_housenumbers_path(relation), rows)
    }

    /// Seed a cached reference house-number table
    pub fn write_ref_housenumbers(&self, relation: &str, rows: &[(&str, &str)]) -> Result<()> {
        self.write_pairs(self.workspace.ref_housenumbers_path(relation), rows)
    }

    /// Write a country-wide reference source file under the root
    pub fn write_source(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.workspace.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    fn write_rows(&self, path: PathBuf, names: &[&str]) -> Result<()> {
        let mut content = String::new();
        for name in names {
            content.push_str(name);
            content.push('\n');
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn write_pairs(&self, path: PathBuf, rows: &[(&str, &str)]) -> Result<()> {
        let mut content = String::new();
        for (street, number) in rows {
            content.push_str(street);
            content.push('\t');
            content.push_str(number);
            content.push('\n');
        }
        fs::write(path, content)?;
        Ok(())
    }
}
