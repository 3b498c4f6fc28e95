//! Unit tests for workspace management functionality

use crate::common::TestFixture;
use mapdiff::workspace::{Workspace, SETTINGS_FILE};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_workspace_creation() {
    let fixture = TestFixture::new().unwrap();

    assert!(fixture.workspace.data_dir.exists());
    assert!(fixture.workspace.work_dir.exists());
    assert!(fixture.workspace.root.join(SETTINGS_FILE).exists());
}

#[test]
fn test_create_does_not_clobber_existing_settings() {
    let temp_dir = TempDir::new().unwrap();
    Workspace::create_new(temp_dir.path().to_path_buf()).unwrap();

    let settings_path = temp_dir.path().join(SETTINGS_FILE);
    let custom = r#"{
        "workdir": "cache",
        "reference_streets": "ref/streets.tsv",
        "reference_housenumbers": ["ref/numbers.tsv"]
    }"#;
    fs::write(&settings_path, custom).unwrap();

    Workspace::create_new(temp_dir.path().to_path_buf()).unwrap();
    let workspace = Workspace::open(temp_dir.path()).unwrap();
    assert_eq!(workspace.settings.workdir, "cache");
}

#[test]
fn test_settings_defaults_fill_missing_fields() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join(SETTINGS_FILE);
    fs::write(
        &settings_path,
        r#"{
            "reference_streets": "ref/streets.tsv",
            "reference_housenumbers": ["ref/a.tsv", "ref/b.tsv"]
        }"#,
    )
    .unwrap();

    let workspace = Workspace::open(temp_dir.path()).unwrap();
    assert_eq!(workspace.settings.workdir, "workdir");
    assert_eq!(workspace.settings.utc_offset, "+01:00");
    assert!(workspace.settings.overpass_url.contains("overpass"));
    assert_eq!(workspace.reference_housenumber_sources().len(), 2);
}

#[test]
fn test_artifact_paths_stay_inside_work_dir() {
    let fixture = TestFixture::new().unwrap();
    let workspace = &fixture.workspace;

    for path in [
        workspace.map_streets_path("x"),
        workspace.map_housenumbers_path("x"),
        workspace.ref_streets_path("x"),
        workspace.ref_housenumbers_path("x"),
        workspace.streets_percent_path("x"),
        workspace.housenumbers_percent_path("x"),
    ] {
        assert!(path.starts_with(&workspace.work_dir));
    }
}

#[test]
fn test_stats_on_fresh_workspace() {
    let fixture = TestFixture::new().unwrap();
    let stats = fixture.workspace.stats().unwrap();
    assert_eq!(stats.table_count, 0);
    assert_eq!(stats.percent_count, 0);
    assert_eq!(stats.total_size, 0);
}
