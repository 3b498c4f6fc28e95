//! Command implementations for the mapdiff CLI

use crate::cli::{Commands, OutputFormat, ViewKind};
use crate::error::{MapdiffError, Result};
use crate::filter::RelationFilter;
use crate::output::{self, JsonFormatter, PrettyPrinter, RelationOverview};
use crate::overpass::OverpassClient;
use crate::percent::{self, Percent};
use crate::progress::ProgressReporter;
use crate::registry::Registry;
use crate::relation::Relation;
use crate::tabular::Table;
use crate::workspace::{self, Workspace};
use rayon::prelude::*;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands, workspace_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Init => init_command(workspace_path),
        Commands::List { filter, format } => {
            list_command(workspace_path, filter.as_deref(), &format)
        }
        Commands::Update {
            relation,
            streets,
            housenumbers,
        } => update_command(workspace_path, relation.as_deref(), streets, housenumbers),
        Commands::UpdateRef {
            relation,
            streets,
            housenumbers,
        } => update_ref_command(workspace_path, relation.as_deref(), streets, housenumbers),
        Commands::MissingStreets { relation, format } => {
            missing_streets_command(workspace_path, &relation, &format)
        }
        Commands::MissingHousenumbers { relation, format } => {
            missing_housenumbers_command(workspace_path, &relation, &format)
        }
        Commands::View {
            relation,
            artifact,
            format,
        } => view_command(workspace_path, &relation, &artifact, &format),
        Commands::Stats { format } => stats_command(workspace_path, &format),
    }
}

fn open_workspace(workspace_path: Option<&Path>) -> Result<Workspace> {
    match workspace_path {
        Some(path) => Workspace::open(path),
        None => Workspace::open(&std::env::current_dir()?),
    }
}

/// Initialize a mapdiff workspace
fn init_command(workspace_path: Option<&Path>) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = workspace_path.unwrap_or(&current_dir);
    let workspace = Workspace::create_new(root.to_path_buf())?;
    println!("✅ Initialized mapdiff workspace at: {}", workspace.root.display());
    println!("   Add relations to {}", workspace.relations_path().display());
    Ok(())
}

/// List relations with their coverage
fn list_command(workspace_path: Option<&Path>, filter: Option<&str>, format: &str) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let filter = RelationFilter::parse(
        &filter
            .map(|f| f.split('/').collect::<Vec<_>>())
            .unwrap_or_default(),
    );
    let timezone = workspace.settings.timezone()?;

    let mut rows = Vec::new();
    for name in registry.names() {
        let relation = registry.get_relation(&name)?;
        let policy = relation.config().streets;

        let mut coverage = Vec::new();
        let housenumber_coverage = if policy.checks_housenumbers() {
            let ratio = read_coverage(relation.files().housenumbers_percent_path());
            coverage.push(ratio);
            ratio.to_string()
        } else {
            percent::PERCENT_NOT_AVAILABLE.to_string()
        };
        let street_coverage = if policy.checks_streets() {
            let ratio = read_coverage(relation.files().streets_percent_path());
            coverage.push(ratio);
            ratio.to_string()
        } else {
            percent::PERCENT_NOT_AVAILABLE.to_string()
        };

        if !filter.matches(relation.config(), &coverage) {
            continue;
        }

        rows.push(RelationOverview {
            name,
            housenumber_coverage,
            street_coverage,
            last_updated: workspace::last_modified(relation.files().map_streets_path(), timezone),
        });
    }

    match OutputFormat::parse(format).map_err(MapdiffError::invalid_input)? {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&rows)?),
        _ => PrettyPrinter::print_relation_list(&rows),
    }
    Ok(())
}

/// Previously persisted coverage, "N/A" while no write ran yet.
fn read_coverage(path: &Path) -> Percent {
    percent::read_percent(path).unwrap_or(Percent::NotAvailable)
}

/// Which update categories a pair of CLI flags selects; neither flag
/// means both.
fn resolve_categories(streets: bool, housenumbers: bool) -> (bool, bool) {
    if !streets && !housenumbers {
        (true, true)
    } else {
        (streets, housenumbers)
    }
}

/// Fetch fresh map data from Overpass
fn update_command(
    workspace_path: Option<&Path>,
    relation_name: Option<&str>,
    streets: bool,
    housenumbers: bool,
) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let (do_streets, do_housenumbers) = resolve_categories(streets, housenumbers);

    if let Some(name) = relation_name {
        let relation = registry.get_relation(name)?;
        let mut client = OverpassClient::new(&workspace.settings.overpass_url);
        let mut progress = ProgressReporter::new_for_single("Querying Overpass...");
        let result = update_map_data(&relation, &mut client, do_streets, do_housenumbers);
        progress.finish("Query finished");
        if let Err(error) = result {
            advise_sleep(client.need_sleep_seconds());
            return Err(error);
        }
        println!("✅ Updated map data for: {}", name);
        return Ok(());
    }

    let names = registry.names();
    let mut progress = ProgressReporter::new_for_batch(names.len() as u64, "Updating map data");
    let failures: Vec<(String, MapdiffError, u64)> = names
        .par_iter()
        .filter_map(|name| {
            let mut client = OverpassClient::new(&workspace.settings.overpass_url);
            let result = registry
                .get_relation(name)
                .and_then(|relation| {
                    update_map_data(&relation, &mut client, do_streets, do_housenumbers)
                });
            progress.tick(name);
            result
                .err()
                .map(|error| (name.clone(), error, client.need_sleep_seconds()))
        })
        .collect();
    progress.finish("Map data updated");

    report_batch(&names, &failures)
}

/// One relation's map refresh; house numbers are skipped when the policy
/// does not track them.
fn update_map_data(
    relation: &Relation,
    client: &mut OverpassClient,
    streets: bool,
    housenumbers: bool,
) -> Result<()> {
    if streets {
        relation.update_map_streets(client)?;
    }
    if housenumbers && relation.config().streets.checks_housenumbers() {
        relation.update_map_housenumbers(client)?;
    }
    Ok(())
}

/// Rebuild cached reference tables from the configured sources
fn update_ref_command(
    workspace_path: Option<&Path>,
    relation_name: Option<&str>,
    streets: bool,
    housenumbers: bool,
) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let (do_streets, do_housenumbers) = resolve_categories(streets, housenumbers);

    if let Some(name) = relation_name {
        let relation = registry.get_relation(name)?;
        update_ref_data(&workspace, &relation, do_streets, do_housenumbers)?;
        println!("✅ Updated reference data for: {}", name);
        return Ok(());
    }

    let names = registry.names();
    let mut progress =
        ProgressReporter::new_for_batch(names.len() as u64, "Updating reference data");
    let failures: Vec<(String, MapdiffError, u64)> = names
        .par_iter()
        .filter_map(|name| {
            let result = registry
                .get_relation(name)
                .and_then(|relation| {
                    update_ref_data(&workspace, &relation, do_streets, do_housenumbers)
                });
            progress.tick(name);
            result.err().map(|error| (name.clone(), error, 0))
        })
        .collect();
    progress.finish("Reference data updated");

    report_batch(&names, &failures)
}

/// One relation's reference refresh, following its street policy.
fn update_ref_data(
    workspace: &Workspace,
    relation: &Relation,
    streets: bool,
    housenumbers: bool,
) -> Result<()> {
    if streets && relation.config().streets.checks_streets() {
        relation.update_ref_streets(&workspace.reference_streets_source())?;
    }
    if housenumbers && relation.config().streets.checks_housenumbers() {
        relation.update_ref_housenumbers(&workspace.reference_housenumber_sources())?;
    }
    Ok(())
}

/// Per-relation failures do not abort a batch; they are collected and
/// reported at the end.
fn report_batch(names: &[String], failures: &[(String, MapdiffError, u64)]) -> Result<()> {
    for (name, error, need_sleep) in failures {
        eprintln!("❌ {}: {}", name, error);
        advise_sleep(*need_sleep);
    }
    if failures.is_empty() {
        println!("✅ Updated {} relations", names.len());
        Ok(())
    } else {
        Err(MapdiffError::invalid_input(format!(
            "{} of {} relations failed to update",
            failures.len(),
            names.len()
        )))
    }
}

/// Surface the upstream rate-limit signal as a user-facing wait message;
/// never an automatic retry.
fn advise_sleep(need_sleep: u64) {
    if need_sleep > 0 {
        eprintln!("⏳ Note: wait {} seconds before retrying", need_sleep);
    }
}

/// Point the operator at the update commands for a missing artifact.
fn print_artifact_hint(name: &str, error: &MapdiffError) {
    println!("💡 {}", error);
    println!(
        "   Run `mapdiff update {0}` and `mapdiff update-ref {0}` first.",
        name
    );
}

/// Report streets present in the reference but missing from the map
fn missing_streets_command(workspace_path: Option<&Path>, name: &str, format: &str) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let relation = registry.get_relation(name)?;
    if !relation.config().streets.checks_streets() {
        return Err(MapdiffError::invalid_input(format!(
            "relation {} does not track streets",
            name
        )));
    }

    let format = OutputFormat::parse(format).map_err(MapdiffError::invalid_input)?;
    match relation.write_missing_streets() {
        Ok((result, ratio)) => {
            match format {
                OutputFormat::Pretty => PrettyPrinter::print_missing_streets(name, &result, ratio),
                OutputFormat::Text => println!("{}", output::missing_streets_text(&result)),
                OutputFormat::Html => println!("{}", output::missing_streets_html(&result)),
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "relation": name,
                        "todo": result.todo,
                        "done": result.done,
                        "percent": ratio.to_string(),
                    });
                    println!("{}", JsonFormatter::format(&json)?);
                }
            }
            Ok(())
        }
        Err(error) if error.is_artifact_absent() => {
            print_artifact_hint(name, &error);
            Ok(())
        }
        Err(error) => Err(error),
    }
}

/// Report house numbers present in the reference but missing from the map
fn missing_housenumbers_command(
    workspace_path: Option<&Path>,
    name: &str,
    format: &str,
) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let relation = registry.get_relation(name)?;
    if !relation.config().streets.checks_housenumbers() {
        return Err(MapdiffError::invalid_input(format!(
            "relation {} does not track house numbers",
            name
        )));
    }

    let format = OutputFormat::parse(format).map_err(MapdiffError::invalid_input)?;
    match relation.write_missing_housenumbers() {
        Ok((results, totals, ratio)) => {
            match format {
                OutputFormat::Pretty => {
                    PrettyPrinter::print_missing_housenumbers(&relation, &results, &totals, ratio)
                }
                OutputFormat::Text => {
                    println!("{}", output::missing_housenumbers_text(&relation, &results))
                }
                OutputFormat::Html => {
                    println!("{}", output::missing_housenumbers_html(&relation, &results))
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "relation": name,
                        "streets": results,
                        "totals": totals,
                        "percent": ratio.to_string(),
                    });
                    println!("{}", JsonFormatter::format(&json)?);
                }
            }
            Ok(())
        }
        Err(error) if error.is_artifact_absent() => {
            print_artifact_hint(name, &error);
            Ok(())
        }
        Err(error) => Err(error),
    }
}

/// Show a cached table or the query that refreshes it
fn view_command(
    workspace_path: Option<&Path>,
    name: &str,
    artifact: &str,
    format: &str,
) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let registry = Registry::load(&workspace)?;
    let relation = registry.get_relation(name)?;

    let kind = ViewKind::parse(artifact).map_err(MapdiffError::invalid_input)?;
    let (table, header): (Table, Vec<&str>) = match kind {
        ViewKind::StreetsQuery => {
            println!("{}", relation.streets_query());
            return Ok(());
        }
        ViewKind::HousenumbersQuery => {
            println!("{}", relation.housenumbers_query());
            return Ok(());
        }
        ViewKind::MapStreets => (
            relation.files().read_map_streets()?,
            vec!["Street name"],
        ),
        ViewKind::MapHousenumbers => (
            relation.files().read_map_housenumbers()?,
            vec!["Street name", "House number"],
        ),
        ViewKind::RefStreets => (
            relation.files().read_ref_streets()?,
            vec!["Street name"],
        ),
        ViewKind::RefHousenumbers => (
            relation.files().read_ref_housenumbers()?,
            vec!["Street name", "House number"],
        ),
    };

    match format {
        "html" => {
            let mut display = Table::new(vec![header.iter().map(|h| h.to_string()).collect()]);
            for row in table.rows() {
                display.push(row.clone());
            }
            println!("{}", output::html_table(&display));
        }
        _ => print!("{}", table.to_tsv()),
    }
    Ok(())
}

/// Show cached artifact statistics
fn stats_command(workspace_path: Option<&Path>, format: &str) -> Result<()> {
    let workspace = open_workspace(workspace_path)?;
    let stats = workspace.stats()?;

    match OutputFormat::parse(format).map_err(MapdiffError::invalid_input)? {
        OutputFormat::Json => println!("{}", JsonFormatter::format(&stats)?),
        _ => PrettyPrinter::print_workspace_stats(&stats),
    }
    Ok(())
}
