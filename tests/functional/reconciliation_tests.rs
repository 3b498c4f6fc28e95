//! Functional tests: full reconciliation flows over cached artifacts

use crate::common::TestFixture;
use mapdiff::output;
use mapdiff::percent::{read_percent, Percent};

#[test]
fn test_missing_streets_scenario() {
    // Reference {A, B, C}, map {A, B}: todo [C], done [A, B], 66.7%.
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture
        .write_ref_streets("x", &["A street", "B street", "C street"])
        .unwrap();
    fixture.write_map_streets("x", &["A street", "B street"]).unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let (result, ratio) = relation.write_missing_streets().unwrap();
    assert_eq!(result.todo, vec!["C street"]);
    assert_eq!(result.done, vec!["A street", "B street"]);
    assert_eq!(ratio.to_string(), "66.7");

    // The persisted scalar is the one-decimal rendering.
    let persisted = read_percent(relation.files().streets_percent_path()).unwrap();
    assert_eq!(persisted, Percent::Value(66.7));
}

#[test]
fn test_absent_artifact_is_not_an_empty_result() {
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture.write_ref_streets("x", &["A street"]).unwrap();
    // No map streets cached yet.

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let err = relation.get_missing_streets().unwrap_err();
    assert!(err.is_artifact_absent());

    // Nothing was persisted by the failed read.
    assert!(!relation.files().streets_percent_path().exists());
}

#[test]
fn test_empty_map_table_is_a_successful_zero() {
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture.write_ref_streets("x", &["A street"]).unwrap();
    fixture.write_map_streets("x", &[]).unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let result = relation.get_missing_streets().unwrap();
    assert_eq!(result.todo, vec!["A street"]);
    assert!(result.done.is_empty());
}

#[test]
fn test_missing_housenumbers_even_odd_scenario() {
    // Reference {2,3,4,6} for an even/odd street, map {3}: [2-6] only.
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture
        .write_ref_housenumbers(
            "x",
            &[("Main", "2"), ("Main", "3"), ("Main", "4"), ("Main", "6")],
        )
        .unwrap();
    fixture.write_map_housenumbers("x", &[("Main", "3")]).unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let (results, totals, ratio) = relation.write_missing_housenumbers().unwrap();
    assert_eq!(totals.todo_count, 3);
    assert_eq!(totals.done_count, 1);
    assert_eq!(totals.todo_street_count, 1);
    assert_eq!(ratio.to_string(), "25.0");

    let groups = relation.format_housenumber_groups(
        &results[0].street,
        &results[0].only_in_reference,
    );
    assert_eq!(groups, vec!["2-6"]);

    let persisted = read_percent(relation.files().housenumbers_percent_path()).unwrap();
    assert_eq!(persisted.to_string(), "25.0");
}

#[test]
fn test_interpolation_override_switches_to_flat_list() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .seed_relations(
            r#"{"x": {
                "region": "01", "subregion": "011", "area_id": 1,
                "filters": {"Main": {"interpolation": "all"}}
            }}"#,
        )
        .unwrap();
    fixture
        .write_ref_housenumbers(
            "x",
            &[("Main", "2"), ("Main", "4"), ("Main", "6"), ("Main", "9")],
        )
        .unwrap();
    fixture.write_map_housenumbers("x", &[]).unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let (results, _totals) = relation.get_missing_housenumbers().unwrap();
    let groups = relation.format_housenumber_groups(
        &results[0].street,
        &results[0].only_in_reference,
    );
    assert_eq!(groups, vec!["2, 4, 6, 9"]);
}

#[test]
fn test_text_report_lists_streets_with_groups() {
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture
        .write_ref_housenumbers(
            "x",
            &[
                ("Második utca", "1"),
                ("Árpád utca", "2"),
                ("Árpád utca", "4"),
                ("Covered köz", "7"),
            ],
        )
        .unwrap();
    fixture
        .write_map_housenumbers("x", &[("Covered köz", "7")])
        .unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    let (results, totals) = relation.get_missing_housenumbers().unwrap();
    // Fully covered streets stay in the result sequence...
    assert_eq!(results.len(), 3);
    assert_eq!(totals.todo_street_count, 2);

    // ...but the text renderer skips them, and sorts accented names
    // by collation, not by byte order.
    let text = output::missing_housenumbers_text(&relation, &results);
    assert_eq!(text, "Árpád utca\t[2-4]\nMásodik utca\t[1]");
}

#[test]
fn test_update_ref_end_to_end() {
    let fixture = TestFixture::with_relation("x").unwrap();
    let streets_source = fixture
        .write_source(
            "reference/streets.tsv",
            "01\t011\tInside street\n01\t099\tOther subregion street\n",
        )
        .unwrap();
    let numbers_a = fixture
        .write_source("reference/numbers-a.tsv", "01\t011\tInside street\t1\n")
        .unwrap();
    let numbers_b = fixture
        .write_source("reference/numbers-b.tsv", "01\t011\tInside street\t3\n")
        .unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();

    assert_eq!(relation.update_ref_streets(&streets_source).unwrap(), 1);
    assert_eq!(
        relation
            .update_ref_housenumbers(&[numbers_a, numbers_b])
            .unwrap(),
        2
    );

    // The freshly extracted reference reconciles against an empty map.
    fixture.write_map_streets("x", &[]).unwrap();
    fixture.write_map_housenumbers("x", &[]).unwrap();
    let missing = relation.get_missing_streets().unwrap();
    assert_eq!(missing.todo, vec!["Inside street"]);
    let (results, totals) = relation.get_missing_housenumbers().unwrap();
    assert_eq!(results[0].street, "Inside street");
    assert_eq!(totals.todo_count, 2);
}

#[test]
fn test_percent_survives_for_overview_listing() {
    let fixture = TestFixture::with_relation("x").unwrap();
    fixture.write_ref_streets("x", &["A", "B"]).unwrap();
    fixture.write_map_streets("x", &["A", "B"]).unwrap();

    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();
    relation.write_missing_streets().unwrap();

    // A later, separate read sees the persisted scalar.
    let registry = fixture.registry().unwrap();
    let relation = registry.get_relation("x").unwrap();
    let persisted = read_percent(relation.files().streets_percent_path()).unwrap();
    assert!(persisted.is_complete());
}
