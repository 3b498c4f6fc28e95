//! Integration tests for the relation registry and listing filters

use crate::common::TestFixture;
use mapdiff::filter::RelationFilter;
use mapdiff::percent::Percent;
use mapdiff::MapdiffError;

fn seeded_fixture() -> TestFixture {
    let fixture = TestFixture::new().unwrap();
    fixture
        .seed_relations(
            r#"{
                "ujbuda": {"region": "01", "subregion": "011", "area_id": 2713748},
                "ormezo": {"region": "01", "subregion": "011", "area_id": 2714377, "streets": "no"},
                "nagykanizsa": {"region": "20", "subregion": "201", "area_id": 407271, "streets": "only"}
            }"#,
        )
        .unwrap();
    fixture
        .seed_regions(
            r#"{
                "01": {"name": "Budapest", "subregions": {"011": "Újbuda"}},
                "20": {"name": "Zala", "subregions": {"201": "Nagykanizsa"}}
            }"#,
        )
        .unwrap();
    fixture
}

#[test]
fn test_registry_hands_out_configured_relations() {
    let fixture = seeded_fixture();
    let registry = fixture.registry().unwrap();

    assert_eq!(registry.names(), vec!["nagykanizsa", "ormezo", "ujbuda"]);

    let relation = registry.get_relation("ujbuda").unwrap();
    assert_eq!(relation.config().area_id, 2713748);
    assert!(relation.config().streets.checks_streets());
    assert!(relation.config().streets.checks_housenumbers());
}

#[test]
fn test_unknown_relation_is_a_distinct_error() {
    let fixture = seeded_fixture();
    let registry = fixture.registry().unwrap();

    let err = registry.get_relation("atlantis").unwrap_err();
    assert!(matches!(err, MapdiffError::UnknownRelation { .. }));
}

#[test]
fn test_region_metadata() {
    let fixture = seeded_fixture();
    let registry = fixture.registry().unwrap();

    assert_eq!(registry.regions(), vec!["01", "20"]);
    assert_eq!(registry.region_name("20"), Some("Zala"));
    assert_eq!(registry.subregion_ids("01"), vec!["011"]);
    assert_eq!(registry.subregion_name("20", "201"), Some("Nagykanizsa"));
}

#[test]
fn test_filters_select_relations() {
    let fixture = seeded_fixture();
    let registry = fixture.registry().unwrap();

    let by_region = RelationFilter::parse(&["region", "20"]);
    let names: Vec<String> = registry
        .names()
        .into_iter()
        .filter(|name| {
            let relation = registry.get_relation(name).unwrap();
            by_region.matches(relation.config(), &[])
        })
        .collect();
    assert_eq!(names, vec!["nagykanizsa"]);

    let hide_complete = RelationFilter::parse(&["incomplete"]);
    let complete = [Percent::Value(100.0)];
    let partial = [Percent::Value(12.5)];
    let relation = registry.get_relation("ujbuda").unwrap();
    assert!(!hide_complete.matches(relation.config(), &complete));
    assert!(hide_complete.matches(relation.config(), &partial));
}

#[test]
fn test_street_policy_shapes_tracked_categories() {
    let fixture = seeded_fixture();
    let registry = fixture.registry().unwrap();

    let housenumbers_only = registry.get_relation("ormezo").unwrap();
    assert!(!housenumbers_only.config().streets.checks_streets());
    assert!(housenumbers_only.config().streets.checks_housenumbers());

    let streets_only = registry.get_relation("nagykanizsa").unwrap();
    assert!(streets_only.config().streets.checks_streets());
    assert!(!streets_only.config().streets.checks_housenumbers());
}
