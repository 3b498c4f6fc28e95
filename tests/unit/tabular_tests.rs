//! Unit tests for the tab-separated table store

use mapdiff::tabular::{read_table, write_table, Table};
use tempfile::TempDir;

#[test]
fn test_round_trip_stability() {
    // write(read(T)) == T for uniform-width tables.
    let cases = [
        "",
        "single\n",
        "Main Street\t1\nSecond Street\t2\n",
        "name with spaces\tvalue\nanother\t12a\n",
    ];
    let temp_dir = TempDir::new().unwrap();
    for (index, content) in cases.iter().enumerate() {
        let path = temp_dir.path().join(format!("case-{}.tsv", index));
        let table = Table::parse(content);
        write_table(&path, &table).unwrap();
        let read_back = read_table(&path).unwrap();
        assert_eq!(read_back, table);
        assert_eq!(read_back.to_tsv(), *content);
    }
}

#[test]
fn test_zero_row_table_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.tsv");
    write_table(&path, &Table::default()).unwrap();

    // The file exists, and reading it is a success with zero rows; this is
    // distinct from the file being absent.
    assert!(path.exists());
    let table = read_table(&path).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_unicode_fields_survive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("t.tsv");
    let table = Table::new(vec![vec!["Üllői út".to_string(), "12/a".to_string()]]);
    write_table(&path, &table).unwrap();
    assert_eq!(read_table(&path).unwrap(), table);
}

#[test]
fn test_overwrite_leaves_no_stale_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("t.tsv");

    let big = Table::new((0..100).map(|i| vec![format!("street-{}", i)]).collect());
    write_table(&path, &big).unwrap();
    let small = Table::new(vec![vec!["only".to_string()]]);
    write_table(&path, &small).unwrap();

    assert_eq!(read_table(&path).unwrap(), small);
}
