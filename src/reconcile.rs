//! Reconciliation engine: set difference and house-number formatting
//!
//! Compares cached reference tables against cached map tables and produces
//! the "missing" listings. Comparison works on normalized keys; display
//! forms are preserved verbatim for the reports.

use crate::collate;
use crate::tabular::Table;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A house number as read from a reference or map table.
///
/// The display form is the trimmed verbatim field. The comparison key is
/// the leading digit run; any trailing annotation ("12a", "12*") is
/// display-only and never participates in matching.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HouseNumber {
    display: String,
    key: String,
}

impl HouseNumber {
    pub fn new(raw: &str) -> Self {
        let display = raw.trim().to_string();
        let key = comparison_key(&display);
        Self { display, key }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Numeric value and opaque suffix for parity and range computation.
    /// Entries with no leading digit count as 0 with the whole string as
    /// suffix, so they render standalone.
    pub fn numeric_parts(&self) -> (u64, &str) {
        let digits_end = self
            .display
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.display.len());
        let value = self.display[..digits_end].parse().unwrap_or(0);
        (value, &self.display[digits_end..])
    }
}

/// Comparison key for a house-number string: the leading digit run, or the
/// whole string when there is none.
fn comparison_key(display: &str) -> String {
    let digits: String = display
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        display.to_string()
    } else {
        digits
    }
}

/// Street-level reconciliation result.
///
/// `todo` holds names present in the reference but not in the map data,
/// `done` the intersection; both collation-sorted.
#[derive(Debug, Clone, Serialize)]
pub struct MissingSet {
    pub todo: Vec<String>,
    pub done: Vec<String>,
}

/// Diff the single-column street tables.
pub fn missing_streets(reference: &Table, map: &Table) -> MissingSet {
    let map_names: HashSet<String> = first_column(map).collect();

    let mut todo = Vec::new();
    let mut done = Vec::new();
    let mut seen = HashSet::new();
    for name in first_column(reference) {
        if !seen.insert(name.clone()) {
            continue;
        }
        if map_names.contains(&name) {
            done.push(name);
        } else {
            todo.push(name);
        }
    }
    collate::sort_collated(&mut todo);
    collate::sort_collated(&mut done);
    MissingSet { todo, done }
}

fn first_column(table: &Table) -> impl Iterator<Item = String> + '_ {
    table
        .rows()
        .iter()
        .filter_map(|row| row.first())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Per-street house-number result. Streets with an empty list stay in the
/// sequence; presentation decides whether to show them.
#[derive(Debug, Clone, Serialize)]
pub struct StreetNumbers {
    pub street: String,
    pub only_in_reference: Vec<HouseNumber>,
}

/// Aggregate counts across all streets of one relation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HousenumberTotals {
    pub todo_count: usize,
    pub done_count: usize,
    pub todo_street_count: usize,
}

/// Diff the two-column (street, number) tables, grouping by street.
///
/// Streets come from the reference table; map-only streets contribute
/// nothing. Duplicate (street, key) pairs collapse, first display form
/// wins. Rows narrower than two fields are ignored.
pub fn missing_housenumbers(reference: &Table, map: &Table) -> (Vec<StreetNumbers>, HousenumberTotals) {
    let mut map_numbers: HashMap<String, HashSet<String>> = HashMap::new();
    for (street, number) in number_rows(map) {
        map_numbers.entry(street).or_default().insert(number.key);
    }

    // Reference numbers grouped per street, deduplicated by key.
    let mut ref_numbers: IndexMap<String, IndexMap<String, HouseNumber>> = IndexMap::new();
    for (street, number) in number_rows(reference) {
        ref_numbers
            .entry(street)
            .or_default()
            .entry(number.key.clone())
            .or_insert(number);
    }

    let mut totals = HousenumberTotals {
        todo_count: 0,
        done_count: 0,
        todo_street_count: 0,
    };
    let mut results = Vec::new();
    for (street, numbers) in ref_numbers {
        let present = map_numbers.get(&street);
        let mut only_in_reference: Vec<HouseNumber> = numbers
            .into_values()
            .filter(|number| {
                let covered = present.map_or(false, |set| set.contains(number.key()));
                if covered {
                    totals.done_count += 1;
                }
                !covered
            })
            .collect();
        only_in_reference.sort_by(|a, b| collate::collate(a.display(), b.display()));

        totals.todo_count += only_in_reference.len();
        if !only_in_reference.is_empty() {
            totals.todo_street_count += 1;
        }
        results.push(StreetNumbers {
            street,
            only_in_reference,
        });
    }
    results.sort_by(|a, b| collate::collate(&a.street, &b.street));
    (results, totals)
}

fn number_rows(table: &Table) -> impl Iterator<Item = (String, HouseNumber)> + '_ {
    table.rows().iter().filter_map(|row| {
        let street = row.first()?.trim();
        let number = row.get(1)?.trim();
        if street.is_empty() || number.is_empty() {
            return None;
        }
        Some((street.to_string(), HouseNumber::new(number)))
    })
}

/// Format missing numbers for a street without the even/odd convention:
/// one collation-sorted group, no compression.
pub fn format_flat(numbers: &[HouseNumber]) -> Vec<String> {
    let mut displays: Vec<String> = numbers.iter().map(|n| n.display().to_string()).collect();
    collate::sort_collated(&mut displays);
    vec![displays.join(", ")]
}

/// Format missing numbers for an even/odd-aware street.
///
/// Numbers split into parity buckets; within a bucket, consecutive values
/// two apart with no suffix merge into "start-end" ranges. Group order is
/// fixed: even first, then odd; empty groups are omitted.
pub fn format_even_odd(numbers: &[HouseNumber]) -> Vec<String> {
    let mut even = Vec::new();
    let mut odd = Vec::new();
    for number in numbers {
        let (value, suffix) = number.numeric_parts();
        let entry = (value, suffix.to_string(), number.display().to_string());
        if value % 2 == 0 {
            even.push(entry);
        } else {
            odd.push(entry);
        }
    }

    let mut groups = Vec::new();
    for bucket in [even, odd] {
        let ranged = compress_bucket(bucket);
        if !ranged.is_empty() {
            groups.push(ranged.join(", "));
        }
    }
    groups
}

/// Merge a parity bucket into range tokens.
fn compress_bucket(mut bucket: Vec<(u64, String, String)>) -> Vec<String> {
    bucket.sort_by(|a, b| (a.0, &a.2).cmp(&(b.0, &b.2)));

    let mut tokens = Vec::new();
    let mut run: Option<(u64, u64)> = None;
    for (value, suffix, display) in bucket {
        if !suffix.is_empty() {
            // Suffixed values never merge.
            flush_run(&mut tokens, run.take());
            tokens.push(display);
            continue;
        }
        run = match run {
            Some((start, end)) if value == end + 2 => Some((start, value)),
            current => {
                flush_run(&mut tokens, current);
                Some((value, value))
            }
        };
    }
    flush_run(&mut tokens, run);
    tokens
}

fn flush_run(tokens: &mut Vec<String>, run: Option<(u64, u64)>) {
    if let Some((start, end)) = run {
        if start == end {
            tokens.push(start.to_string());
        } else {
            tokens.push(format!("{}-{}", start, end));
        }
    }
}
