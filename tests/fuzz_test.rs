//! Randomized tests for DDL rendering and argument validation.
//!
//! Inputs are generated with `rand` and checked against properties that must
//! hold for every input rather than fixed expected output.

use mysql_mcp_server::models::{ColumnDescriptor, ResourceBase, SchemaTarget, TableName};
use mysql_mcp_server::tools::ddl::{quote_identifier, render_schema};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;

/// Generate random string of given length
fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate various edge-case strings
fn edge_case_strings() -> Vec<String> {
    vec![
        String::new(),
        " ".to_string(),
        "\n\r\t".to_string(),
        "\0".to_string(),
        "üöÄ".repeat(20),
        "'OR 1=1--".to_string(),
        "x'; DROP TABLE y; --".to_string(),
        "we`ird".to_string(),
        "``".to_string(),
        "a/b".to_string(),
        "%2F".to_string(),
        "all-tables".to_string(),
        "a".repeat(10000),
        random_string(64),
    ]
}

fn random_rows(rng: &mut impl Rng) -> Vec<ColumnDescriptor> {
    let table_count = rng.gen_range(0..6);
    let mut rows = Vec::new();
    for t in 0..table_count {
        let table = format!("{}_{t}", random_string(rng.gen_range(1..8)));
        for c in 0..rng.gen_range(1..5) {
            let nullable = if rng.gen_bool(0.5) { "NO" } else { "YES" };
            let default = rng.gen_bool(0.3).then(|| format!("'{}'", random_string(4)));
            rows.push(ColumnDescriptor::from_catalog(
                table.clone(),
                format!("c{c}"),
                "int",
                nullable,
                default,
            ));
        }
    }
    rows
}

/// Reorder whole tables while keeping each table's columns in order.
fn interleave(rows: &[ColumnDescriptor], rng: &mut impl Rng) -> Vec<ColumnDescriptor> {
    let mut queues: Vec<Vec<ColumnDescriptor>> = Vec::new();
    for row in rows {
        match queues.iter_mut().find(|q| q[0].table_name == row.table_name) {
            Some(queue) => queue.push(row.clone()),
            None => queues.push(vec![row.clone()]),
        }
    }
    queues.iter_mut().for_each(|q| q.reverse());

    let mut out = Vec::with_capacity(rows.len());
    while !queues.is_empty() {
        let idx = rng.gen_range(0..queues.len());
        if let Some(row) = queues[idx].pop() {
            out.push(row);
        }
        if queues[idx].is_empty() {
            queues.remove(idx);
        }
    }
    out
}

fn create_table_names(ddl: &str) -> Vec<String> {
    ddl.lines()
        .filter_map(|line| line.strip_prefix("CREATE TABLE "))
        .map(|rest| rest.trim_end_matches(" (").to_string())
        .collect()
}

#[test]
fn fuzz_render_is_deterministic() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let rows = random_rows(&mut rng);
        assert_eq!(render_schema(&rows), render_schema(&rows.clone()));
    }
}

#[test]
fn fuzz_render_ignores_table_interleaving() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let rows = random_rows(&mut rng);
        let shuffled = interleave(&rows, &mut rng);
        assert_eq!(render_schema(&rows), render_schema(&shuffled));
    }
}

#[test]
fn fuzz_render_sorts_tables() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let mut rows = random_rows(&mut rng);
        rows.shuffle(&mut rng);
        let ddl = render_schema(&rows);

        let names = create_table_names(&ddl);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);

        let mut expected: Vec<String> = rows.iter().map(|r| quote_identifier(&r.table_name)).collect();
        expected.sort();
        expected.dedup();
        assert_eq!(names, expected);
    }
}

#[test]
fn fuzz_render_line_suffixes() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let rows = random_rows(&mut rng);
        let ddl = render_schema(&rows);
        for row in &rows {
            let mut line = format!("    {} int", quote_identifier(&row.column_name));
            if !row.is_nullable {
                line.push_str(" NOT NULL");
            }
            if let Some(default) = &row.default_value {
                line.push_str(" DEFAULT ");
                line.push_str(default);
            }
            assert!(ddl.contains(&line), "missing {line:?} in {ddl}");
        }
    }
}

#[test]
fn fuzz_table_name_validation_never_panics() {
    for input in edge_case_strings() {
        match TableName::parse(input.clone()) {
            Ok(name) => assert_eq!(name.as_str(), input),
            Err(_) => assert!(input.trim().is_empty()),
        }
        let _ = SchemaTarget::from_table_argument(Some(&input));
        let _ = SchemaTarget::from_mode(&input, Some(&input));
    }
}

#[test]
fn fuzz_resource_uri_round_trip() {
    let base = ResourceBase::from_connection_string("mysql://localhost:3306/shop", "shop").unwrap();
    let mut names = edge_case_strings();
    names.extend((0..50).map(|i| random_string(i + 1)));

    for input in names {
        let Ok(table) = TableName::parse(input) else {
            continue;
        };
        let uri = base.table_uri(&table);
        assert_eq!(base.parse_table_uri(&uri).unwrap(), table, "uri {uri}");
    }
}

#[test]
fn fuzz_quote_identifier_balanced() {
    for input in edge_case_strings() {
        let quoted = quote_identifier(&input);
        let inner = &quoted[1..quoted.len() - 1];
        assert_eq!(inner.replace("``", ""), inner.replace("``", "").replace('`', ""));
    }
}
