use super::*;
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Row {
    id: String,
    n: i32,
}

#[test]
fn append_then_read_all_roundtrips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.jsonl");
    append_one(&path, &Row { id: "a".into(), n: 1 }).unwrap();
    append_one(&path, &Row { id: "b".into(), n: 2 }).unwrap();
    let rows: Vec<Row> = read_all(&path).unwrap();
    assert_eq!(rows, vec![Row { id: "a".into(), n: 1 }, Row { id: "b".into(), n: 2 }]);
}

#[test]
fn write_all_replaces_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.jsonl");
    append_one(&path, &Row { id: "a".into(), n: 1 }).unwrap();
    write_all(&path, &[Row { id: "b".into(), n: 9 }]).unwrap();
    let rows: Vec<Row> = read_all(&path).unwrap();
    assert_eq!(rows, vec![Row { id: "b".into(), n: 9 }]);
}

#[test]
fn malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.jsonl");
    std::fs::write(&path, "garbage\n{\"id\":\"a\",\"n\":1}\n").unwrap();
    let rows: Vec<Row> = read_all(&path).unwrap();
    assert_eq!(rows, vec![Row { id: "a".into(), n: 1 }]);
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.jsonl");
    let rows: Vec<Row> = read_all(&path).unwrap();
    assert!(rows.is_empty());
}
