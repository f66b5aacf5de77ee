use std::fs;
use std::path::Path;

use ffc_standards::{
    DEFAULT_STRUCTURE_PATTERN, RegistryError, StructureLoadError, load_structures_from_dir,
    load_structures_from_dir_partial,
};
use tempfile::TempDir;

fn structure_json(name: &str, file_pattern: &str) -> String {
    serde_json::json!({
        "name": name,
        "conf_type": "csv",
        "sep": ";",
        "quotechar": "\"",
        "encoding": "utf-8",
        "type_pos": 1,
        "date_fmt": "%Y%m%d",
        "decimal_sep": ".",
        "tests": ["check_dates"],
        "file_pattern": file_pattern,
        "carriage_return": "\n",
        "row_structures": [{
            "type": "H",
            "length": 2,
            "date_fields": [2],
            "key_pos": 1,
            "optional_fields": [],
            "decimal_fields": [],
            "digit_fields": [],
            "fixed_lengths": []
        }]
    })
    .to_string()
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

#[test]
fn loads_matching_files_only() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_orders.json", &structure_json("orders", "ORD_"));
    write(dir.path(), "struct_stock.json", &structure_json("stock", "STK_"));
    write(dir.path(), "notes.json", "not a structure");
    fs::create_dir(dir.path().join("struct_dir.json")).expect("create dir");

    let registry =
        load_structures_from_dir(dir.path(), DEFAULT_STRUCTURE_PATTERN).expect("load structures");
    assert_eq!(registry.len(), 2);
    assert!(registry.get("orders").is_some());
    assert_eq!(
        registry.source("stock"),
        Some(dir.path().join("struct_stock.json").as_path())
    );
}

#[test]
fn malformed_definition_fails_the_whole_directory() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_a.json", &structure_json("a", "A_"));
    write(dir.path(), "struct_b.json", "{ \"name\": \"b\", ");

    let err = load_structures_from_dir(dir.path(), DEFAULT_STRUCTURE_PATTERN).unwrap_err();
    match err {
        RegistryError::Load(load) => {
            assert!(matches!(load, StructureLoadError::Decode { .. }));
            assert_eq!(load.path(), dir.path().join("struct_b.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn partial_load_keeps_good_structures() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_a.json", &structure_json("a", "A_"));
    write(dir.path(), "struct_b.json", "[]");
    write(dir.path(), "struct_c.json", &structure_json("c", "C_"));

    let outcome =
        load_structures_from_dir_partial(dir.path(), DEFAULT_STRUCTURE_PATTERN).expect("load");
    assert_eq!(outcome.registry.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].path, dir.path().join("struct_b.json"));
}

#[test]
fn duplicate_structure_names_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_a.json", &structure_json("same", "A_"));
    write(dir.path(), "struct_b.json", &structure_json("same", "B_"));

    let err = load_structures_from_dir(dir.path(), DEFAULT_STRUCTURE_PATTERN).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateStructure { ref name, .. } if name == "same"));
}

#[test]
fn resolves_structure_from_basename() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_orders.json", &structure_json("orders", "ORD_.*\\.csv"));
    write(dir.path(), "struct_stock.json", &structure_json("stock", "STK_"));
    let registry = load_structures_from_dir(dir.path(), DEFAULT_STRUCTURE_PATTERN).expect("load");

    let found = registry
        .resolve_by_filename(Path::new("/data/in/ORD_20240101.csv"))
        .expect("resolve");
    assert_eq!(found.map(|s| s.name.as_str()), Some("orders"));

    let none = registry
        .resolve_by_filename(Path::new("/data/in/XORD_1.csv"))
        .expect("resolve");
    assert!(none.is_none());
}

#[test]
fn overlapping_file_patterns_are_ambiguous() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "struct_a.json", &structure_json("a", "DATA"));
    write(dir.path(), "struct_b.json", &structure_json("b", "DATA_2"));
    let registry = load_structures_from_dir(dir.path(), DEFAULT_STRUCTURE_PATTERN).expect("load");

    let err = registry
        .resolve_by_filename(Path::new("DATA_2024.txt"))
        .unwrap_err();
    match err {
        RegistryError::AmbiguousStructure { candidates, .. } => {
            assert_eq!(candidates, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_pattern_selects_other_files() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "orders.structure", &structure_json("orders", "ORD_"));
    write(dir.path(), "struct_stock.json", &structure_json("stock", "STK_"));

    let registry = load_structures_from_dir(dir.path(), "*.structure").expect("load");
    assert_eq!(registry.len(), 1);
    assert!(registry.get("orders").is_some());
}
