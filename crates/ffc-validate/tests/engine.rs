use std::path::Path;

use ffc_model::{ErrorType, FlatFile, FlatFileStructure, TestCaseResult};
use ffc_standards::{TestCaseConfigs, structure_from_str, test_configs_from_str};
use ffc_validate::{BuiltinCheck, CheckRegistry, TestCaseEngine, TestExecError};

fn orders_structure() -> FlatFileStructure {
    let json = serde_json::json!({
        "name": "orders",
        "conf_type": "csv",
        "sep": ";",
        "quotechar": "\"",
        "encoding": "utf-8",
        "type_pos": 1,
        "date_fmt": "%Y%m%d",
        "decimal_sep": ".",
        "tests": ["check_dates", "check_unknown", "check_required"],
        "file_pattern": "ORD_",
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
    });
    structure_from_str(Path::new("struct_orders.json"), &json.to_string()).expect("orders")
}

fn stock_structure() -> FlatFileStructure {
    let json = serde_json::json!({
        "name": "stock",
        "conf_type": "pos",
        "encoding": "utf-8",
        "type_limits": [1, 1],
        "date_fmt": "%d%m%Y",
        "decimal_sep": ",",
        "tests": ["check_required"],
        "file_pattern": "STK_",
        "carriage_return": "\n",
        "row_structures": [{
            "type": "S",
            "lengths": [1, 4, 3],
            "date_fields": [],
            "key_pos": 2,
            "decimal_fields": [],
            "digit_fields": []
        }]
    });
    structure_from_str(Path::new("struct_stock.json"), &json.to_string()).expect("stock")
}

fn load<'s>(name: &str, structure: &'s FlatFileStructure, content: &str) -> FlatFile<'s> {
    let rows = ffc_ingest::parse(content, structure).expect("parse");
    FlatFile::new(name, structure, content.to_string(), rows)
}

fn configs(json: &str) -> TestCaseConfigs {
    test_configs_from_str(Path::new("test_configs.json"), json).expect("configs")
}

const RESTRICTED: &str = r#"{
    "configs": [
        {
            "test_conf_name": "default",
            "allowed_file_types": "all",
            "allowed_structures": "all",
            "required_structure_fields": "none",
            "required_row_fields": "none"
        },
        {
            "test_conf_name": "check_required",
            "allowed_file_types": ["csv"],
            "allowed_structures": "all",
            "required_structure_fields": "none",
            "required_row_fields": "none"
        },
        {
            "test_conf_name": "check_never",
            "allowed_file_types": "all",
            "allowed_structures": ["invoices"],
            "required_structure_fields": ["no_such_property"],
            "required_row_fields": "none"
        }
    ]
}"#;

fn never_runs(_: &FlatFile<'_>) -> Result<TestCaseResult, ffc_validate::CheckError> {
    panic!("gated check body must not run");
}

#[test]
fn reports_one_impossible_date() {
    let structure = orders_structure();
    let file = load("ORD_1.csv", &structure, "H;20240101\nH;20240230\nH;20240301\n");
    let engine = TestCaseEngine::new(CheckRegistry::builtin(), TestCaseConfigs::permissive());

    let result = engine.run("check_dates", &file).expect("run");
    assert_eq!(result.test_name, "check_dates");
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].line_number, Some(2));
    assert_eq!(result.steps[0].error_type, ErrorType::DateFormat);
    assert_eq!(result.steps[0].file_name, "ORD_1.csv");
}

#[test]
fn file_type_gate_rejects_before_scanning() {
    let structure = stock_structure();
    let file = load("STK_1.txt", &structure, "S    ABC\n");
    let engine = TestCaseEngine::new(CheckRegistry::builtin(), configs(RESTRICTED));

    let err = engine.run("check_required", &file).unwrap_err();
    assert!(matches!(err, TestExecError::FileTypeNotAllowed { .. }), "{err}");
    assert!(err.is_gate_failure());
    assert_eq!(
        err.to_string(),
        "Test 'check_required' is not allowed for file type 'pos'"
    );
}

#[test]
fn structure_gate_precedes_field_requirements() {
    let structure = orders_structure();
    let file = load("ORD_1.csv", &structure, "H;20240101\n");
    let mut registry = CheckRegistry::builtin();
    registry.register(Box::new(BuiltinCheck::new("check_never", never_runs)));
    let engine = TestCaseEngine::new(registry, configs(RESTRICTED));

    let err = engine.run("check_never", &file).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Test 'check_never' is not allowed for file structure 'orders'"
    );
}

#[test]
fn unknown_check_is_not_found() {
    let structure = orders_structure();
    let file = load("ORD_1.csv", &structure, "H;20240101\n");
    let engine = TestCaseEngine::new(CheckRegistry::builtin(), TestCaseConfigs::permissive());

    let err = engine.run("check_unknown", &file).unwrap_err();
    assert!(matches!(err, TestExecError::NotFound { .. }));
    assert_eq!(err.file_name(), "ORD_1.csv");
}

#[test]
fn running_twice_gives_identical_results() {
    let structure = orders_structure();
    let file = load("ORD_1.csv", &structure, "H;\nH;2024013\nX;1;2\n");
    let engine = TestCaseEngine::new(CheckRegistry::builtin(), TestCaseConfigs::permissive());

    for test_name in ["check_dates", "check_required", "check_carriage_return"] {
        let first = engine.run(test_name, &file).expect("first run");
        let second = engine.run(test_name, &file).expect("second run");
        assert_eq!(first, second, "{test_name}");
    }
}

#[test]
fn suite_continues_after_a_check_cannot_run() {
    let structure = orders_structure();
    let file = load("ORD_1.csv", &structure, "H;20240230\nH;\n");
    let engine = TestCaseEngine::new(CheckRegistry::builtin(), TestCaseConfigs::permissive());

    let suite = engine.run_defined(&file);
    assert_eq!(suite.file_name, "ORD_1.csv");
    assert_eq!(suite.structure, "orders");
    let names: Vec<&str> = suite.results.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(names, vec!["check_dates", "check_unknown", "check_required"]);

    let exec = &suite.results[1].steps;
    assert_eq!(exec.len(), 1);
    assert_eq!(exec[0].line_number, None);
    assert_eq!(exec[0].error_type.tag(), "TEST_EXEC_ERROR_check_unknown");

    assert_eq!(suite.results[2].steps[0].error_type, ErrorType::RequiredField);
    assert_eq!(suite.count_failed(), 3);
    assert_eq!(suite.count_passed(), 0);
}

#[cfg(unix)]
mod plugins {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use ffc_model::ErrorType;
    use ffc_standards::TestCaseConfigs;
    use ffc_validate::{
        Check, CheckRegistry, CheckSource, TestCaseEngine, TestExecError, discover_plugins,
    };
    use tempfile::TempDir;

    use super::{load, orders_structure};

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write plugin");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod plugin");
    }

    #[test]
    fn discovers_executables_in_name_order() {
        let dir = TempDir::new().expect("tempdir");
        script(dir.path(), "zeta.sh", "exit 0");
        script(dir.path(), "alpha.sh", "exit 0");
        fs::write(dir.path().join("notes.txt"), "not a plugin").expect("write");

        let plugins = discover_plugins(&[dir.path().to_path_buf()]).expect("discover");
        let names: Vec<&str> = plugins.iter().map(|plugin| plugin.name()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(plugins[0].path().ends_with("alpha.sh"));
    }

    #[test]
    fn plugin_reads_rows_and_reports_steps() {
        let dir = TempDir::new().expect("tempdir");
        script(
            dir.path(),
            "check_rows.sh",
            r#"input=$(cat)
case "$input" in
  *'"file_name":"ORD_1.csv"'*) ;;
  *) exit 4 ;;
esac
printf '{"steps":[{"line_number":2,"passed":false,"error_type":"FIELD_VALUE_ERROR","message":"bad value"}]}'"#,
        );
        let registry = CheckRegistry::with_plugins(&[dir.path().to_path_buf()]).expect("registry");
        assert!(
            registry
                .available_checks()
                .iter()
                .any(|(name, source)| *name == "check_rows" && matches!(source, CheckSource::Plugin(_)))
        );

        let structure = orders_structure();
        let file = load("ORD_1.csv", &structure, "H;20240101\nH;20240102\n");
        let engine = TestCaseEngine::new(registry, TestCaseConfigs::permissive());
        let result = engine.run("check_rows", &file).expect("run plugin");
        assert_eq!(result.test_name, "check_rows");
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].line_number, Some(2));
        assert_eq!(result.steps[0].error_type, ErrorType::FieldValueError);
        assert_eq!(result.steps[0].message, "bad value");
        assert_eq!(result.steps[0].file_name, "ORD_1.csv");
    }

    #[test]
    fn failing_plugin_is_an_execution_fault() {
        let dir = TempDir::new().expect("tempdir");
        script(dir.path(), "check_boom.sh", "cat > /dev/null\necho boom >&2\nexit 3");
        let registry = CheckRegistry::with_plugins(&[dir.path().to_path_buf()]).expect("registry");
        let engine = TestCaseEngine::new(registry, TestCaseConfigs::permissive());

        let structure = orders_structure();
        let file = load("ORD_1.csv", &structure, "H;20240101\n");
        let err = engine.run("check_boom", &file).unwrap_err();
        assert!(matches!(err, TestExecError::Execution { .. }), "{err}");
        let message = err.to_string();
        assert!(message.contains("boom"), "{message}");
        assert!(message.ends_with("Error during execution of test check_boom"), "{message}");
    }

    #[test]
    fn builtin_wins_over_plugin_of_same_name() {
        let dir = TempDir::new().expect("tempdir");
        script(dir.path(), "check_dates.sh", "exit 1");
        let registry = CheckRegistry::with_plugins(&[dir.path().to_path_buf()]).expect("registry");
        let check = registry.get("check_dates").expect("check_dates");
        assert_eq!(check.source(), CheckSource::Builtin);
    }
}
