//! Test case configurations: the applicability contract of each check.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TestConfigError;

/// Name of the configuration used by checks without one of their own.
pub const DEFAULT_TEST_CONFIG: &str = "default";

const REQUIRED_KEYS: &[&str] = &[
    "test_conf_name",
    "allowed_file_types",
    "allowed_structures",
    "required_structure_fields",
    "required_row_fields",
];

/// A set of allowed names, or everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowance {
    All,
    Only(BTreeSet<String>),
}

impl Allowance {
    pub fn allows(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(values) => values.contains(value),
        }
    }
}

/// Attribute names that must be exposed, or no requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRequirement {
    None,
    Fields(Vec<String>),
}

impl FieldRequirement {
    /// Required fields for which `has` returns false, in declaration order.
    pub fn missing<F>(&self, has: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::None => Vec::new(),
            Self::Fields(fields) => fields.iter().filter(|f| !has(f.as_str())).cloned().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSet {
    Keyword(String),
    List(Vec<String>),
}

/// Applicability contract for one named check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseConfig {
    pub name: String,
    pub allowed_file_types: Allowance,
    pub allowed_structures: Allowance,
    pub required_structure_fields: FieldRequirement,
    pub required_row_fields: FieldRequirement,
}

impl TestCaseConfig {
    /// Configuration that lets a check run anywhere.
    pub fn permissive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_file_types: Allowance::All,
            allowed_structures: Allowance::All,
            required_structure_fields: FieldRequirement::None,
            required_row_fields: FieldRequirement::None,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, TestConfigError> {
        let name = object
            .get("test_conf_name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(|key| format!("'{key}'"))
            .collect();
        if !missing.is_empty() {
            return Err(TestConfigError::MissingKeys { name, missing });
        }

        let set = |key: &str| -> Result<RawSet, TestConfigError> {
            let value = object.get(key).cloned().unwrap_or(Value::Null);
            serde_json::from_value(value).map_err(|_| TestConfigError::Invalid {
                name: name.clone(),
                message: format!("'{key}' must be a list of strings or a keyword"),
            })
        };
        let allowance = |key: &str| -> Result<Allowance, TestConfigError> {
            match set(key)? {
                RawSet::Keyword(word) if word == "all" => Ok(Allowance::All),
                RawSet::Keyword(word) => Err(TestConfigError::Invalid {
                    name: name.clone(),
                    message: format!("'{key}' must be \"all\" or a list, not \"{word}\""),
                }),
                RawSet::List(values) => Ok(Allowance::Only(values.into_iter().collect())),
            }
        };
        let requirement = |key: &str| -> Result<FieldRequirement, TestConfigError> {
            match set(key)? {
                RawSet::Keyword(word) if word == "none" => Ok(FieldRequirement::None),
                RawSet::Keyword(word) => Err(TestConfigError::Invalid {
                    name: name.clone(),
                    message: format!("'{key}' must be \"none\" or a list, not \"{word}\""),
                }),
                RawSet::List(values) => Ok(FieldRequirement::Fields(values)),
            }
        };

        Ok(Self {
            allowed_file_types: allowance("allowed_file_types")?,
            allowed_structures: allowance("allowed_structures")?,
            required_structure_fields: requirement("required_structure_fields")?,
            required_row_fields: requirement("required_row_fields")?,
            name,
        })
    }
}

/// Every test case configuration of a run, including the mandatory default.
#[derive(Debug, Clone)]
pub struct TestCaseConfigs {
    configs: BTreeMap<String, TestCaseConfig>,
    default: TestCaseConfig,
}

impl TestCaseConfigs {
    /// Build from a list of configurations. One must be named `default`.
    pub fn new(
        configs: impl IntoIterator<Item = TestCaseConfig>,
        origin: &Path,
    ) -> Result<Self, TestConfigError> {
        let mut by_name = BTreeMap::new();
        for config in configs {
            if by_name.contains_key(&config.name) {
                return Err(TestConfigError::Duplicate { name: config.name });
            }
            by_name.insert(config.name.clone(), config);
        }
        let default = by_name
            .remove(DEFAULT_TEST_CONFIG)
            .ok_or_else(|| TestConfigError::MissingDefault {
                path: origin.to_path_buf(),
            })?;
        Ok(Self {
            configs: by_name,
            default,
        })
    }

    /// Only a permissive default; used when no configuration file is given.
    pub fn permissive() -> Self {
        Self {
            configs: BTreeMap::new(),
            default: TestCaseConfig::permissive(DEFAULT_TEST_CONFIG),
        }
    }

    /// Configuration registered for `test_name`, else the default.
    pub fn get_or_default(&self, test_name: &str) -> &TestCaseConfig {
        self.configs.get(test_name).unwrap_or(&self.default)
    }

    pub fn default_config(&self) -> &TestCaseConfig {
        &self.default
    }

    /// Number of configurations, the default included.
    pub fn count(&self) -> usize {
        self.configs.len() + 1
    }
}

/// Parse test case configurations from JSON.
pub fn test_configs_from_str(origin: &Path, json: &str) -> Result<TestCaseConfigs, TestConfigError> {
    let value: Value = serde_json::from_str(json).map_err(|source| TestConfigError::Json {
        path: origin.to_path_buf(),
        source,
    })?;
    let entries = value
        .get("configs")
        .and_then(Value::as_array)
        .ok_or_else(|| TestConfigError::Invalid {
            name: origin.display().to_string(),
            message: "expected an object with a 'configs' array".to_string(),
        })?;

    let configs = entries
        .iter()
        .map(|entry| match entry {
            Value::Object(object) => TestCaseConfig::from_object(object),
            _ => Err(TestConfigError::Invalid {
                name: origin.display().to_string(),
                message: "every entry of 'configs' must be an object".to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    TestCaseConfigs::new(configs, origin)
}

/// Load test case configurations from a JSON file.
pub fn load_test_configs(path: &Path) -> Result<TestCaseConfigs, TestConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| TestConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    test_configs_from_str(path, &content)
}
