//! JSON policy files.
//!
//! ```json
//! { "preset": "testing", "arrayLength": 2,
//!   "fieldValues": { "sku": ["A-1", "B-2"] },
//!   "typeValues": { "Money": [1.5, 9.99] } }
//! ```
//!
//! `fieldValues` / `typeValues` become generators that pick uniformly from the
//! listed values.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{GenerationPolicy, GeneratorMap, PolicyOverrides, Preset, one_of};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyFile {
    pub preset: Option<Preset>,
    pub seed: Option<u64>,
    pub array_length: Option<usize>,
    pub skip_optional: Option<bool>,
    pub skip_optional_probability: Option<f64>,
    pub allow_null: Option<bool>,
    pub null_probability: Option<f64>,
    pub consistent: Option<bool>,
    #[serde(default)]
    pub field_values: IndexMap<String, Vec<Value>>,
    #[serde(default)]
    pub type_values: IndexMap<String, Vec<Value>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyFileError {
    #[error("failed to read policy file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid policy file {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

impl PolicyFile {
    pub fn load(path: &Path) -> Result<Self, PolicyFileError> {
        let src = std::fs::read_to_string(path).map_err(|source| PolicyFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        from_str_with_path(&src).map_err(|message| PolicyFileError::Invalid {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn overrides(&self) -> PolicyOverrides {
        PolicyOverrides {
            seed: self.seed,
            array_length: self.array_length,
            skip_optional: self.skip_optional,
            skip_optional_probability: self.skip_optional_probability,
            allow_null: self.allow_null,
            null_probability: self.null_probability,
            consistent: self.consistent,
            field_generators: pickers(&self.field_values),
            custom_generators: pickers(&self.type_values),
        }
    }

    /// Preset (or defaults), then this file's settings.
    pub fn policy(&self) -> GenerationPolicy {
        let base = self.preset.map(Preset::policy).unwrap_or_default();
        base.merged(self.overrides())
    }
}

fn pickers(values: &IndexMap<String, Vec<Value>>) -> GeneratorMap {
    values
        .iter()
        .map(|(key, options)| (key.clone(), one_of(options.clone())))
        .collect()
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys_and_value_lists() {
        let file: PolicyFile = from_str_with_path(
            r#"{ "preset": "minimal", "arrayLength": 2, "nullProbability": 0.5,
                 "fieldValues": { "SKU": ["A-1"] }, "typeValues": { "Money": [1.5] } }"#,
        )
        .unwrap();
        assert_eq!(file.preset, Some(Preset::Minimal));

        let policy = file.policy();
        assert_eq!(policy.array_length, 2);
        assert_eq!(policy.null_probability, 0.5);
        // preset settings survive where the file is silent
        assert!(!policy.allow_null);
        assert!(policy.field_generators.contains_key("sku"));
        assert!(policy.custom_generators.contains_key("money"));
    }

    #[test]
    fn unknown_keys_report_their_path() {
        let err = from_str_with_path::<PolicyFile>(r#"{ "arrayLenght": 2 }"#).unwrap_err();
        assert!(err.contains("arrayLenght"), "{err}");

        let err = from_str_with_path::<PolicyFile>(r#"{ "fieldValues": { "sku": "A" } }"#).unwrap_err();
        assert!(err.contains("fieldValues.sku"), "{err}");
    }

    #[test]
    fn load_reports_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        assert!(matches!(PolicyFile::load(&missing), Err(PolicyFileError::Read { .. })));

        let good = tmp.path().join("policy.json");
        std::fs::write(&good, r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(PolicyFile::load(&good).unwrap().policy().seed, 7);
    }
}
