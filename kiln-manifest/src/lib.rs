//! Declarative instantiation manifests.
//!
//! A manifest is a JSON document naming registry keys to instantiate, with
//! optional per-spawn parameters and counts. Loading validates the shape of
//! the document; checking the named keys against an actual registry is the
//! caller's job (see [`Manifest::unknown_keys`]), since the manifest crate
//! does not know which registry will serve it.

use serde::Deserialize;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

// --- Error Type ---
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid manifest: {0}")]
    Validation(String),
}

// --- Manifest Sections ---

#[derive(Deserialize, Debug, Clone)]
pub struct SpawnSpec {
    /// Registry key of the type to instantiate.
    #[serde(rename = "type")]
    pub type_key: String,
    /// How many instances to create.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Constructor parameters, passed through to the creator as-is.
    /// Defaults to JSON `null`.
    #[serde(default)]
    pub params: serde_json::Value,
}

fn default_count() -> u32 {
    1
}

#[derive(Deserialize, Debug, Clone)]
pub struct Manifest {
    pub spawns: Vec<SpawnSpec>,
}

impl Manifest {
    /// Returns the distinct spawn keys rejected by `is_known`, in first-use
    /// order. Empty means every referenced key is registered.
    pub fn unknown_keys(&self, mut is_known: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for spawn in &self.spawns {
            if !is_known(&spawn.type_key) && !unknown.iter().any(|k| k == &spawn.type_key) {
                unknown.push(spawn.type_key.clone());
            }
        }
        unknown
    }

    /// Total number of instances the manifest asks for.
    pub fn total_count(&self) -> u64 {
        self.spawns.iter().map(|spawn| u64::from(spawn.count)).sum()
    }
}

// --- Loading Function ---

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;

    if manifest.spawns.is_empty() {
        return Err(ManifestError::Validation(
            "manifest declares no spawns".to_string(),
        ));
    }
    if let Some(spawn) = manifest.spawns.iter().find(|spawn| spawn.count == 0) {
        return Err(ManifestError::Validation(format!(
            "spawn `{}` has a count of zero",
            spawn.type_key
        )));
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_manifest(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn load_valid_manifest() {
        let file = write_manifest(
            r#"{
              "spawns": [
                { "type": "Circle", "count": 2, "params": { "radius": 1.5 } },
                { "type": "Square" }
              ]
            }"#,
        );
        let manifest = load_manifest(file.path()).unwrap();

        assert_eq!(manifest.spawns.len(), 2);
        assert_eq!(manifest.spawns[0].type_key, "Circle");
        assert_eq!(manifest.spawns[0].count, 2);
        assert_eq!(manifest.spawns[0].params["radius"], 1.5);
        // Omitted fields fall back to one instance with null params.
        assert_eq!(manifest.spawns[1].count, 1);
        assert!(manifest.spawns[1].params.is_null());
        assert_eq!(manifest.total_count(), 3);
    }

    #[test]
    fn empty_spawn_list_is_rejected() {
        let file = write_manifest(r#"{ "spawns": [] }"#);
        let result = load_manifest(file.path());
        assert!(matches!(result, Err(ManifestError::Validation(_))));
    }

    #[test]
    fn zero_count_is_rejected() {
        let file = write_manifest(
            r#"{ "spawns": [ { "type": "Circle", "count": 0 } ] }"#,
        );
        let result = load_manifest(file.path());
        assert!(matches!(result, Err(ManifestError::Validation(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_manifest("{ not json");
        let result = load_manifest(file.path());
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_manifest(Path::new("/nonexistent/manifest.json"));
        assert!(matches!(result, Err(ManifestError::Io(_))));
    }

    #[test]
    fn unknown_keys_are_reported_once_in_order() {
        let file = write_manifest(
            r#"{
              "spawns": [
                { "type": "Circle" },
                { "type": "Ghost" },
                { "type": "Phantom" },
                { "type": "Ghost" }
              ]
            }"#,
        );
        let manifest = load_manifest(file.path()).unwrap();
        let unknown = manifest.unknown_keys(|key| key == "Circle");
        assert_eq!(unknown, vec!["Ghost".to_string(), "Phantom".to_string()]);
    }
}
