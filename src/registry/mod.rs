//! Regulation version registry: which game versions exist, where their data lives,
//! and the rule toggles each one applies.

use crate::regulation::{
    decode_regulation, parse_regulation_json, ExceptionTable, Regulation, RegulationError,
    RegulationRules,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("{}: no {entry} in bundle", path.display())]
    MissingEntry { path: PathBuf, entry: String },
    #[error("{}: {size} bytes exceeds limit of {max}", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("{}: {message}", path.display())]
    Json { path: PathBuf, message: String },
    #[error("{}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown regulation version {0:?}")]
    UnknownVersion(String),
    #[error("regulation version {0:?} listed twice")]
    DuplicateVersion(String),
    #[error("regulation version {version:?}: {source}")]
    Regulation {
        version: String,
        source: RegulationError,
    },
}

/// One entry of the registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationVersion {
    pub id: String,
    pub name: String,
    /// Regulation JSON or .zip bundle, relative to the registry file.
    pub data: PathBuf,
    #[serde(default)]
    pub rules: RegulationRules,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub versions: Vec<RegulationVersion>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Registry {
    /// Parse registry TOML; `data` paths resolve against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path, origin: &Path) -> Result<Self, LoadError> {
        let mut registry: Registry = toml::from_str(content).map_err(|source| LoadError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;
        let mut seen = HashSet::new();
        for v in &registry.versions {
            if !seen.insert(v.id.as_str()) {
                return Err(LoadError::DuplicateVersion(v.id.clone()));
            }
        }
        registry.base_dir = base_dir.to_path_buf();
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let registry = Self::from_toml_str(&content, base_dir, path)?;
        tracing::debug!(path = %path.display(), versions = registry.versions.len(), "loaded registry");
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&RegulationVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn data_path(&self, version: &RegulationVersion) -> PathBuf {
        self.base_dir.join(&version.data)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(|v| v.id.as_str())
    }
}

/// Read, decode, and share the regulation data for `version_id`.
pub fn load_regulation_data(registry: &Registry, version_id: &str) -> Result<Arc<Regulation>, LoadError> {
    let version = registry
        .get(version_id)
        .ok_or_else(|| LoadError::UnknownVersion(version_id.to_string()))?;
    let path = registry.data_path(version);
    let content = crate::source::read_regulation_source(&path)?;
    let data = parse_regulation_json(&content).map_err(|e| LoadError::Json {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let regulation = decode_regulation(&data, &version.rules, &ExceptionTable::default()).map_err(
        |source| LoadError::Regulation {
            version: version_id.to_string(),
            source,
        },
    )?;
    tracing::info!(
        version = %version_id,
        weapons = regulation.weapons.len(),
        "loaded regulation data"
    );
    Ok(Arc::new(regulation))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
[[versions]]
id = "latest"
name = "Patch 1.10"
data = "regulation.json"

[[versions]]
id = "capped"
name = "Patch 1.10 (capped)"
data = "regulation.json"

[versions.rules]
max_upgrade_level = 0
disable_two_handing_attack_power_bonus = true
"#;

    const DATA: &str = r#"{
        "attackElementCorrects": { "10000": { "0": ["str"] } },
        "reinforceTypes": { "0": [ {}, { "attack": { "0": 1.5 } } ] },
        "weapons": [{
            "name": "Club", "weaponName": "Club", "affinityId": 0, "weaponType": 41,
            "attack": [[0, 100]], "attributeScaling": [["str", 0.5]],
            "attackElementCorrectId": 10000, "reinforceTypeId": 0
        }]
    }"#;

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regulations.toml");
        fs::write(&path, REGISTRY).unwrap();
        fs::write(dir.path().join("regulation.json"), DATA).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_versions_and_rules() {
        let (_dir, path) = setup();
        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), ["latest", "capped"]);
        assert_eq!(registry.get("latest").unwrap().rules, RegulationRules::default());
        let capped = &registry.get("capped").unwrap().rules;
        assert_eq!(capped.max_upgrade_level, Some(0));
        assert!(capped.disable_two_handing_attack_power_bonus);
        assert_eq!(capped.ineffective_attribute_penalty, 0.4);
    }

    #[test]
    fn loads_and_applies_version_rules() {
        let (_dir, path) = setup();
        let registry = Registry::load(&path).unwrap();
        let latest = load_regulation_data(&registry, "latest").unwrap();
        assert_eq!(latest.weapons[0].max_upgrade_level(), 1);
        let capped = load_regulation_data(&registry, "capped").unwrap();
        assert_eq!(capped.weapons[0].max_upgrade_level(), 0);
        assert!(capped.rules.disable_two_handing_attack_power_bonus);
    }

    #[test]
    fn unknown_version() {
        let (_dir, path) = setup();
        let registry = Registry::load(&path).unwrap();
        assert!(matches!(
            load_regulation_data(&registry, "1.02"),
            Err(LoadError::UnknownVersion(id)) if id == "1.02"
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let toml = "[[versions]]\nid = \"a\"\nname = \"A\"\ndata = \"x.json\"\n\n[[versions]]\nid = \"a\"\nname = \"B\"\ndata = \"y.json\"\n";
        assert!(matches!(
            Registry::from_toml_str(toml, Path::new("."), Path::new("r.toml")),
            Err(LoadError::DuplicateVersion(_))
        ));
    }

    #[test]
    fn bad_data_is_reported_per_version() {
        let (dir, path) = setup();
        fs::write(dir.path().join("regulation.json"), r#"{"weapons": [{"name": "X"}]}"#).unwrap();
        let registry = Registry::load(&path).unwrap();
        assert!(matches!(
            load_regulation_data(&registry, "latest"),
            Err(LoadError::Json { .. })
        ));
    }
}
