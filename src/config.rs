use crate::backend::BackendKind;
use crate::compliance::{MergePolicy, NegativeStatusPolicy};
use crate::vendor::lenovo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level wolcheck configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    pub policy: PolicyConfig,
    pub provisioning: ProvisioningConfig,
    pub hp: HpConfig,
    pub lenovo: LenovoConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// How firmware and OS tier statuses combine.
    pub merge: MergePolicy,
    /// Exit code for error and unsupported results.
    pub negative_status: NegativeStatusPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Install or load the vendor channel when it is missing.
    pub enabled: bool,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HpConfig {
    /// Value every HP Wake On LAN setting must hold to count as compliant.
    /// Unset means any readable value passes.
    pub required_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LenovoConfig {
    /// Label of the Wake on LAN entry in the BIOS settings.
    pub label: String,
}

impl Default for LenovoConfig {
    fn default() -> Self {
        Self {
            label: lenovo::DEFAULT_LABEL.to_string(),
        }
    }
}

const SYSTEM_CONFIG: &str = "/etc/wolcheck/config.toml";

fn load_system() -> Option<toml::Value> {
    let content = std::fs::read_to_string(Path::new(SYSTEM_CONFIG)).ok()?;
    parse_value(&content, Path::new(SYSTEM_CONFIG))
}

/// Load the user config file (~/.config/wolcheck/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("wolcheck").join("config.toml");
    let content = std::fs::read_to_string(&path).ok()?;
    parse_value(&content, &path)
}

fn parse_value(content: &str, path: &Path) -> Option<toml::Value> {
    match toml::from_str(content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
            None
        }
    }
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
            Config::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            Config::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&PathBuf>) -> Config {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to deserialize config");
            Config::default()
        }),
        None => Config::default(),
    }
}
