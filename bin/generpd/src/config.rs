use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration, loaded from a TOML file.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/generp"
///
/// [seed]
/// machines = "/etc/generp/machines.json"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the redb database file.
    pub data_dir: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Optional path to a JSON array of machines loaded at startup.
    /// Existing records are never overwritten.
    #[serde(default)]
    pub machines: Option<String>,
}

impl ServerConfig {
    /// Resolve a context name to a config path.
    ///
    /// A bare name maps to `/etc/generp/<name>.toml`; anything containing
    /// `/` or `.` is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/generp/{name_or_path}.toml"))
        }
    }

    /// Load and parse the config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
        let config: ServerConfig = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("cannot parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Path of the redb database file.
    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("data.redb")
    }
}
