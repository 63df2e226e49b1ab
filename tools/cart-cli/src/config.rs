//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cart_core::cart::default_state_key;
use cart_storage::{Backend, FileBackend, MemoryBackend};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["shopcart.toml", ".shopcart.toml", "shopcart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Diagnostics output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Presentation settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Which backend holds the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One file per key under `dir`.
    #[default]
    File,
    /// Process memory; nothing survives the command.
    Memory,
}

impl StorageKind {
    /// Name as written in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "file",
            StorageKind::Memory => "memory",
        }
    }

    /// Parse a backend name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(StorageKind::File),
            "memory" => Some(StorageKind::Memory),
            _ => None,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind (default: file).
    #[serde(default)]
    pub backend: StorageKind,

    /// Storage directory, relative to the config file.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Key the cart state is stored under.
    #[serde(default = "default_state_key")]
    pub key: String,
}

fn default_dir() -> String {
    ".shopcart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::File,
            dir: default_dir(),
            key: default_state_key(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage directory against a base directory.
    pub fn resolve_dir(&self, base: &Path) -> PathBuf {
        let dir = Path::new(&self.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.join(dir)
        }
    }

    /// Open the configured backend.
    pub fn open_backend(&self, base: &Path) -> Result<Box<dyn Backend>> {
        Ok(match self.backend {
            StorageKind::File => {
                let dir = self.resolve_dir(base);
                let backend = FileBackend::open(&dir)
                    .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
                Box::new(backend)
            }
            StorageKind::Memory => Box::new(MemoryBackend::new()),
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (for development).
    #[default]
    Text,
    /// JSON lines (for log aggregation).
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Text,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Symbol printed before prices.
    #[serde(default = "default_symbol")]
    pub currency_symbol: String,
}

fn default_symbol() -> String {
    "$".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_symbol(),
        }
    }
}

/// Generate a default shopcart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Cart store configuration

[storage]
backend = "file"
dir = "{dir}"
key = "{key}"

[logging]
# Overridden by RUST_LOG when set
level = "warn"
format = "text"

[display]
currency_symbol = "$"
"#,
        dir = default_dir(),
        key = default_state_key(),
    )
}
