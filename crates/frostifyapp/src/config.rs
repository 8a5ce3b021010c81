//! # Configuration
//!
//! Frostify configuration is loaded with [`confique`], layering environment variables
//! over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `FROSTIFY_ORDER_ID_TAG`.
//! 2. **Config file**: the path passed to [`load_config`], usually
//!    [`default_config_path`] (`frostify.toml` in the OS config directory).
//! 3. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `order_id_tag` | `OS` | Tag in front of service order numbers (`OS-123456`) |
//! | `service_types` | see [`DEFAULT_SERVICE_TYPES`] | Closed catalog of service categories |
//!
//! ## Example
//!
//! ```toml
//! order_id_tag = "OS"
//! service_types = ["Installation", "Repair", "Cleaning"]
//! ```

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{FrostifyError, Result};
use crate::ids::is_valid_order_tag;

pub const CONFIG_FILE_NAME: &str = "frostify.toml";

pub const DEFAULT_SERVICE_TYPES: [&str; 7] = [
    "Preventive maintenance",
    "Corrective maintenance",
    "Installation",
    "Repair",
    "Urgent repair",
    "Cleaning",
    "Refrigerant recharge",
];

fn default_service_types() -> Vec<String> {
    DEFAULT_SERVICE_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Configuration for frostify, stored in `frostify.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrostifyConfig {
    /// Tag placed before service order numbers, e.g. "OS" gives "OS-123456".
    #[config(default = "OS", env = "FROSTIFY_ORDER_ID_TAG")]
    pub order_id_tag: String,

    /// Catalog of service types an order may use.
    /// When absent, defaults to the seven built-in categories.
    pub service_types: Option<Vec<String>>,
}

impl Default for FrostifyConfig {
    fn default() -> Self {
        Self {
            order_id_tag: "OS".to_string(),
            service_types: None,
        }
    }
}

impl FrostifyConfig {
    /// Get the service types, using defaults if not configured.
    pub fn service_types(&self) -> Vec<String> {
        self.service_types
            .clone()
            .unwrap_or_else(default_service_types)
    }

    pub fn catalog(&self) -> ServiceCatalog {
        ServiceCatalog::new(self.service_types())
    }

    /// Checks values confique cannot: the order tag must be one or more ASCII letters.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_order_tag(&self.order_id_tag) {
            return Err(FrostifyError::InvalidOrderTag(self.order_id_tag.clone()));
        }
        Ok(())
    }
}

/// Loads configuration from the environment, then `path` (if given and present), then defaults.
pub fn load_config(path: Option<&Path>) -> Result<FrostifyConfig> {
    let mut builder = FrostifyConfig::builder().env();
    if let Some(path) = path {
        builder = builder.file(path);
    }
    let config = builder.load()?;
    config.validate()?;
    tracing::debug!(?path, order_id_tag = %config.order_id_tag, "configuration loaded");
    Ok(config)
}

/// `frostify.toml` inside the platform's config directory, if one can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "frostify").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// The closed list of service categories an order may be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCatalog {
    types: Vec<String>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::new(default_service_types())
    }
}

impl ServiceCatalog {
    /// Builds a catalog, dropping blank and duplicate entries while keeping order.
    pub fn new(types: Vec<String>) -> Self {
        let mut kept: Vec<String> = Vec::with_capacity(types.len());
        for t in types {
            let t = t.trim().to_string();
            if !t.is_empty() && !kept.contains(&t) {
                kept.push(t);
            }
        }
        Self { types: kept }
    }

    pub fn contains(&self, service_type: &str) -> bool {
        self.types.iter().any(|t| t == service_type)
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
