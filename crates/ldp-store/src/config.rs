use std::path::Path;

use ldp_types::{vocab, Identifier, InteractionModel};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration shared by the binary and resource services.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration:
///
/// ```toml
/// base = "ldp:data/"
/// shards = 16
/// interaction_models = ["rdf-source", "non-rdf-source", "container", "basic-container"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix of every generated identifier.
    pub base: String,
    /// Number of independently locked shards per index.
    pub shards: usize,
    /// Interaction models the resource service advertises.
    pub interaction_models: Vec<InteractionModel>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base: vocab::DATA_PREFIX.to_string(),
            shards: 16,
            interaction_models: vec![
                InteractionModel::RdfSource,
                InteractionModel::NonRdfSource,
                InteractionModel::Container,
                InteractionModel::BasicContainer,
            ],
        }
    }
}

impl StoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check the invariants the services rely on.
    pub fn validate(&self) -> StoreResult<()> {
        if self.shards == 0 {
            return Err(StoreError::Config("shards must be at least 1".into()));
        }
        if self.interaction_models.is_empty() {
            return Err(StoreError::Config(
                "at least one interaction model must be supported".into(),
            ));
        }
        if self.base.contains('#') {
            return Err(StoreError::Config(format!(
                "base {:?} must not contain a fragment",
                self.base
            )));
        }
        Identifier::new(self.base.as_str())?;
        Ok(())
    }
}
