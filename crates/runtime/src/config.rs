//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! event_buffer_size = 64
//! seed = 1234
//!
//! [rules]
//! contact_combat_skill = "Brawl"
//! unarmed_damage = "STR+1"
//! ```
//!
//! Every key is optional; missing keys keep their defaults.
use std::path::{Path, PathBuf};

use rules_core::RulesConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid runtime config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid unarmed damage expression `{0}`")]
    UnarmedDamage(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Seed of the default dice roller. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            event_buffer_size: 100,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Checks values that serde cannot, such as the unarmed damage expression.
    pub fn validate(&self) -> Result<(), ConfigError> {
        rules_core::DamageValue::parse(&self.rules.unarmed_damage)
            .map(|_| ())
            .map_err(|_| ConfigError::UnarmedDamage(self.rules.unarmed_damage.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(RuntimeConfig::from_toml_str("").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn partial_rules_table_keeps_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            seed = 99

            [rules]
            contact_combat_skill = "Brawl"
            base_light_boxes = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.rules.contact_combat_skill, "Brawl");
        assert_eq!(config.rules.base_light_boxes, 3);
        assert_eq!(config.rules.default_spell_skill, RulesConfig::DEFAULT_SPELL_SKILL);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            RuntimeConfig::from_toml_str("event_buffer_size = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_toml_str("[rules]\nunarmed_damage = \" \""),
            Err(ConfigError::UnarmedDamage(_))
        ));
    }
}
