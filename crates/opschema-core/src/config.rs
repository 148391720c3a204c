//! Schema-checking configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How batch validation treats operator types that never registered a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Unknown operator types are accepted as-is.
    #[default]
    Permissive,
    /// Unknown operator types are reported as violations.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Upper bound on slot indices probed when checking that every enforced
    /// in-place pair is also allowed, for relations that cannot be enumerated.
    /// Arity upper bounds tighten this window when they are known.
    pub alias_probe_limit: usize,

    /// Treatment of operator types without a registered schema.
    pub validation_mode: ValidationMode,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            alias_probe_limit: 64,
            validation_mode: ValidationMode::Permissive,
        }
    }
}

impl SchemaConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `OPSCHEMA_ALIAS_PROBE_LIMIT`: probe window for enforced/allowed checks
    /// - `OPSCHEMA_STRICT`: `1`/`true` rejects unknown operator types
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("OPSCHEMA_ALIAS_PROBE_LIMIT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.alias_probe_limit = v;
            }
        }

        if let Ok(s) = std::env::var("OPSCHEMA_STRICT") {
            if let Some(strict) = parse_flag(&s) {
                cfg.validation_mode = if strict {
                    ValidationMode::Strict
                } else {
                    ValidationMode::Permissive
                };
            }
        }

        cfg
    }

    pub fn strict(mut self) -> Self {
        self.validation_mode = ValidationMode::Strict;
        self
    }

    pub fn with_alias_probe_limit(mut self, limit: usize) -> Self {
        self.alias_probe_limit = limit;
        self
    }

    /// Reject settings that would make finalization checks vacuous.
    pub fn validate(&self) -> Result<()> {
        if self.alias_probe_limit == 0 {
            return Err(Error::Config(
                "alias_probe_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
