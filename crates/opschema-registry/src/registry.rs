//! Registration phase (`SchemaRegistryBuilder`) and read phase (`SchemaRegistry`).

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use opschema_core::config::{SchemaConfig, ValidationMode};
use opschema_core::def::OperatorInstance;
use opschema_core::location::SourceLocation;
use opschema_rules::error::SchemaDefect;
use opschema_rules::{OpSchema, SchemaViolation};

use crate::error::{Error, Result};
use crate::metrics::emit_event;
use crate::report::{FailureKind, OperatorReport};

/// Collects schemas during startup. Consumed by `freeze`.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<String, OpSchema>,
    config: SchemaConfig,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Insert an unconstrained schema for `name` and hand it back for
    /// configuration. A name can be registered only once.
    pub fn try_register(
        &mut self,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> Result<&mut OpSchema> {
        match self.schemas.entry(name.into()) {
            Entry::Occupied(existing) => Err(Error::DuplicateRegistration {
                name: existing.key().clone(),
                location,
                original: existing.get().location().clone(),
            }),
            Entry::Vacant(slot) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(name = %slot.key(), %location, "registered operator schema");
                Ok(slot.insert(OpSchema::new(location)))
            }
        }
    }

    /// Like `try_register`, but a duplicate name aborts the process after
    /// reporting both registration sites. Duplicate schemas are a build-time
    /// bug, not a condition to recover from.
    pub fn register(&mut self, name: impl Into<String>, location: SourceLocation) -> &mut OpSchema {
        match self.try_register(name, location) {
            Ok(schema) => schema,
            Err(err) => fatal(&err),
        }
    }

    /// End the registration phase.
    ///
    /// Fails if the config is unusable or any schema enforces an in-place
    /// pair it does not allow. Schemas are checked in name order so the
    /// reported failure is deterministic.
    pub fn freeze(self) -> Result<SchemaRegistry> {
        self.config.validate()?;

        let mut names: Vec<&String> = self.schemas.keys().collect();
        names.sort();
        for name in names {
            let schema = &self.schemas[name];
            if let Err(SchemaDefect::EnforcedNotAllowed { input, output }) =
                schema.validate(self.config.alias_probe_limit)
            {
                let err = Error::InvalidSchema {
                    name: name.clone(),
                    location: schema.location().clone(),
                    input,
                    output,
                };
                #[cfg(feature = "tracing")]
                tracing::error!(%err, "schema registry rejected");
                return Err(err);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(schemas = self.schemas.len(), "schema registry frozen");
        emit_event("registry_frozen", &[("schemas", self.schemas.len().to_string())]);

        Ok(SchemaRegistry {
            schemas: self.schemas,
            config: self.config,
        })
    }
}

fn fatal(err: &Error) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(%err, "fatal schema registration error");
    eprintln!("{err}");
    std::process::abort()
}

/// Frozen, read-only registry.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<String, OpSchema>,
    config: SchemaConfig,
}

impl SchemaRegistry {
    /// Schema registered for `name`. Absence is a normal outcome.
    pub fn lookup(&self, name: &str) -> Option<&OpSchema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Output count an operator of type `name` produces for `num_input` inputs.
    /// `None` if the type is unknown or its schema has no output calculator.
    pub fn calculate_output(&self, name: &str, num_input: usize) -> Option<usize> {
        self.lookup(name)?.calculate_output(num_input)
    }

    /// Check one instance against the schema for its type.
    ///
    /// `None` means no schema is registered for the type; the caller decides
    /// whether that is acceptable.
    pub fn check<I: OperatorInstance + ?Sized>(
        &self,
        def: &I,
    ) -> Option<std::result::Result<(), SchemaViolation>> {
        self.lookup(def.op_type()).map(|schema| schema.check(def))
    }

    /// Boolean verification using the configured `ValidationMode` for
    /// unknown operator types.
    pub fn verify<I: OperatorInstance + ?Sized>(&self, def: &I) -> bool {
        match self.check(def) {
            Some(result) => result.is_ok(),
            None => self.config.validation_mode == ValidationMode::Permissive,
        }
    }

    /// Validate every instance in `defs` and collect all failures, treating
    /// unknown operator types per the configured `ValidationMode`.
    pub fn validate_all<'a, I, D>(&self, defs: D) -> std::result::Result<(), Vec<OperatorReport>>
    where
        I: OperatorInstance + 'a,
        D: IntoIterator<Item = &'a I>,
    {
        self.validate_all_with_mode(defs, self.config.validation_mode)
    }

    /// Like `validate_all`, with `mode` overriding the configured mode.
    pub fn validate_all_with_mode<'a, I, D>(
        &self,
        defs: D,
        mode: ValidationMode,
    ) -> std::result::Result<(), Vec<OperatorReport>>
    where
        I: OperatorInstance + 'a,
        D: IntoIterator<Item = &'a I>,
    {
        let mut failures = Vec::new();
        let mut checked = 0usize;

        for (index, def) in defs.into_iter().enumerate() {
            checked += 1;
            let kind = match self.check(def) {
                Some(Ok(())) => continue,
                Some(Err(violation)) => FailureKind::Violation(violation),
                None if mode == ValidationMode::Strict => FailureKind::UnknownOperatorType,
                None => continue,
            };
            failures.push(OperatorReport {
                index,
                op_type: def.op_type().to_string(),
                name: def.name().to_string(),
                kind,
            });
        }

        emit_event(
            "batch_validated",
            &[
                ("checked", checked.to_string()),
                ("failed", failures.len().to_string()),
            ],
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}
