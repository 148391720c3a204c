//! The process-wide registry.
//!
//! Lifecycle: nothing is readable until `initialize` runs the registration
//! closure, freezes the result, and publishes it. Publication happens once;
//! afterwards lookups are plain reads of immutable data from any thread.
//!
//! ```
//! use opschema_registry::{global, operator_schema};
//!
//! global::initialize(|reg| {
//!     operator_schema!(reg, Relu)
//!         .num_inputs(1)
//!         .num_outputs(1)
//!         .allow_one_to_one_inplace();
//! })
//! .unwrap();
//!
//! assert!(global::lookup("Relu").is_some());
//! assert!(global::lookup("Conv").is_none());
//! ```

use once_cell::sync::OnceCell;

use opschema_core::config::SchemaConfig;
use opschema_rules::OpSchema;

use crate::error::{Error, Result};
use crate::registry::{SchemaRegistry, SchemaRegistryBuilder};

static GLOBAL: OnceCell<SchemaRegistry> = OnceCell::new();

/// Run the registration phase with a config read from the environment.
pub fn initialize<F>(register: F) -> Result<&'static SchemaRegistry>
where
    F: FnOnce(&mut SchemaRegistryBuilder),
{
    initialize_with_config(SchemaConfig::from_env(), register)
}

/// Run the registration phase, freeze, and publish the process-wide registry.
///
/// Fails with `AlreadyInitialized` if a registry was already published (the
/// closure is not run in that case), or with the error from `freeze`.
pub fn initialize_with_config<F>(config: SchemaConfig, register: F) -> Result<&'static SchemaRegistry>
where
    F: FnOnce(&mut SchemaRegistryBuilder),
{
    if GLOBAL.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let mut builder = SchemaRegistryBuilder::with_config(config);
    register(&mut builder);
    let registry = builder.freeze()?;

    // A concurrent initializer may have won between the check and here.
    let published = GLOBAL
        .try_insert(registry)
        .map_err(|_| Error::AlreadyInitialized)?;

    #[cfg(feature = "tracing")]
    tracing::info!(schemas = published.len(), "published process-wide schema registry");

    Ok(published)
}

/// The published registry, or `NotInitialized`.
pub fn registry() -> Result<&'static SchemaRegistry> {
    GLOBAL.get().ok_or(Error::NotInitialized)
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Schema for `name` in the published registry.
///
/// `None` if the name is unregistered or nothing has been published yet.
pub fn lookup(name: &str) -> Option<&'static OpSchema> {
    GLOBAL.get()?.lookup(name)
}
