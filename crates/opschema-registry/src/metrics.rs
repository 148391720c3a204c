//! Metrics/tracing hooks.
//!
//! Wire these up to a subscriber in the binary layer; without the `tracing`
//! feature they compile to nothing.

#[cfg(feature = "tracing")]
pub fn emit_event(event: &str, key_values: &[(&str, String)]) {
    let _span = tracing::span!(tracing::Level::TRACE, "opschema", event).entered();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_event(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}
