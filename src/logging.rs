//! Diagnostic side channel of the composer.
//!
//! The composer never logs on its own; it reports progress to the
//! [`ComposeLogger`] it was built with. [`TracingLogger`] forwards to
//! `tracing` at debug level, [`NoopLogger`] drops everything.

use std::time::Duration;

use tracing::debug;

pub trait ComposeLogger {
    /// A query is about to be composed.
    fn compose_started(&self, _sobject: &str) {}

    /// `clause` was appended; `soql` is the text composed so far.
    fn clause_composed(&self, clause: &str, soql: &str);

    /// The top-level query is complete.
    fn compose_finished(&self, _soql: &str, _elapsed: Duration) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ComposeLogger for NoopLogger {
    fn clause_composed(&self, _clause: &str, _soql: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ComposeLogger for TracingLogger {
    fn compose_started(&self, sobject: &str) {
        debug!(target: "soql::composer", sobject, "Composing query");
    }

    fn clause_composed(&self, clause: &str, soql: &str) {
        debug!(target: "soql::composer", clause, soql, "Current SOQL");
    }

    fn compose_finished(&self, soql: &str, elapsed: Duration) {
        debug!(
            target: "soql::composer",
            elapsed_us = elapsed.as_micros() as u64,
            len = soql.len(),
            "Composed query"
        );
    }
}

/// Logger matching the `logging` switch of a configuration.
pub fn logger_for(logging: bool) -> Box<dyn ComposeLogger> {
    if logging {
        Box::new(TracingLogger)
    } else {
        Box::new(NoopLogger)
    }
}
