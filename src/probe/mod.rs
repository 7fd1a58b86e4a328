//! Probe result model and the sequential probe runner.
//!
//! The runner walks the catalog in order, one model at a time: resolve the
//! category fixture, invoke the transport, decode the reply, pause, repeat.
//! Every (target, usable-fixture) pair yields exactly one [`ProbeResult`];
//! categories without a usable fixture yield one `Skipped` result per target
//! and zero network calls.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, ModelCategory, ProbeTarget};
use crate::decoder;
use crate::fixture::{Fixture, FixtureRegistry};
use crate::transport::{ToolTransport, TransportError};
use crate::util::truncate_with_ellipsis;

// ---------------------------------------------------------------------------
// ProbeStatus / OutputShape / ProbeResult
// ---------------------------------------------------------------------------

/// Outcome kind of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The call round-tripped and returned content, structured or not.
    Success,
    /// Transport failure, RPC error reply, or empty content.
    Failed,
    /// No usable fixture for the category; no call was made.
    Skipped,
}

/// Coarse structural fingerprint of a reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputShape {
    /// Body parsed as a JSON object; the set is its top-level keys.
    Structured(BTreeSet<String>),
    /// Body present but not a JSON object (e.g. a base64 blob).
    RawText,
    /// No output observed (failed or skipped probe).
    Absent,
}

impl OutputShape {
    pub fn fields(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Structured(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Immutable outcome of probing one target. Built once per target per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Full namespaced model identifier.
    pub model_id: String,
    /// Category the target was probed under.
    pub category: ModelCategory,
    pub status: ProbeStatus,
    /// Field names of the input payload actually sent. Empty for skips.
    pub input_fields: Vec<String>,
    pub output_shape: OutputShape,
    /// Error message, already truncated for display.
    pub error: Option<String>,
    /// Compute cost reported by the trailing reply annotation, when present.
    pub neurons_used: Option<u64>,
    /// Short sample of the response body.
    pub response_sample: Option<String>,
}

impl ProbeResult {
    /// A `Failed` result with no observed output.
    pub fn failed(target: &ProbeTarget, input_fields: Vec<String>, error: String) -> Self {
        Self {
            model_id: target.model_id.clone(),
            category: target.category,
            status: ProbeStatus::Failed,
            input_fields,
            output_shape: OutputShape::Absent,
            error: Some(error),
            neurons_used: None,
            response_sample: None,
        }
    }

    /// A `Skipped` result for a target in a fixture-less category.
    pub fn skipped(target: &ProbeTarget) -> Self {
        Self {
            model_id: target.model_id.clone(),
            category: target.category,
            status: ProbeStatus::Skipped,
            input_fields: Vec::new(),
            output_shape: OutputShape::Absent,
            error: None,
            neurons_used: None,
            response_sample: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Inter-call pacing strategy.
///
/// Pacing is rate-limit courtesy toward the remote service, not a
/// correctness mechanism; tests use [`NoopPacer`] to run at full speed.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Default delay between calls, in milliseconds.
pub const DEFAULT_PACE_MS: u64 = 200;

/// Sleeps a fixed interval between calls.
pub struct IntervalPacer {
    delay: Duration,
}

impl IntervalPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for IntervalPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PACE_MS))
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No delay at all.
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}

// ---------------------------------------------------------------------------
// ProbeError
// ---------------------------------------------------------------------------

/// Configuration-level failure. The only error that aborts a run, and it is
/// raised before any probe executes.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The catalog references a category the fixture registry does not know.
    #[error("catalog category '{0}' has no fixture registry entry")]
    UnknownCategory(ModelCategory),
}

// ---------------------------------------------------------------------------
// ProbeRunner
// ---------------------------------------------------------------------------

/// Sequential probe driver.
///
/// Owns the transport and the accumulating result list for the duration of a
/// run; nothing is shared across runs.
pub struct ProbeRunner<T, P = IntervalPacer> {
    transport: T,
    fixtures: FixtureRegistry,
    pacer: P,
}

impl<T: ToolTransport> ProbeRunner<T, IntervalPacer> {
    pub fn new(transport: T, fixtures: FixtureRegistry) -> Self {
        Self {
            transport,
            fixtures,
            pacer: IntervalPacer::default(),
        }
    }
}

impl<T: ToolTransport, P: Pacer> ProbeRunner<T, P> {
    /// Builder: replace the pacing strategy.
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> ProbeRunner<T, Q> {
        ProbeRunner {
            transport: self.transport,
            fixtures: self.fixtures,
            pacer,
        }
    }

    /// Probe every target in catalog order and collect the results.
    ///
    /// # Errors
    ///
    /// Only [`ProbeError::UnknownCategory`], detected before the first
    /// network call. Individual probe failures become `Failed` results.
    pub async fn run(&mut self, catalog: &Catalog) -> Result<Vec<ProbeResult>, ProbeError> {
        // Consistency check up front: the registry must know every catalog
        // category before anything goes on the wire.
        for entry in catalog.entries() {
            if self.fixtures.get(entry.category).is_none() {
                return Err(ProbeError::UnknownCategory(entry.category));
            }
        }

        log::info!(
            "probing {} models across {} categories",
            catalog.target_count(),
            catalog.category_count()
        );

        let mut results = Vec::with_capacity(catalog.target_count());

        for entry in catalog.entries() {
            let fixture = match self.fixtures.get(entry.category) {
                Some(fixture) => fixture.clone(),
                None => return Err(ProbeError::UnknownCategory(entry.category)),
            };

            match fixture {
                Fixture::Unavailable => {
                    log::warn!(
                        "⚠️  {} ({} models): skipped, requires input the harness cannot synthesize",
                        entry.category,
                        entry.targets.len()
                    );
                    for target in &entry.targets {
                        results.push(ProbeResult::skipped(target));
                    }
                }
                Fixture::Payload(payload) => {
                    log::info!("{} ({} models):", entry.category, entry.targets.len());
                    for target in &entry.targets {
                        let result = match self.transport.invoke(&target.model_id, &payload).await
                        {
                            Ok(reply) => decoder::decode(&reply, target, &payload),
                            Err(err) => failed_transport(target, &payload, &err),
                        };
                        log_outcome(&result);
                        results.push(result);
                        self.pacer.pause().await;
                    }
                }
            }
        }

        Ok(results)
    }
}

/// Map a transport failure to one `Failed` result.
fn failed_transport(
    target: &ProbeTarget,
    payload: &serde_json::Map<String, serde_json::Value>,
    err: &TransportError,
) -> ProbeResult {
    ProbeResult::failed(
        target,
        payload.keys().cloned().collect(),
        truncate_with_ellipsis(&err.to_string(), decoder::MAX_ERROR_LEN),
    )
}

/// One line of immediate feedback per probe.
fn log_outcome(result: &ProbeResult) {
    match result.status {
        ProbeStatus::Success => match result.neurons_used {
            Some(n) => log::info!("  ✅ {} ({} neurons)", result.model_id, n),
            None => log::info!("  ✅ {}", result.model_id),
        },
        ProbeStatus::Failed => log::info!(
            "  ❌ {}: {}",
            result.model_id,
            result.error.as_deref().unwrap_or("unknown error")
        ),
        ProbeStatus::Skipped => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
