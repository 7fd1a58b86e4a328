//! # modelprobe
//!
//! Batch probe harness for Workers AI models exposed behind an MCP
//! (JSON-RPC 2.0) endpoint.
//!
//! The harness walks a [`Catalog`] of model identifiers grouped by capability
//! category, pairs each category with a canned input from the
//! [`FixtureRegistry`], issues one `tools/call` per model over the
//! [`ToolTransport`], normalizes every reply into a [`ProbeResult`], and
//! aggregates the run into a [`RunReport`].
//!
//! Probing is strictly sequential: one call completes (or times out) before
//! the next begins, with a configurable pause between calls to stay inside
//! the remote service's rate limits. No individual probe failure aborts a
//! run; only a catalog/fixture configuration mismatch does, and that is
//! detected before the first network call.

pub mod catalog;
pub mod decoder;
pub mod fixture;
pub mod probe;
pub mod report;
pub mod transport;
pub mod util;

pub use catalog::{Catalog, ModelCategory, ProbeTarget};
pub use fixture::{Fixture, FixtureRegistry};
pub use probe::{
    IntervalPacer, NoopPacer, OutputShape, Pacer, ProbeError, ProbeResult, ProbeRunner,
    ProbeStatus,
};
pub use report::RunReport;
pub use transport::{HttpTransport, ToolTransport, TransportError};
