//! Response-rewriting filter for HTTP pipelines.
//!
//! The filter wraps a downstream handler, buffers the complete response it
//! produces, and applies an ordered list of regex substitutions to the body
//! and to every header value. Rewriting only happens for responses that
//! declare a textual content type (`text/*`, `application/json`,
//! `application/xml`); everything else passes through byte-identical.
//!
//! Rules compose sequentially: each rule operates on the output of the
//! previous one, so a later rule can match text introduced by an earlier
//! replacement. Every rule performs a global substitution (all
//! non-overlapping matches).
//!
//! ## Configuration Example
//!
//! ```yaml
//! replacements:
//!   - pattern: "hello"
//!     replacement: "Hi"
//!     flags: "i"
//!   - pattern: "internal-host:\\d+"
//!     replacement: "example.com"
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use rewrite_filter::{FilterConfig, RewriteFilter};
//!
//! # fn demo(upstream: Arc<dyn rewrite_filter::Handler>) -> Result<(), rewrite_filter::RuleError> {
//! let config = FilterConfig::from_yaml(
//!     "replacements:\n  - pattern: hello\n    replacement: Hi\n",
//! ).unwrap();
//! let filter = RewriteFilter::new(config, upstream, "rewrite")?;
//! # let _ = filter;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod filter;
pub mod handler;
pub mod header;
pub mod rule;

pub use capture::ResponseCapture;
pub use config::{ConfigError, FilterConfig, ReplacementConfig};
pub use filter::{FilterError, RewriteFilter, RewriteObserver, TracingObserver};
pub use handler::{Handler, HandlerError, Request, ResponseWriter};
pub use header::HeaderMap;
pub use rule::{CompiledRule, RuleError};
