//! The response-rewriting filter.

use crate::capture::ResponseCapture;
use crate::config::{ConfigError, FilterConfig};
use crate::handler::{Handler, HandlerError, Request, ResponseWriter};
use crate::header::HeaderMap;
use crate::rule::{compile_rules, CompiledRule, RuleError};
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

/// Content-type prefixes eligible for rewriting.
const TEXTUAL_PREFIXES: [&str; 3] = ["text/", "application/json", "application/xml"];

/// Whether a declared content type is eligible for rewriting.
pub fn is_rewritable(content_type: &str) -> bool {
    TEXTUAL_PREFIXES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
}

/// Observer for effective rewrites.
///
/// Notified once per rule application that changed a body or a header
/// value. Diagnostics only; never consulted for control flow.
pub trait RewriteObserver: Send + Sync {
    /// A rule changed the response body.
    fn body_rewritten(&self, rule: &CompiledRule);

    /// A rule changed a value of the named header.
    fn header_rewritten(&self, header: &str, rule: &CompiledRule);
}

/// Default observer that logs rewrites through `tracing`.
pub struct TracingObserver;

impl RewriteObserver for TracingObserver {
    fn body_rewritten(&self, rule: &CompiledRule) {
        debug!(
            pattern = rule.pattern(),
            replacement = rule.replacement(),
            "Body replacement occurred"
        );
    }

    fn header_rewritten(&self, header: &str, rule: &CompiledRule) {
        debug!(
            header,
            pattern = rule.pattern(),
            replacement = rule.replacement(),
            "Header replacement occurred"
        );
    }
}

/// Response-rewriting filter.
///
/// Wraps a downstream [`Handler`]: buffers the full response it produces,
/// applies the compiled rules in order to the body and to every header
/// value when the content type is textual, recomputes `Content-Length`,
/// and flushes the result to the real sink. Implements [`Handler`] itself
/// so filters can be chained.
pub struct RewriteFilter {
    name: String,
    inner: Arc<dyn Handler>,
    rules: Vec<CompiledRule>,
    observer: Arc<dyn RewriteObserver>,
}

impl RewriteFilter {
    /// Build a filter around `inner` from configuration.
    ///
    /// Fails on the first invalid pattern; no partially-built filter is
    /// ever returned.
    pub fn new(
        config: FilterConfig,
        inner: Arc<dyn Handler>,
        name: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        let rules = compile_rules(&config.replacements)?;

        info!(
            filter = %name,
            rules = rules.len(),
            "Rewrite filter initialized"
        );

        Ok(Self {
            name,
            inner,
            rules,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Build a filter from a YAML configuration string.
    pub fn from_yaml(
        yaml: &str,
        inner: Arc<dyn Handler>,
        name: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let config = FilterConfig::from_yaml(yaml)?;
        Ok(Self::new(config, inner, name)?)
    }

    /// Build a filter from a JSON configuration string.
    pub fn from_json(
        json: &str,
        inner: Arc<dyn Handler>,
        name: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let config = FilterConfig::from_json(json)?;
        Ok(Self::new(config, inner, name)?)
    }

    /// Replace the rewrite observer (tests use this to capture events).
    pub fn with_observer(mut self, observer: Arc<dyn RewriteObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The filter instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled rules, in application order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Apply every rule in order to the body, each rule consuming the
    /// previous rule's output.
    fn rewrite_body(&self, mut body: String) -> String {
        for rule in &self.rules {
            if let Cow::Owned(next) = rule.apply(&body) {
                if next != body {
                    self.observer.body_rewritten(rule);
                }
                body = next;
            }
        }
        body
    }

    /// Rewrite every header value with every rule, in order.
    ///
    /// The map cannot be mutated while it is iterated, so the rewrite is
    /// staged: new value vectors are collected for all names first and only
    /// committed (remove then re-insert) after iteration completes. Value
    /// cardinality per name never changes.
    fn rewrite_headers(&self, headers: &mut HeaderMap) {
        let mut staged: Vec<(String, Vec<String>)> = Vec::new();

        for (name, values) in headers.iter() {
            // Content-Type is the eligibility gate, never a rewrite target.
            if name == "content-type" {
                continue;
            }

            let mut changed = false;
            let mut new_values = Vec::with_capacity(values.len());

            for value in values {
                let mut current = value.clone();
                for rule in &self.rules {
                    if let Cow::Owned(next) = rule.apply(&current) {
                        if next != current {
                            self.observer.header_rewritten(name, rule);
                            changed = true;
                        }
                        current = next;
                    }
                }
                new_values.push(current);
            }

            if changed {
                staged.push((name.clone(), new_values));
            }
        }

        for (name, values) in staged {
            headers.remove(&name);
            for value in values {
                headers.add(&name, value);
            }
        }
    }
}

#[async_trait]
impl Handler for RewriteFilter {
    async fn handle(
        &self,
        req: &mut Request,
        rw: &mut (dyn ResponseWriter + Send),
    ) -> Result<(), HandlerError> {
        // Force an uncompressed upstream response; patterns cannot safely
        // match compressed bytes.
        req.headers.remove("accept-encoding");

        let mut capture = ResponseCapture::new();
        self.inner.handle(req, &mut capture).await?;

        let (status, mut headers, body) = capture.into_parts();

        let eligible = headers.get("content-type").is_some_and(is_rewritable);

        let body = if eligible && !self.rules.is_empty() {
            match String::from_utf8(body) {
                Ok(text) => self.rewrite_body(text).into_bytes(),
                // Declared textual but not valid UTF-8: leave it untouched.
                Err(err) => err.into_bytes(),
            }
        } else {
            body
        };

        if eligible {
            self.rewrite_headers(&mut headers);
        }

        // Always recomputed, even for pass-through responses, so framing
        // matches the final body.
        headers.set("content-length", body.len().to_string());

        rw.set_status(status);
        *rw.headers_mut() = headers;
        rw.write(&body);
        Ok(())
    }
}

/// Errors that can occur while constructing a filter from raw configuration.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}
