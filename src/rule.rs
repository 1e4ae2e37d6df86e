//! Rule compilation.
//!
//! Turns declarative [`ReplacementConfig`](crate::config::ReplacementConfig)
//! entries into compiled, reusable substitution rules. Compilation is eager:
//! an invalid pattern fails construction before any request is served.

use crate::config::ReplacementConfig;
use regex::Regex;
use std::borrow::Cow;

/// A compiled pattern-substitution rule.
///
/// Immutable after construction and safe to share across concurrent
/// requests; `Regex` supports concurrent read-only matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The pattern as configured (without any inline flag prefix), kept for
    /// diagnostics.
    pattern: String,
    /// The compiled matcher.
    regex: Regex,
    /// Replacement template, inserted verbatim apart from capture group
    /// references.
    replacement: String,
}

impl CompiledRule {
    /// Compile a rule from its configuration.
    ///
    /// Case-insensitivity is applied by prefixing the pattern with the
    /// inline `(?i)` directive before compiling, so any sub-expressions
    /// keep their own case-sensitive capture semantics.
    pub fn compile(config: &ReplacementConfig) -> Result<Self, RuleError> {
        let pattern = match config.flags.as_str() {
            "" => config.pattern.clone(),
            "i" => format!("(?i){}", config.pattern),
            other => {
                return Err(RuleError::UnsupportedFlags {
                    pattern: config.pattern.clone(),
                    flags: other.to_string(),
                })
            }
        };

        let regex = Regex::new(&pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: config.pattern.clone(),
            source,
        })?;

        Ok(Self {
            pattern: config.pattern.clone(),
            regex,
            replacement: config.replacement.clone(),
        })
    }

    /// Apply the rule to `text`, replacing every non-overlapping match.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, self.replacement.as_str())
    }

    /// The configured pattern (without flag prefix).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Compile an ordered list of replacements.
///
/// Fails on the first invalid entry; no partial rule list is returned.
pub fn compile_rules(configs: &[ReplacementConfig]) -> Result<Vec<CompiledRule>, RuleError> {
    configs.iter().map(CompiledRule::compile).collect()
}

/// Errors that can occur during rule compilation.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported flags {flags:?} for pattern {pattern:?} (only \"i\" is supported)")]
    UnsupportedFlags { pattern: String, flags: String },
}
