use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults;
use crate::analysis::semantic::DeltaStrategy;
use crate::error::{SemanticError, SemanticResult};

/// User-facing semantic token configuration as written in a config file or
/// sent through `initializationOptions`. Every field is optional so that
/// several sources can be layered with [`super::merge_settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SemanticTokensConfig {
    pub max_entries_per_key: Option<usize>,
    pub color_code_background: Option<bool>,
    pub embedded_timeout_ms: Option<u64>,
    pub max_diff_distance: Option<usize>,
    pub minimal_delta: Option<bool>,
}

/// Resolved settings used by the token pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTokensSettings {
    /// Number of token arrays remembered per cache key before the oldest is evicted.
    pub max_entries_per_key: usize,
    /// Apply the `razorCode` modifier to tokens inside embedded-code constructs.
    pub color_code_background: bool,
    /// How long to wait for the embedded-language provider.
    pub embedded_timeout_ms: u64,
    /// Edit-distance budget of the generalized diff.
    pub max_diff_distance: usize,
    /// Send one edit per changed region in `full/delta` responses instead of
    /// a single prefix/suffix replacement.
    pub minimal_delta: bool,
}

impl Default for SemanticTokensSettings {
    fn default() -> Self {
        defaults::default_settings()
    }
}

impl SemanticTokensSettings {
    pub fn embedded_timeout(&self) -> Duration {
        Duration::from_millis(self.embedded_timeout_ms)
    }

    pub fn delta_strategy(&self) -> DeltaStrategy {
        if self.minimal_delta {
            DeltaStrategy::Minimal {
                max_distance: self.max_diff_distance,
            }
        } else {
            DeltaStrategy::PrefixSuffix
        }
    }

    /// Check the invariants the cache and diff rely on.
    pub fn validate(&self) -> SemanticResult<()> {
        if self.max_entries_per_key == 0 {
            return Err(SemanticError::config("maxEntriesPerKey must be at least 1"));
        }
        if self.embedded_timeout_ms == 0 {
            return Err(SemanticError::config(
                "embeddedTimeoutMs must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl TryFrom<SemanticTokensConfig> for SemanticTokensSettings {
    type Error = SemanticError;

    fn try_from(config: SemanticTokensConfig) -> SemanticResult<Self> {
        let base = defaults::default_settings();
        let settings = SemanticTokensSettings {
            max_entries_per_key: config
                .max_entries_per_key
                .unwrap_or(base.max_entries_per_key),
            color_code_background: config
                .color_code_background
                .unwrap_or(base.color_code_background),
            embedded_timeout_ms: config
                .embedded_timeout_ms
                .unwrap_or(base.embedded_timeout_ms),
            max_diff_distance: config.max_diff_distance.unwrap_or(base.max_diff_distance),
            minimal_delta: config.minimal_delta.unwrap_or(base.minimal_delta),
        };
        settings.validate()?;
        Ok(settings)
    }
}
