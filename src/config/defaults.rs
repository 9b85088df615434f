//! Default configuration values for razor-tokens.

use super::settings::{SemanticTokensConfig, SemanticTokensSettings};

pub const DEFAULT_MAX_ENTRIES_PER_KEY: usize = 5;
pub const DEFAULT_EMBEDDED_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_MAX_DIFF_DISTANCE: usize = 1_024;

/// Returns the resolved default settings.
pub fn default_settings() -> SemanticTokensSettings {
    SemanticTokensSettings {
        max_entries_per_key: DEFAULT_MAX_ENTRIES_PER_KEY,
        color_code_background: true,
        embedded_timeout_ms: DEFAULT_EMBEDDED_TIMEOUT_MS,
        max_diff_distance: DEFAULT_MAX_DIFF_DISTANCE,
        minimal_delta: false,
    }
}

/// Returns the defaults in their user-facing form, with every field filled in.
///
/// Used to generate a commented configuration template.
pub fn default_config() -> SemanticTokensConfig {
    let settings = default_settings();
    SemanticTokensConfig {
        max_entries_per_key: Some(settings.max_entries_per_key),
        color_code_background: Some(settings.color_code_background),
        embedded_timeout_ms: Some(settings.embedded_timeout_ms),
        max_diff_distance: Some(settings.max_diff_distance),
        minimal_delta: Some(settings.minimal_delta),
    }
}
