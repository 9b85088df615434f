pub mod defaults;
pub mod settings;

pub use settings::{SemanticTokensConfig, SemanticTokensSettings};

use crate::error::{SemanticError, SemanticResult};

/// Merge two configs, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<SemanticTokensConfig>,
    primary: Option<SemanticTokensConfig>,
) -> Option<SemanticTokensConfig> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(SemanticTokensConfig {
            max_entries_per_key: primary
                .max_entries_per_key
                .or(fallback.max_entries_per_key),
            color_code_background: primary
                .color_code_background
                .or(fallback.color_code_background),
            embedded_timeout_ms: primary
                .embedded_timeout_ms
                .or(fallback.embedded_timeout_ms),
            max_diff_distance: primary.max_diff_distance.or(fallback.max_diff_distance),
            minimal_delta: primary.minimal_delta.or(fallback.minimal_delta),
        }),
    }
}

/// Parse a TOML config file body.
pub fn parse_toml(source: &str) -> SemanticResult<SemanticTokensConfig> {
    toml::from_str(source).map_err(|e| SemanticError::config(e.to_string()))
}

/// Parse a JSON value, e.g. the `semanticTokens` section of `initializationOptions`.
pub fn parse_json(value: serde_json::Value) -> SemanticResult<SemanticTokensConfig> {
    serde_json::from_value(value).map_err(|e| SemanticError::config(e.to_string()))
}

/// Layer the config sources and resolve them against the defaults.
pub fn resolve(
    file: Option<SemanticTokensConfig>,
    init_options: Option<SemanticTokensConfig>,
) -> SemanticResult<SemanticTokensSettings> {
    merge_settings(file, init_options)
        .unwrap_or_default()
        .try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_settings_with_none() {
        assert!(merge_settings(None, None).is_none());
    }

    #[test]
    fn test_merge_settings_fallback_only() {
        let fallback = SemanticTokensConfig {
            max_entries_per_key: Some(3),
            ..Default::default()
        };
        let merged = merge_settings(Some(fallback.clone()), None);
        assert_eq!(merged, Some(fallback));
    }

    #[test]
    fn test_merge_settings_prefer_primary() {
        let fallback = SemanticTokensConfig {
            max_entries_per_key: Some(3),
            color_code_background: Some(false),
            ..Default::default()
        };
        let primary = SemanticTokensConfig {
            max_entries_per_key: Some(8),
            ..Default::default()
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();
        assert_eq!(merged.max_entries_per_key, Some(8));
        assert_eq!(merged.color_code_background, Some(false));
        assert_eq!(merged.embedded_timeout_ms, None);
    }

    #[test]
    fn test_parse_toml() {
        let config = parse_toml(
            r#"
            maxEntriesPerKey = 2
            colorCodeBackground = false
            "#,
        )
        .unwrap();
        assert_eq!(config.max_entries_per_key, Some(2));
        assert_eq!(config.color_code_background, Some(false));
    }

    #[test]
    fn test_parse_toml_rejects_unknown_keys() {
        let err = parse_toml("maxEntries = 2").unwrap_err();
        assert!(matches!(err, SemanticError::Config { .. }));
    }

    #[test]
    fn test_parse_json() {
        let config = parse_json(json!({ "embeddedTimeoutMs": 250 })).unwrap();
        assert_eq!(config.embedded_timeout_ms, Some(250));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = resolve(None, None).unwrap();
        assert_eq!(settings, defaults::default_settings());
        assert_eq!(settings.max_entries_per_key, 5);
    }

    #[test]
    fn test_minimal_delta_selects_strategy() {
        use crate::analysis::semantic::DeltaStrategy;

        let settings = resolve(None, None).unwrap();
        assert_eq!(settings.delta_strategy(), DeltaStrategy::PrefixSuffix);

        let config = parse_json(json!({ "minimalDelta": true, "maxDiffDistance": 64 })).unwrap();
        let settings = resolve(None, Some(config)).unwrap();
        assert_eq!(
            settings.delta_strategy(),
            DeltaStrategy::Minimal { max_distance: 64 }
        );
    }

    #[test]
    fn test_resolve_rejects_zero_capacity() {
        let config = SemanticTokensConfig {
            max_entries_per_key: Some(0),
            ..Default::default()
        };
        let err = resolve(Some(config), None).unwrap_err();
        assert!(matches!(err, SemanticError::Config { .. }));
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let rendered = toml::to_string(&defaults::default_config()).unwrap();
        let parsed = parse_toml(&rendered).unwrap();
        assert_eq!(parsed, defaults::default_config());
    }
}
