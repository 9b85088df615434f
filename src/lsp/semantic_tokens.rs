//! Semantic token request orchestration.
//!
//! `SemanticTokensService` ties the pieces together for the three LSP
//! requests: it collects host ranges, waits for the embedded provider,
//! encodes, diffs against the cached previous result, mints a result id and
//! stores the new array. Nothing is cached until a result is complete, and a
//! request that was cancelled or superseded by then leaves the cache untouched.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{
    Range, SemanticTokens, SemanticTokensFullDeltaResult, SemanticTokensLegend,
};
use url::Url;

use crate::analysis::semantic::{
    self, EmbeddedRangeProvider, TokenArray, calculate_semantic_tokens_delta,
    collect_host_ranges, encode_cancellable, fetch_embedded_ranges, merge_ranges,
};
use crate::analysis::{ResultId, next_result_id};
use crate::config::SemanticTokensSettings;
use crate::document::RazorDocument;
use crate::error::{SemanticError, SemanticResult};

use super::cache::ResultCache;
use super::semantic_request_tracker::{SemanticRequestTracker, TrackedRequest};

/// Serves `semanticTokens/full`, `/full/delta` and `/range` for Razor documents.
pub struct SemanticTokensService<P> {
    provider: P,
    settings: ArcSwap<SemanticTokensSettings>,
    cache: ResultCache<Url>,
    requests: SemanticRequestTracker,
}

impl<P> std::fmt::Debug for SemanticTokensService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticTokensService")
            .field("settings", &self.settings.load())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<P: EmbeddedRangeProvider> SemanticTokensService<P> {
    pub fn new(provider: P, settings: SemanticTokensSettings) -> SemanticResult<Self> {
        settings.validate()?;
        Ok(Self {
            provider,
            cache: ResultCache::new(settings.max_entries_per_key)?,
            settings: ArcSwap::new(Arc::new(settings)),
            requests: SemanticRequestTracker::new(),
        })
    }

    pub fn settings(&self) -> Arc<SemanticTokensSettings> {
        self.settings.load_full()
    }

    /// Replace the settings; the cache bound follows `max_entries_per_key`.
    pub fn apply_settings(&self, settings: SemanticTokensSettings) -> SemanticResult<()> {
        settings.validate()?;
        self.cache
            .set_max_entries_per_key(settings.max_entries_per_key)?;
        log::info!(
            target: "razor_tokens::settings",
            "Applied semantic token settings: {:?}",
            settings
        );
        self.settings.store(Arc::new(settings));
        Ok(())
    }

    pub fn legend(&self) -> SemanticTokensLegend {
        semantic::legend()
    }

    pub fn cache(&self) -> &ResultCache<Url> {
        &self.cache
    }

    /// Forget everything about a closed document.
    pub fn did_close(&self, uri: &Url) -> SemanticResult<()> {
        self.requests.cancel_all_for_uri(uri);
        self.cache.remove_key(uri)?;
        Ok(())
    }

    /// Handle `semanticTokens/full`.
    ///
    /// `Ok(None)` means the embedded ranges are not synchronized yet; the
    /// client should retry later.
    pub async fn full(
        &self,
        document: &RazorDocument,
        cancel: &CancellationToken,
    ) -> SemanticResult<Option<SemanticTokens>> {
        let request = self.requests.start_request(document.uri(), cancel);
        let result = self.full_inner(document, &request).await;
        self.requests.finish_request(document.uri(), request.id);
        result
    }

    async fn full_inner(
        &self,
        document: &RazorDocument,
        request: &TrackedRequest,
    ) -> SemanticResult<Option<SemanticTokens>> {
        let Some(tokens) = self.compute(document, None, &request.cancel).await? else {
            return Ok(None);
        };
        let result_id = next_result_id();
        self.store(document.uri(), request, result_id.clone(), tokens.clone())?;

        log::debug!(
            target: "razor_tokens::semantic",
            "full: {} v{} -> {} tokens (result_id {})",
            document.uri(),
            document.version(),
            tokens.token_count(),
            result_id
        );

        Ok(Some(SemanticTokens {
            result_id: Some(result_id.into_string()),
            data: tokens.to_semantic_tokens(),
        }))
    }

    /// Handle `semanticTokens/full/delta`.
    ///
    /// Falls back to a full result when `previous_result_id` is unknown,
    /// evicted, or names an empty array.
    pub async fn full_delta(
        &self,
        document: &RazorDocument,
        previous_result_id: &str,
        cancel: &CancellationToken,
    ) -> SemanticResult<Option<SemanticTokensFullDeltaResult>> {
        let request = self.requests.start_request(document.uri(), cancel);
        let result = self
            .full_delta_inner(document, previous_result_id, &request)
            .await;
        self.requests.finish_request(document.uri(), request.id);
        result
    }

    async fn full_delta_inner(
        &self,
        document: &RazorDocument,
        previous_result_id: &str,
        request: &TrackedRequest,
    ) -> SemanticResult<Option<SemanticTokensFullDeltaResult>> {
        let Some(tokens) = self.compute(document, None, &request.cancel).await? else {
            return Ok(None);
        };

        let previous = self
            .cache
            .get(document.uri(), &ResultId::from(previous_result_id))?;
        if previous.is_none() {
            log::debug!(
                target: "razor_tokens::semantic",
                "delta: no cached result '{}' for {}, sending full",
                previous_result_id,
                document.uri()
            );
        }

        let result_id = next_result_id();
        let result = calculate_semantic_tokens_delta(
            previous.as_deref(),
            &tokens,
            Some(result_id.to_string()),
            self.settings.load().delta_strategy(),
            &request.cancel,
        )?;
        self.store(document.uri(), request, result_id, tokens)?;

        if let SemanticTokensFullDeltaResult::TokensDelta(delta) = &result {
            log::debug!(
                target: "razor_tokens::semantic",
                "delta: {} v{} -> {} edit(s) against '{}'",
                document.uri(),
                document.version(),
                delta.edits.len(),
                previous_result_id
            );
        }
        Ok(Some(result))
    }

    /// Handle `semanticTokens/range`.
    pub async fn range(
        &self,
        document: &RazorDocument,
        range: Range,
        cancel: &CancellationToken,
    ) -> SemanticResult<Option<SemanticTokens>> {
        // No result id and no cache entry: a range array cannot serve as the
        // base of a later full/delta request, which diffs whole documents.
        let tokens = self.compute(document, Some(range), cancel).await?;
        Ok(tokens.map(|tokens| SemanticTokens {
            result_id: None,
            data: tokens.to_semantic_tokens(),
        }))
    }

    async fn compute(
        &self,
        document: &RazorDocument,
        range: Option<Range>,
        cancel: &CancellationToken,
    ) -> SemanticResult<Option<TokenArray>> {
        let settings = self.settings.load_full();

        let host = collect_host_ranges(
            document.text(),
            document.root(),
            range,
            settings.color_code_background,
            cancel,
        )?;
        let embedded = fetch_embedded_ranges(
            &self.provider,
            document,
            range,
            settings.embedded_timeout(),
            cancel,
        )
        .await;
        if cancel.is_cancelled() {
            return Err(SemanticError::cancelled("embedded ranges"));
        }

        let Some(ranges) = merge_ranges(host, embedded, document.version()) else {
            return Ok(None);
        };
        encode_cancellable(&ranges, cancel).map(Some)
    }

    /// Cache `tokens` unless `request` was cancelled, superseded or closed
    /// while the result was being built.
    fn store(
        &self,
        uri: &Url,
        request: &TrackedRequest,
        result_id: ResultId,
        tokens: TokenArray,
    ) -> SemanticResult<()> {
        if request.cancel.is_cancelled() || !self.requests.is_active(uri, request.id) {
            log::debug!(
                target: "razor_tokens::semantic",
                "Dropping result of request {} for {}",
                request.id,
                uri
            );
            return Err(SemanticError::cancelled("store"));
        }
        self.cache.put(uri.clone(), result_id, tokens)
    }
}
