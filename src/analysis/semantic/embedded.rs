//! Ranges contributed by the embedded (C#) language.
//!
//! The embedded language server is an external collaborator. It answers
//! asynchronously, already mapped to host coordinates, and may lag behind
//! the host document. A lagging or missing answer makes the whole result
//! unavailable: merging host ranges with a stale or absent embedded set would
//! flash uncolored code in the editor.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::Range;

use crate::document::RazorDocument;

use super::range::SemanticRange;

/// Outcome of asking the embedded provider for ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedRanges {
    /// Ranges computed against `version` of the host document.
    Synchronized {
        version: i32,
        ranges: Vec<SemanticRange>,
    },
    /// The provider has not caught up with the host document yet.
    NotSynchronized,
}

impl EmbeddedRanges {
    pub fn synchronized(version: i32, ranges: Vec<SemanticRange>) -> Self {
        EmbeddedRanges::Synchronized { version, ranges }
    }
}

/// Source of embedded-language ranges for a host document.
pub trait EmbeddedRangeProvider: Send + Sync {
    /// Fetch ranges for `document`, restricted to `range` when given.
    fn embedded_ranges(
        &self,
        document: &RazorDocument,
        range: Option<Range>,
        cancel: CancellationToken,
    ) -> impl Future<Output = EmbeddedRanges> + Send;
}

/// Provider for documents without embedded code: always in sync, never contributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbeddedRanges;

impl EmbeddedRangeProvider for NoEmbeddedRanges {
    async fn embedded_ranges(
        &self,
        document: &RazorDocument,
        _range: Option<Range>,
        _cancel: CancellationToken,
    ) -> EmbeddedRanges {
        EmbeddedRanges::synchronized(document.version(), Vec::new())
    }
}

/// Ask `provider` for ranges, bounded by `timeout` and `cancel`.
///
/// Timeouts and cancellation both surface as [`EmbeddedRanges::NotSynchronized`].
pub async fn fetch_embedded_ranges<P: EmbeddedRangeProvider>(
    provider: &P,
    document: &RazorDocument,
    range: Option<Range>,
    timeout: Duration,
    cancel: &CancellationToken,
) -> EmbeddedRanges {
    let request = provider.embedded_ranges(document, range, cancel.child_token());
    tokio::select! {
        _ = cancel.cancelled() => EmbeddedRanges::NotSynchronized,
        result = tokio::time::timeout(timeout, request) => match result {
            Ok(ranges) => ranges,
            Err(_) => {
                log::warn!(
                    target: "razor_tokens::semantic",
                    "embedded ranges for {} v{} timed out after {:?}",
                    document.uri(),
                    document.version(),
                    timeout
                );
                EmbeddedRanges::NotSynchronized
            }
        },
    }
}

/// Combine host ranges with the embedded contribution and sort the result.
///
/// Returns `None` when the embedded ranges are missing or belong to a
/// different document version.
pub fn merge_ranges(
    mut host: Vec<SemanticRange>,
    embedded: EmbeddedRanges,
    document_version: i32,
) -> Option<Vec<SemanticRange>> {
    match embedded {
        EmbeddedRanges::Synchronized { version, ranges } if version == document_version => {
            host.extend(ranges);
            host.sort();
            Some(host)
        }
        EmbeddedRanges::Synchronized { version, .. } => {
            log::debug!(
                target: "razor_tokens::semantic",
                "embedded ranges are for v{} but document is v{}",
                version,
                document_version
            );
            None
        }
        EmbeddedRanges::NotSynchronized => {
            log::debug!(
                target: "razor_tokens::semantic",
                "embedded ranges not synchronized for v{}",
                document_version
            );
            None
        }
    }
}
