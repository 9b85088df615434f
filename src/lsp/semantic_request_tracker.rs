//! Request tracking for semantic token operations.
//!
//! # Superseding
//!
//! When a new semantic token request arrives for a URI, it supersedes any
//! in-flight request for that URI: the older request's cancellation token is
//! cancelled, so its next checkpoint (tree walk, encode, diff) aborts
//! without touching the result cache.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Monotonically increasing request ID for tracking
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> u64 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// An in-flight request: its ID and the token its checkpoints observe.
#[derive(Debug, Clone)]
pub struct TrackedRequest {
    pub id: u64,
    pub cancel: CancellationToken,
}

/// Tracks the active semantic token request per URI.
#[derive(Debug, Clone, Default)]
pub struct SemanticRequestTracker {
    active_requests: Arc<DashMap<Url, TrackedRequest>>,
}

impl SemanticRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a request for `uri`, cancelling any request it supersedes.
    ///
    /// The returned token is a child of `parent`, so cancelling the caller's
    /// token also cancels the tracked request.
    pub fn start_request(&self, uri: &Url, parent: &CancellationToken) -> TrackedRequest {
        let request = TrackedRequest {
            id: next_request_id(),
            cancel: parent.child_token(),
        };
        if let Some(superseded) = self.active_requests.insert(uri.clone(), request.clone()) {
            log::debug!(
                target: "razor_tokens::semantic",
                "Request {} for {} superseded by {}",
                superseded.id,
                uri,
                request.id
            );
            superseded.cancel.cancel();
        }
        request
    }

    /// Checks if a request is still the newest one for `uri`.
    pub fn is_active(&self, uri: &Url, request_id: u64) -> bool {
        self.active_requests
            .get(uri)
            .map(|entry| entry.id == request_id)
            .unwrap_or(false)
    }

    /// Finishes a request, removing it from tracking if it's still the active one.
    pub fn finish_request(&self, uri: &Url, request_id: u64) {
        self.active_requests
            .remove_if(uri, |_, request| request.id == request_id);
    }

    /// Cancels the in-flight request for `uri`, e.g. when the document closes.
    pub fn cancel_all_for_uri(&self, uri: &Url) {
        if let Some((_, request)) = self.active_requests.remove(uri) {
            request.cancel.cancel();
        }
    }
}
