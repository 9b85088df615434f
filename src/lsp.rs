mod cache;
mod semantic_request_tracker;
mod semantic_tokens;

pub use cache::ResultCache;
pub use semantic_request_tracker::{SemanticRequestTracker, TrackedRequest};
pub use semantic_tokens::SemanticTokensService;
