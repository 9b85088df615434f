pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod lsp;
pub mod syntax;

// Re-export the main entry points
pub use analysis::semantic::{SemanticRange, TokenArray, legend};
pub use config::SemanticTokensSettings;
pub use document::{DocumentSource, RazorDocument};
pub use error::{SemanticError, SemanticResult};
pub use lsp::SemanticTokensService;
