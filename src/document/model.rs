use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use super::text::SourceText;
use crate::error::{SemanticError, SemanticResult};
use crate::syntax::SyntaxNode;

/// Serialized form of a parsed document, as produced by the parser host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    pub uri: Url,
    pub version: i32,
    pub text: String,
    pub root: SyntaxNode,
}

/// Immutable snapshot of a parsed Razor document
#[derive(Debug, Clone)]
pub struct RazorDocument {
    uri: Url,
    version: i32,
    text: Arc<SourceText>,
    root: Arc<SyntaxNode>,
}

impl RazorDocument {
    /// Create a snapshot, checking that the tree fits inside the text.
    pub fn new(uri: Url, version: i32, text: impl Into<String>, root: SyntaxNode) -> SemanticResult<Self> {
        let text = SourceText::new(text);
        if root.end() > text.len() {
            return Err(SemanticError::invalid_argument(format!(
                "syntax tree ends at byte {} but {} has only {} bytes",
                root.end(),
                uri,
                text.len()
            )));
        }
        Ok(Self {
            uri,
            version,
            text: Arc::new(text),
            root: Arc::new(root),
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &SourceText {
        &self.text
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }
}

impl TryFrom<DocumentSource> for RazorDocument {
    type Error = SemanticError;

    fn try_from(source: DocumentSource) -> SemanticResult<Self> {
        RazorDocument::new(source.uri, source.version, source.text, source.root)
    }
}
