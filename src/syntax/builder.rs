//! Incremental construction of a source text together with its syntax tree.
//!
//! Parsers hand the token engine a finished tree; this builder is the
//! in-crate stand-in used by tests, benchmarks and fixture generation. Text
//! and node offsets are produced together so they can never disagree.

use super::tree::{SyntaxKind, SyntaxNode};

struct OpenNode {
    kind: SyntaxKind,
    start: usize,
    children: Vec<SyntaxNode>,
}

pub struct TreeBuilder {
    text: String,
    stack: Vec<OpenNode>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Start a new document; the root node is a [`SyntaxKind::Document`].
    pub fn new() -> Self {
        Self {
            text: String::new(),
            stack: vec![OpenNode {
                kind: SyntaxKind::Document,
                start: 0,
                children: Vec::new(),
            }],
        }
    }

    /// Append `text` as a leaf of the given kind.
    pub fn token(&mut self, kind: SyntaxKind, text: &str) -> &mut Self {
        let start = self.text.len();
        self.text.push_str(text);
        self.push_child(SyntaxNode::new(kind, start, text.len()));
        self
    }

    /// Append a zero-width leaf, as parsers do for tokens the user has not typed yet.
    pub fn missing(&mut self, kind: SyntaxKind) -> &mut Self {
        let start = self.text.len();
        self.push_child(SyntaxNode::new(kind, start, 0));
        self
    }

    /// Open a container node; close it with [`TreeBuilder::finish`].
    pub fn start(&mut self, kind: SyntaxKind) -> &mut Self {
        self.stack.push(OpenNode {
            kind,
            start: self.text.len(),
            children: Vec::new(),
        });
        self
    }

    /// Close the innermost open container. The root is never closed here.
    pub fn finish(&mut self) -> &mut Self {
        if self.stack.len() > 1
            && let Some(open) = self.stack.pop()
        {
            let node = self.close(open);
            self.push_child(node);
        }
        self
    }

    /// Close every open node and return the text and the root.
    pub fn build(mut self) -> (String, SyntaxNode) {
        while self.stack.len() > 1 {
            self.finish();
        }
        let root = match self.stack.pop() {
            Some(open) => self.close(open),
            None => SyntaxNode::new(SyntaxKind::Document, 0, 0),
        };
        (self.text, root)
    }

    fn close(&self, open: OpenNode) -> SyntaxNode {
        let width = self.text.len() - open.start;
        SyntaxNode::with_children(open.kind, open.start, width, open.children)
    }

    fn push_child(&mut self, node: SyntaxNode) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_tracks_offsets() {
        let mut builder = TreeBuilder::new();
        builder
            .start(SyntaxKind::MarkupStartTag)
            .token(SyntaxKind::OpenAngle, "<")
            .token(SyntaxKind::TagName, "div")
            .missing(SyntaxKind::CloseAngle)
            .finish()
            .token(SyntaxKind::Text, "hi");
        let (text, root) = builder.build();

        assert_eq!(text, "<divhi");
        assert_eq!(root.width(), 6);
        let tag = &root.children()[0];
        assert_eq!(tag.width(), 4);
        assert_eq!(tag.children()[1].start(), 1);
        assert_eq!(tag.children()[2].width(), 0);
        assert_eq!(root.children()[1].start(), 4);
    }

    #[test]
    fn test_empty_document() {
        let (text, root) = TreeBuilder::new().build();
        assert!(text.is_empty());
        assert!(root.is_leaf());
        assert_eq!(root.width(), 0);
    }
}
