use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::tag_helper::TagHelperBinding;

/// Kind tag of a Razor syntax node.
///
/// Container kinds group children into the constructs that decide how their
/// leaves are colored; leaf kinds are the punctuation, names and text runs
/// those constructs are made of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Containers
    Document,
    MarkupBlock,
    MarkupElement,
    MarkupStartTag,
    MarkupEndTag,
    MarkupAttribute,
    MarkupCommentBlock,
    MarkupTextLiteral,
    TagHelperElement { binding: Arc<TagHelperBinding> },
    TagHelperStartTag,
    TagHelperEndTag,
    TagHelperAttribute { bound: bool },
    TagHelperDirectiveAttribute,
    RazorComment,
    RazorDirective,
    CodeBlock,
    ExplicitExpression,
    ImplicitExpression,
    /// Code owned by the embedded language; colored by the embedded provider.
    CSharpCode,

    // Leaves
    OpenAngle,
    CloseAngle,
    ForwardSlash,
    Bang,
    Equals,
    Quote,
    TagName,
    AttributeName,
    AttributeValue,
    DirectiveAttributeParameter,
    Colon,
    Transition,
    MetaCode,
    DirectiveKeyword,
    CommentStar,
    CommentText,
    MarkupCommentDelimiter,
    MarkupCommentText,
    Text,
    Whitespace,
    NewLine,
}

/// An immutable node of a parsed Razor document.
///
/// Offsets are UTF-8 byte offsets into the host document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    start: usize,
    width: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, start: usize, width: usize) -> Self {
        Self {
            kind,
            start,
            width,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: SyntaxKind, start: usize, width: usize, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            start,
            width,
            children,
        }
    }

    pub fn kind(&self) -> &SyntaxKind {
        &self.kind
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn end(&self) -> usize {
        self.start + self.width
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node overlaps the half-open byte span `[start, end)`.
    ///
    /// Empty spans overlap a node that contains their offset.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        if start == end {
            return self.start <= start && start <= self.end();
        }
        self.start < end && start < self.end()
    }
}
