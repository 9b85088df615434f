//! Semantic token legend for Razor documents.
//!
//! The indices of [`LEGEND_TYPES`] and the bit positions of
//! [`LEGEND_MODIFIERS`] are what the encoded token arrays carry; the rest of
//! the engine treats them as opaque integers.

use tower_lsp_server::ls_types::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

/// Semantic token types supported by the legend, in index order.
pub const LEGEND_TYPES: &[SemanticTokenType] = &[
    SemanticTokenType::new("razorTagHelperElement"),
    SemanticTokenType::new("razorTagHelperAttribute"),
    SemanticTokenType::new("razorTransition"),
    SemanticTokenType::new("razorDirectiveAttribute"),
    SemanticTokenType::new("razorDirectiveColon"),
    SemanticTokenType::new("razorDirective"),
    SemanticTokenType::new("razorComment"),
    SemanticTokenType::new("razorCommentTransition"),
    SemanticTokenType::new("razorCommentStar"),
    SemanticTokenType::new("razorComponentElement"),
    SemanticTokenType::new("razorComponentAttribute"),
    SemanticTokenType::new("markupTagDelimiter"),
    SemanticTokenType::new("markupOperator"),
    SemanticTokenType::new("markupElement"),
    SemanticTokenType::new("markupAttribute"),
    SemanticTokenType::new("markupAttributeQuote"),
    SemanticTokenType::new("markupAttributeValue"),
    SemanticTokenType::new("markupComment"),
    SemanticTokenType::new("markupCommentPunctuation"),
    SemanticTokenType::new("markupTextLiteral"),
];

/// Semantic token modifiers supported by the legend, in bit order.
pub const LEGEND_MODIFIERS: &[SemanticTokenModifier] =
    &[SemanticTokenModifier::new("razorCode")];

/// Token types emitted by the host-document visitor.
///
/// Discriminants are indices into [`LEGEND_TYPES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RazorTokenType {
    TagHelperElement = 0,
    TagHelperAttribute,
    Transition,
    DirectiveAttribute,
    DirectiveColon,
    Directive,
    Comment,
    CommentTransition,
    CommentStar,
    ComponentElement,
    ComponentAttribute,
    MarkupTagDelimiter,
    MarkupOperator,
    MarkupElement,
    MarkupAttribute,
    MarkupAttributeQuote,
    MarkupAttributeValue,
    MarkupComment,
    MarkupCommentPunctuation,
    MarkupTextLiteral,
}

impl RazorTokenType {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        LEGEND_TYPES[self as usize].as_str()
    }
}

/// Modifier bits emitted by the host-document visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RazorTokenModifier {
    /// The token sits inside an embedded-code construct and gets the code background.
    RazorCode = 0,
}

impl RazorTokenModifier {
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Build the legend advertised in the server capabilities.
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: LEGEND_TYPES.to_vec(),
        token_modifiers: LEGEND_MODIFIERS.to_vec(),
    }
}

/// Look up a token type index by its legend name.
pub fn token_type_index(name: &str) -> Option<u32> {
    LEGEND_TYPES
        .iter()
        .position(|t| t.as_str() == name)
        .map(|index| index as u32)
}

/// Render a modifier bitset as the list of legend names it contains.
pub fn modifier_names(bitset: u32) -> Vec<&'static str> {
    LEGEND_MODIFIERS
        .iter()
        .enumerate()
        .filter(|(bit, _)| bitset & (1 << bit) != 0)
        .map(|(_, m)| m.as_str())
        .collect()
}
