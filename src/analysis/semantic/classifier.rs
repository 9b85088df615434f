//! Token classification for individual syntax nodes.
//!
//! The visitor decides what role a leaf plays from the construct it sits in;
//! this module maps that role to a legend token type. Punctuation roles map
//! unconditionally, tag-helper names go through the component-vs-native
//! decision, and text maps to nothing.

use crate::document::SourceText;
use crate::syntax::{SyntaxNode, TagHelperBinding};

use super::legend::RazorTokenType;

/// Structural role of a node, derived from its kind and enclosing construct.
#[derive(Debug, Clone, Copy)]
pub enum TokenRole<'a> {
    TagDelimiter,
    Operator,
    AttributeQuote,
    AttributeValue,
    MarkupElementName,
    MarkupAttributeName,
    TagHelperName(&'a TagHelperBinding),
    TagHelperAttributeName {
        binding: Option<&'a TagHelperBinding>,
        bound: bool,
    },
    DirectiveAttributeName,
    DirectiveAttributeColon,
    Transition,
    CommentTransition,
    CommentStar,
    CommentBody,
    DirectiveKeyword,
    MetaCode,
    MarkupCommentPunctuation,
    MarkupCommentBody,
    TextLiteral,
}

/// Classify `node` playing `role`.
///
/// Returns `None` when the node should not be emitted as a token: it is
/// zero-width, it is plain text, or it is a tag-helper name or attribute
/// that does not qualify as custom. Callers fall back to native markup
/// coloring for the latter.
pub fn classify(node: &SyntaxNode, text: &SourceText, role: TokenRole<'_>) -> Option<RazorTokenType> {
    if node.width() == 0 {
        return None;
    }

    let token_type = match role {
        TokenRole::TagDelimiter => RazorTokenType::MarkupTagDelimiter,
        TokenRole::Operator => RazorTokenType::MarkupOperator,
        TokenRole::AttributeQuote => RazorTokenType::MarkupAttributeQuote,
        TokenRole::AttributeValue => RazorTokenType::MarkupAttributeValue,
        TokenRole::MarkupElementName => RazorTokenType::MarkupElement,
        TokenRole::MarkupAttributeName => RazorTokenType::MarkupAttribute,
        TokenRole::TagHelperName(binding) => {
            let name = text.slice(node.start(), node.end());
            if !is_custom_tag(name, binding) {
                return None;
            }
            if binding.is_all_components() {
                RazorTokenType::ComponentElement
            } else {
                RazorTokenType::TagHelperElement
            }
        }
        TokenRole::TagHelperAttributeName { binding, bound } => {
            if !bound {
                return None;
            }
            if binding.is_some_and(TagHelperBinding::is_all_components) {
                RazorTokenType::ComponentAttribute
            } else {
                RazorTokenType::TagHelperAttribute
            }
        }
        TokenRole::DirectiveAttributeName => RazorTokenType::DirectiveAttribute,
        TokenRole::DirectiveAttributeColon => RazorTokenType::DirectiveColon,
        TokenRole::Transition | TokenRole::MetaCode => RazorTokenType::Transition,
        TokenRole::CommentTransition => RazorTokenType::CommentTransition,
        TokenRole::CommentStar => RazorTokenType::CommentStar,
        TokenRole::CommentBody => RazorTokenType::Comment,
        TokenRole::DirectiveKeyword => RazorTokenType::Directive,
        TokenRole::MarkupCommentPunctuation => RazorTokenType::MarkupCommentPunctuation,
        TokenRole::MarkupCommentBody => RazorTokenType::MarkupComment,
        TokenRole::TextLiteral => return None,
    };
    Some(token_type)
}

/// Decide whether a tag-helper tag name is a custom element.
///
/// Names that are not standard HTML elements are always custom. A standard
/// name is custom only when every bound descriptor is a component and the
/// name starts with an uppercase letter, so `<Button>` bound to a component
/// is custom while `<button>` with an attribute-matched helper stays native.
pub fn is_custom_tag(name: &str, binding: &TagHelperBinding) -> bool {
    if !is_html_tag_name(name) {
        return true;
    }
    binding.is_all_components() && name.starts_with(|c: char| c.is_uppercase())
}

/// Standard HTML element names, sorted for binary search.
const HTML_TAG_NAMES: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter", "nav",
    "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "pre",
    "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section", "select",
    "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "table",
    "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr",
    "track", "u", "ul", "var", "video", "wbr",
];

/// Case-insensitive check against the standard HTML element names.
pub fn is_html_tag_name(name: &str) -> bool {
    if name.is_empty() || !name.is_ascii() {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    HTML_TAG_NAMES.binary_search(&lower.as_str()).is_ok()
}
