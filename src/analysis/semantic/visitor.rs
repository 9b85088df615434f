//! Host-document traversal producing classified ranges.
//!
//! The visitor walks the Razor syntax tree depth-first, derives each leaf's
//! role from the construct it sits in, and emits single-line
//! [`SemanticRange`]s. Enclosing-construct state (which tag-helper binding
//! applies, whether the code background modifier is on) travels down the
//! recursion as a [`VisitContext`] value, so leaving a construct restores the
//! caller's state by returning.

use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::Range;

use crate::document::SourceText;
use crate::error::{SemanticError, SemanticResult};
use crate::syntax::{SyntaxKind, SyntaxNode, TagHelperBinding};

use super::classifier::{TokenRole, classify};
use super::legend::{RazorTokenModifier, RazorTokenType};
use super::range::{SemanticRange, ranges_overlap};

/// Construct enclosing the leaves currently being visited.
#[derive(Debug, Clone, Copy)]
enum Construct {
    None,
    MarkupTag,
    MarkupAttribute,
    MarkupComment,
    TagHelperTag,
    TagHelperAttribute { bound: bool },
    DirectiveAttribute,
    RazorComment,
    Directive,
    Code,
}

#[derive(Debug, Clone, Copy)]
struct VisitContext<'a> {
    construct: Construct,
    binding: Option<&'a TagHelperBinding>,
    /// Tokens emitted in this context carry the `razorCode` modifier.
    in_code: bool,
}

impl<'a> VisitContext<'a> {
    fn root() -> Self {
        Self {
            construct: Construct::None,
            binding: None,
            in_code: false,
        }
    }

    fn within(self, construct: Construct) -> Self {
        Self { construct, ..self }
    }

    fn markup(self) -> Self {
        Self {
            construct: Construct::None,
            in_code: false,
            ..self
        }
    }

    fn code(self) -> Self {
        Self {
            construct: Construct::Code,
            in_code: true,
            ..self
        }
    }
}

/// Bounding range of a range request, in host coordinates.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    range: Range,
    start: usize,
    end: usize,
}

pub struct SemanticRangeVisitor<'a> {
    text: &'a SourceText,
    bounds: Option<Bounds>,
    color_code_background: bool,
    ranges: Vec<SemanticRange>,
}

impl<'a> SemanticRangeVisitor<'a> {
    /// Create a visitor over `text`, optionally restricted to `range`.
    ///
    /// An inverted bounding range is a caller error.
    pub fn new(text: &'a SourceText, range: Option<Range>, color_code_background: bool) -> SemanticResult<Self> {
        let bounds = match range {
            Some(range) if range.start > range.end => {
                return Err(SemanticError::invalid_argument(format!(
                    "bounding range starts at {}:{} after it ends at {}:{}",
                    range.start.line, range.start.character, range.end.line, range.end.character
                )));
            }
            Some(range) => Some(Bounds {
                range,
                start: text.offset_clamped(range.start),
                end: text.offset_clamped(range.end),
            }),
            None => None,
        };
        Ok(Self {
            text,
            bounds,
            color_code_background,
            ranges: Vec::new(),
        })
    }

    /// Walk `root` and return the sorted host ranges.
    pub fn collect(mut self, root: &SyntaxNode, cancel: &CancellationToken) -> SemanticResult<Vec<SemanticRange>> {
        if cancel.is_cancelled() {
            return Err(SemanticError::cancelled("tree walk"));
        }
        self.visit(root, VisitContext::root());
        self.ranges.sort();
        log::trace!(
            target: "razor_tokens::semantic",
            "collected {} host ranges",
            self.ranges.len()
        );
        Ok(self.ranges)
    }

    fn visit_children(&mut self, node: &SyntaxNode, ctx: VisitContext<'_>) {
        for child in node.children() {
            self.visit(child, ctx);
        }
    }

    fn visit(&mut self, node: &SyntaxNode, ctx: VisitContext<'_>) {
        // Node offsets are host offsets, also inside embedded-code constructs.
        if let Some(bounds) = self.bounds
            && !node.overlaps(bounds.start, bounds.end)
        {
            return;
        }

        let role = match node.kind() {
            SyntaxKind::Document | SyntaxKind::MarkupBlock | SyntaxKind::MarkupElement => {
                return self.visit_children(node, ctx.markup());
            }
            SyntaxKind::MarkupStartTag | SyntaxKind::MarkupEndTag => {
                return self.visit_children(node, ctx.within(Construct::MarkupTag));
            }
            SyntaxKind::MarkupAttribute => {
                return self.visit_children(node, ctx.within(Construct::MarkupAttribute));
            }
            SyntaxKind::MarkupCommentBlock => {
                return self.visit_children(node, ctx.within(Construct::MarkupComment));
            }
            SyntaxKind::MarkupTextLiteral | SyntaxKind::CSharpCode => {
                return self.visit_children(node, ctx);
            }
            SyntaxKind::TagHelperElement { binding } => {
                let ctx = VisitContext {
                    binding: Some(binding.as_ref()),
                    ..ctx.markup()
                };
                return self.visit_children(node, ctx);
            }
            SyntaxKind::TagHelperStartTag | SyntaxKind::TagHelperEndTag => {
                return self.visit_children(node, ctx.within(Construct::TagHelperTag));
            }
            SyntaxKind::TagHelperAttribute { bound } => {
                let construct = Construct::TagHelperAttribute { bound: *bound };
                return self.visit_children(node, ctx.within(construct));
            }
            SyntaxKind::TagHelperDirectiveAttribute => {
                return self.visit_children(node, ctx.within(Construct::DirectiveAttribute));
            }
            SyntaxKind::RazorComment => {
                return self.visit_children(node, ctx.within(Construct::RazorComment));
            }
            SyntaxKind::RazorDirective => {
                return self.visit_children(node, ctx.within(Construct::Directive));
            }
            SyntaxKind::CodeBlock | SyntaxKind::ExplicitExpression | SyntaxKind::ImplicitExpression => {
                return self.visit_children(node, ctx.code());
            }

            SyntaxKind::OpenAngle | SyntaxKind::CloseAngle | SyntaxKind::ForwardSlash | SyntaxKind::Bang => {
                TokenRole::TagDelimiter
            }
            SyntaxKind::Equals => TokenRole::Operator,
            SyntaxKind::Quote => TokenRole::AttributeQuote,
            SyntaxKind::AttributeValue => TokenRole::AttributeValue,
            SyntaxKind::TagName => match (ctx.construct, ctx.binding) {
                (Construct::TagHelperTag, Some(binding)) => TokenRole::TagHelperName(binding),
                _ => TokenRole::MarkupElementName,
            },
            SyntaxKind::AttributeName => match ctx.construct {
                Construct::TagHelperAttribute { bound } => TokenRole::TagHelperAttributeName {
                    binding: ctx.binding,
                    bound,
                },
                Construct::DirectiveAttribute => TokenRole::DirectiveAttributeName,
                _ => TokenRole::MarkupAttributeName,
            },
            SyntaxKind::DirectiveAttributeParameter => TokenRole::DirectiveAttributeName,
            SyntaxKind::Colon => match ctx.construct {
                Construct::DirectiveAttribute => TokenRole::DirectiveAttributeColon,
                _ => TokenRole::TextLiteral,
            },
            SyntaxKind::Transition => match ctx.construct {
                Construct::RazorComment => TokenRole::CommentTransition,
                _ => TokenRole::Transition,
            },
            SyntaxKind::MetaCode => TokenRole::MetaCode,
            SyntaxKind::DirectiveKeyword => TokenRole::DirectiveKeyword,
            SyntaxKind::CommentStar => TokenRole::CommentStar,
            SyntaxKind::CommentText => TokenRole::CommentBody,
            SyntaxKind::MarkupCommentDelimiter => TokenRole::MarkupCommentPunctuation,
            SyntaxKind::MarkupCommentText => TokenRole::MarkupCommentBody,
            SyntaxKind::Text | SyntaxKind::Whitespace | SyntaxKind::NewLine => TokenRole::TextLiteral,
        };

        self.emit(node, role, ctx);
    }

    /// Classify a leaf and add its range(s).
    fn emit(&mut self, node: &SyntaxNode, role: TokenRole<'_>, ctx: VisitContext<'_>) {
        let token_type = match (classify(node, self.text, role), role) {
            (Some(token_type), _) => token_type,
            // Tag-helper names and attributes that are not custom keep native markup coloring.
            (None, TokenRole::TagHelperName(_)) => {
                let Some(token_type) = classify(node, self.text, TokenRole::MarkupElementName) else {
                    return;
                };
                token_type
            }
            (None, TokenRole::TagHelperAttributeName { .. }) => {
                let Some(token_type) = classify(node, self.text, TokenRole::MarkupAttributeName) else {
                    return;
                };
                token_type
            }
            (None, _) => return,
        };

        let modifier = if ctx.in_code && self.color_code_background {
            RazorTokenModifier::RazorCode.bit()
        } else {
            0
        };
        self.add_range(node, token_type, modifier);
    }

    /// Add the range(s) for `node`, splitting spans that cross line breaks.
    fn add_range(&mut self, node: &SyntaxNode, token_type: RazorTokenType, modifier: u32) {
        if node.width() == 0 {
            return;
        }

        let start = self.text.position(node.start());
        let end = self.text.position(node.end());
        if start.line == end.line {
            self.push(Range::new(start, end), token_type, modifier);
            return;
        }

        if node.is_leaf() {
            self.add_split_leaf(node, token_type, modifier);
        } else {
            // The parser already broke the text into line-aware children.
            for child in node.children() {
                let child_text = self.text.slice(child.start(), child.end());
                if !child_text.trim().is_empty() {
                    self.add_range(child, token_type, modifier);
                }
            }
        }
    }

    /// Split a childless multi-line node into one range per physical line.
    fn add_split_leaf(&mut self, node: &SyntaxNode, token_type: RazorTokenType, modifier: u32) {
        let content = self.text.slice(node.start(), node.end());
        let mut segment_start = node.start();
        let mut rest = content;

        while !rest.is_empty() {
            let (segment, line_break_len) = match rest.find(['\r', '\n']) {
                Some(index) => {
                    let break_len = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
                    (&rest[..index], break_len)
                }
                None => (rest, 0),
            };

            let trimmed_len = segment.trim_end().len();
            if segment.trim_start().is_empty() {
                log::trace!(
                    target: "razor_tokens::semantic",
                    "skipping blank segment at byte {} of multiline {:?}",
                    segment_start,
                    node.kind()
                );
            } else {
                // Non-final segments end at their last non-whitespace character;
                // the final one ends where the node ends.
                let segment_end = if line_break_len == 0 {
                    segment_start + segment.len()
                } else {
                    segment_start + trimmed_len
                };
                let range = Range::new(
                    self.text.position(segment_start),
                    self.text.position(segment_end),
                );
                self.push(range, token_type, modifier);
            }

            let advance = segment.len() + line_break_len;
            segment_start += advance;
            rest = &rest[advance..];
        }
    }

    fn push(&mut self, range: Range, token_type: RazorTokenType, modifier: u32) {
        if range.start.line != range.end.line || range.end.character <= range.start.character {
            return;
        }
        if let Some(bounds) = self.bounds
            && !ranges_overlap(&range, &bounds.range)
        {
            return;
        }
        self.ranges
            .push(SemanticRange::new(range, token_type.index(), modifier));
    }
}

/// Collect the host-document ranges of `root`, sorted.
pub fn collect_host_ranges(
    text: &SourceText,
    root: &SyntaxNode,
    range: Option<Range>,
    color_code_background: bool,
    cancel: &CancellationToken,
) -> SemanticResult<Vec<SemanticRange>> {
    SemanticRangeVisitor::new(text, range, color_code_background)?.collect(root, cancel)
}
