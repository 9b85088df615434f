//! Razor document fixtures built with `TreeBuilder`.

use std::sync::Arc;

use razor_tokens::document::DocumentSource;
use razor_tokens::syntax::{
    DescriptorKind, SyntaxKind, TagHelperBinding, TagHelperDescriptor, TreeBuilder,
};
use razor_tokens::RazorDocument;
use url::Url;

pub const COUNTER_URI: &str = "file:///Pages/Counter.razor";

fn counter_binding() -> Arc<TagHelperBinding> {
    Arc::new(TagHelperBinding::new(vec![TagHelperDescriptor::new(
        "Counter",
        DescriptorKind::Component,
    )]))
}

/// Append `<p>@count</p>` plus a line break.
fn paragraph(builder: &mut TreeBuilder) {
    builder
        .start(SyntaxKind::MarkupElement)
        .start(SyntaxKind::MarkupStartTag)
        .token(SyntaxKind::OpenAngle, "<")
        .token(SyntaxKind::TagName, "p")
        .token(SyntaxKind::CloseAngle, ">")
        .finish()
        .start(SyntaxKind::ImplicitExpression)
        .token(SyntaxKind::Transition, "@")
        .start(SyntaxKind::CSharpCode)
        .token(SyntaxKind::Text, "count")
        .finish()
        .finish()
        .start(SyntaxKind::MarkupEndTag)
        .token(SyntaxKind::OpenAngle, "<")
        .token(SyntaxKind::ForwardSlash, "/")
        .token(SyntaxKind::TagName, "p")
        .token(SyntaxKind::CloseAngle, ">")
        .finish()
        .finish()
        .token(SyntaxKind::NewLine, "\n");
}

/// The counter page, with `extra_paragraphs` more `<p>@count</p>` lines at the end:
///
/// ```text
/// @page "/counter"
/// <Counter IncrementAmount="5" @onclick:preventDefault />
/// @* note *@
/// <p>@count</p>
/// ```
pub fn counter_page_source(version: i32, extra_paragraphs: usize) -> DocumentSource {
    let mut builder = TreeBuilder::new();

    builder
        .start(SyntaxKind::RazorDirective)
        .token(SyntaxKind::Transition, "@")
        .token(SyntaxKind::DirectiveKeyword, "page")
        .token(SyntaxKind::Whitespace, " ")
        .start(SyntaxKind::CSharpCode)
        .token(SyntaxKind::Text, "\"/counter\"")
        .finish()
        .finish()
        .token(SyntaxKind::NewLine, "\n");

    builder
        .start(SyntaxKind::TagHelperElement {
            binding: counter_binding(),
        })
        .start(SyntaxKind::TagHelperStartTag)
        .token(SyntaxKind::OpenAngle, "<")
        .token(SyntaxKind::TagName, "Counter")
        .token(SyntaxKind::Whitespace, " ")
        .start(SyntaxKind::TagHelperAttribute { bound: true })
        .token(SyntaxKind::AttributeName, "IncrementAmount")
        .token(SyntaxKind::Equals, "=")
        .token(SyntaxKind::Quote, "\"")
        .token(SyntaxKind::AttributeValue, "5")
        .token(SyntaxKind::Quote, "\"")
        .finish()
        .token(SyntaxKind::Whitespace, " ")
        .start(SyntaxKind::TagHelperDirectiveAttribute)
        .token(SyntaxKind::Transition, "@")
        .token(SyntaxKind::AttributeName, "onclick")
        .token(SyntaxKind::Colon, ":")
        .token(SyntaxKind::DirectiveAttributeParameter, "preventDefault")
        .finish()
        .token(SyntaxKind::Whitespace, " ")
        .token(SyntaxKind::ForwardSlash, "/")
        .token(SyntaxKind::CloseAngle, ">")
        .finish()
        .finish()
        .token(SyntaxKind::NewLine, "\n");

    builder
        .start(SyntaxKind::RazorComment)
        .token(SyntaxKind::Transition, "@")
        .token(SyntaxKind::CommentStar, "*")
        .token(SyntaxKind::CommentText, " note ")
        .token(SyntaxKind::CommentStar, "*")
        .token(SyntaxKind::Transition, "@")
        .finish()
        .token(SyntaxKind::NewLine, "\n");

    for _ in 0..=extra_paragraphs {
        paragraph(&mut builder);
    }

    let (text, root) = builder.build();
    DocumentSource {
        uri: Url::parse(COUNTER_URI).unwrap(),
        version,
        text,
        root,
    }
}

pub fn counter_page(version: i32, extra_paragraphs: usize) -> RazorDocument {
    RazorDocument::try_from(counter_page_source(version, extra_paragraphs)).unwrap()
}
