//! Semantic token computation for Razor documents.
//!
//! A request flows through these modules in order: the visitor walks the
//! syntax tree and asks the classifier for each leaf's token type, embedded
//! ranges are merged in, the encoder flattens the sorted ranges, and the
//! delta/diff modules compare the result with a cached previous array.

mod classifier;
pub mod delta;
pub mod diff;
pub mod embedded;
pub mod encode;
mod legend;
mod range;
mod visitor;

pub use classifier::{TokenRole, classify, is_custom_tag, is_html_tag_name};
pub use delta::{
    DeltaOutcome, DeltaStrategy, TokenEdit, apply_edits, calculate_semantic_tokens_delta,
    prefix_suffix_edits, token_diff,
};
pub use diff::{DiffEdit, minimal_edits, minimal_token_edits};
pub use embedded::{
    EmbeddedRangeProvider, EmbeddedRanges, NoEmbeddedRanges, fetch_embedded_ranges, merge_ranges,
};
pub use encode::{TOKEN_STRIDE, TokenArray, decode, encode, encode_cancellable};
pub use legend::{
    LEGEND_MODIFIERS, LEGEND_TYPES, RazorTokenModifier, RazorTokenType, legend, modifier_names,
    token_type_index,
};
pub use range::SemanticRange;
pub use visitor::{SemanticRangeVisitor, collect_host_ranges};
