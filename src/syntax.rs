pub mod builder;
pub mod tag_helper;
pub mod tree;

// Re-export main types
pub use builder::TreeBuilder;
pub use tag_helper::{DescriptorKind, TagHelperBinding, TagHelperDescriptor};
pub use tree::{SyntaxKind, SyntaxNode};
