pub mod text;

mod model;

// Re-export main types
pub use model::{DocumentSource, RazorDocument};
pub use text::SourceText;
