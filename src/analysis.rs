pub mod result_id;
pub mod semantic;

// Re-export main types and functions
pub use result_id::{ResultId, next_result_id};
pub use semantic::{
    LEGEND_MODIFIERS, LEGEND_TYPES, SemanticRange, TokenArray, legend,
};
