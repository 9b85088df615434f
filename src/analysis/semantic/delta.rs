//! Semantic token delta calculation.
//!
//! Token arrays are re-derived in document order after every edit, so two
//! successive arrays share a long common prefix and suffix around the edit
//! point. Trimming both and replacing the middle is enough; no general
//! sequence alignment is needed on this path (see [`super::diff`] for that).

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{
    SemanticTokens, SemanticTokensDelta, SemanticTokensEdit, SemanticTokensFullDeltaResult,
};

use crate::error::{SemanticError, SemanticResult};

use super::diff::minimal_token_edits;
use super::encode::{TOKEN_STRIDE, TokenArray, ensure_token_aligned, token_from_chunk};

/// One replacement in the flat-integer convention: delete `delete_count`
/// integers at `start`, then insert `data` there.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEdit {
    pub start: u32,
    pub delete_count: u32,
    pub data: Vec<u32>,
}

impl TokenEdit {
    pub fn insert(start: usize, data: Vec<u32>) -> Self {
        Self {
            start: start as u32,
            delete_count: 0,
            data,
        }
    }

    pub fn delete(start: usize, count: usize) -> Self {
        Self {
            start: start as u32,
            delete_count: count as u32,
            data: Vec::new(),
        }
    }

    pub fn replace(start: usize, count: usize, data: Vec<u32>) -> Self {
        Self {
            start: start as u32,
            delete_count: count as u32,
            data,
        }
    }

    /// Convert to the LSP edit shape; start, count and data must be token-aligned.
    pub fn to_lsp(&self) -> SemanticResult<SemanticTokensEdit> {
        let aligned = self.start as usize % TOKEN_STRIDE == 0
            && self.delete_count as usize % TOKEN_STRIDE == 0
            && self.data.len() % TOKEN_STRIDE == 0;
        if !aligned {
            return Err(SemanticError::invalid_argument(format!(
                "edit at {} (delete {}, insert {}) is not token-aligned",
                self.start,
                self.delete_count,
                self.data.len()
            )));
        }
        Ok(SemanticTokensEdit {
            start: self.start,
            delete_count: self.delete_count,
            data: (!self.data.is_empty()).then(|| {
                self.data
                    .chunks_exact(TOKEN_STRIDE)
                    .map(token_from_chunk)
                    .collect()
            }),
        })
    }
}

/// Result of diffing against a previous array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// There was nothing to diff against; send the whole current array.
    Full,
    /// Edits turning the previous array into the current one (possibly none).
    Edits(Vec<TokenEdit>),
}

/// How consecutive arrays are diffed for `full/delta` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaStrategy {
    /// One replacement between the common prefix and suffix.
    PrefixSuffix,
    /// Separate edits per changed region, see [`minimal_token_edits`].
    Minimal { max_distance: usize },
}

/// Diff `current` against an optional `previous` array at integer level.
///
/// An absent or empty previous array yields [`DeltaOutcome::Full`].
pub fn diff(previous: Option<&[u32]>, current: &[u32]) -> DeltaOutcome {
    match previous {
        Some(previous) if !previous.is_empty() => {
            DeltaOutcome::Edits(prefix_suffix_edits(previous, current, 1))
        }
        _ => DeltaOutcome::Full,
    }
}

/// Whole-token diff of two encoded arrays.
pub fn token_diff(
    previous: Option<&[u32]>,
    current: &[u32],
    strategy: DeltaStrategy,
) -> SemanticResult<DeltaOutcome> {
    let previous = match previous {
        Some(previous) if !previous.is_empty() => previous,
        _ => return Ok(DeltaOutcome::Full),
    };
    ensure_token_aligned("previous token array", previous)?;
    ensure_token_aligned("current token array", current)?;

    let edits = match strategy {
        DeltaStrategy::PrefixSuffix => prefix_suffix_edits(previous, current, TOKEN_STRIDE),
        DeltaStrategy::Minimal { max_distance } => {
            minimal_token_edits(previous, current, max_distance)?
        }
    };
    Ok(DeltaOutcome::Edits(edits))
}

/// Replace the region between the common prefix and the common suffix.
///
/// Prefix and suffix lengths are rounded down to multiples of `granularity`
/// (1 for integer-level edits, [`TOKEN_STRIDE`] for whole-token edits). When
/// both arrays are multiples of `granularity` long, the edit is aligned too.
pub fn prefix_suffix_edits(old: &[u32], new: &[u32], granularity: usize) -> Vec<TokenEdit> {
    let granularity = granularity.max(1);
    if old == new {
        return Vec::new();
    }

    let max_common = old.len().min(new.len());
    let mut prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    prefix -= prefix % granularity;

    let mut suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
        .min(max_common - prefix);
    suffix -= suffix % granularity;

    let old_region = prefix..old.len() - suffix;
    let new_region = prefix..new.len() - suffix;

    let edit = match (old_region.is_empty(), new_region.is_empty()) {
        (false, false) => TokenEdit::replace(prefix, old_region.len(), new[new_region].to_vec()),
        (true, false) => TokenEdit::insert(prefix, new[new_region].to_vec()),
        (false, true) => TokenEdit::delete(prefix, old_region.len()),
        (true, true) => return Vec::new(),
    };
    vec![edit]
}

/// Apply edits to `old`.
///
/// Edit positions refer to `old`; edits must be sorted by start and must not
/// overlap.
pub fn apply_edits(old: &[u32], edits: &[TokenEdit]) -> SemanticResult<Vec<u32>> {
    let mut result = Vec::with_capacity(old.len());
    let mut cursor = 0usize;

    for edit in edits {
        let start = edit.start as usize;
        let end = start + edit.delete_count as usize;
        if start < cursor || end > old.len() {
            return Err(SemanticError::invalid_argument(format!(
                "edit {}..{} is out of order or outside an array of length {}",
                start,
                end,
                old.len()
            )));
        }
        result.extend_from_slice(&old[cursor..start]);
        result.extend_from_slice(&edit.data);
        cursor = end;
    }
    result.extend_from_slice(&old[cursor..]);
    Ok(result)
}

/// Build the `full/delta` response for `current` against `previous`.
///
/// Without a previous array the response carries the full token list.
pub fn calculate_semantic_tokens_delta(
    previous: Option<&[u32]>,
    current: &TokenArray,
    result_id: Option<String>,
    strategy: DeltaStrategy,
    cancel: &CancellationToken,
) -> SemanticResult<SemanticTokensFullDeltaResult> {
    if cancel.is_cancelled() {
        return Err(SemanticError::cancelled("diff"));
    }

    let edits = match token_diff(previous, current, strategy)? {
        DeltaOutcome::Full => {
            return Ok(SemanticTokensFullDeltaResult::Tokens(SemanticTokens {
                result_id,
                data: current.to_semantic_tokens(),
            }));
        }
        DeltaOutcome::Edits(edits) => edits
            .iter()
            .map(TokenEdit::to_lsp)
            .collect::<SemanticResult<Vec<_>>>()?,
    };

    log::debug!(
        target: "razor_tokens::delta",
        "{:?} delta: {} edit(s), {} ints total",
        strategy,
        edits.len(),
        current.len()
    );

    Ok(SemanticTokensFullDeltaResult::TokensDelta(
        SemanticTokensDelta { result_id, edits },
    ))
}
