//! Generalized insert/delete diff between token arrays.
//!
//! The region left after trimming the common prefix and suffix is diffed
//! with `similar`'s Myers implementation, and operations that touch adjacent
//! old positions are merged into one [`DiffEdit`]. When the edit distance
//! exceeds the configured bound the whole middle region becomes one
//! replacement, which is exactly what [`super::delta::prefix_suffix_edits`]
//! produces.

use std::hash::Hash;
use std::ops::Range;

use serde::Serialize;
use similar::{Algorithm, DiffOp, capture_diff_slices};

use crate::error::SemanticResult;

use super::delta::TokenEdit;
use super::encode::{TOKEN_STRIDE, ensure_token_aligned};

/// One merged edit; positions index the old array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiffEdit {
    Insert { position: usize, data: Vec<u32> },
    Delete { position: usize, count: usize },
    Replace { position: usize, count: usize, data: Vec<u32> },
}

impl DiffEdit {
    pub fn into_token_edit(self) -> TokenEdit {
        match self {
            DiffEdit::Insert { position, data } => TokenEdit::insert(position, data),
            DiffEdit::Delete { position, count } => TokenEdit::delete(position, count),
            DiffEdit::Replace {
                position,
                count,
                data,
            } => TokenEdit::replace(position, count, data),
        }
    }
}

/// A contiguous run of deletions and insertions at one old position.
#[derive(Debug)]
struct Hunk<T> {
    position: usize,
    count: usize,
    data: Vec<T>,
}

impl<T> Hunk<T> {
    fn cost(&self) -> usize {
        self.count + self.data.len()
    }
}

impl Hunk<u32> {
    fn into_diff_edit(self) -> DiffEdit {
        match (self.count, self.data.is_empty()) {
            (0, _) => DiffEdit::Insert {
                position: self.position,
                data: self.data,
            },
            (count, true) => DiffEdit::Delete {
                position: self.position,
                count,
            },
            (count, false) => DiffEdit::Replace {
                position: self.position,
                count,
                data: self.data,
            },
        }
    }
}

/// Integer-level edits turning `old` into `new`.
///
/// An empty `old` yields one insertion of everything at 0 and an empty
/// `new` yields one deletion of everything at 0.
pub fn minimal_edits(old: &[u32], new: &[u32], max_distance: usize) -> Vec<DiffEdit> {
    hunks(old, new, max_distance)
        .into_iter()
        .map(Hunk::into_diff_edit)
        .collect()
}

/// Whole-token edits turning `old` into `new`, suitable for LSP deltas.
///
/// Both arrays must be token-aligned.
pub fn minimal_token_edits(
    old: &[u32],
    new: &[u32],
    max_distance: usize,
) -> SemanticResult<Vec<TokenEdit>> {
    ensure_token_aligned("old token array", old)?;
    ensure_token_aligned("new token array", new)?;

    let old_tokens: Vec<&[u32]> = old.chunks_exact(TOKEN_STRIDE).collect();
    let new_tokens: Vec<&[u32]> = new.chunks_exact(TOKEN_STRIDE).collect();

    Ok(hunks(&old_tokens, &new_tokens, max_distance)
        .into_iter()
        .map(|hunk| Hunk {
            position: hunk.position * TOKEN_STRIDE,
            count: hunk.count * TOKEN_STRIDE,
            data: hunk.data.concat(),
        })
        .map(|hunk| hunk.into_diff_edit().into_token_edit())
        .collect())
}

fn hunks<T: Eq + Hash + Ord + Clone>(old: &[T], new: &[T], max_distance: usize) -> Vec<Hunk<T>> {
    if old == new {
        return Vec::new();
    }

    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let whole_region = || {
        vec![Hunk {
            position: prefix,
            count: old_mid.len(),
            data: new_mid.to_vec(),
        }]
    };

    if old_mid.is_empty() || new_mid.is_empty() {
        return whole_region();
    }
    // The length difference alone already needs that many insertions or deletions.
    if old_mid.len().abs_diff(new_mid.len()) > max_distance {
        return whole_region();
    }

    let ops = capture_diff_slices(Algorithm::Myers, old_mid, new_mid);
    let hunks = merge_ops(&ops, prefix, new_mid);
    let distance: usize = hunks.iter().map(Hunk::cost).sum();
    if distance > max_distance {
        log::debug!(
            target: "razor_tokens::diff",
            "edit distance {} exceeds {} for {}x{} elements, replacing whole region",
            distance,
            max_distance,
            old_mid.len(),
            new_mid.len()
        );
        return whole_region();
    }
    hunks
}

/// Fold diff operations into hunks; an operation continues the last hunk
/// when it starts at the old position right after that hunk's deletions.
fn merge_ops<T: Clone>(ops: &[DiffOp], base: usize, new: &[T]) -> Vec<Hunk<T>> {
    let mut hunks: Vec<Hunk<T>> = Vec::new();

    for op in ops {
        let (old_index, count, inserted): (usize, usize, Range<usize>) = match *op {
            DiffOp::Equal { .. } => continue,
            DiffOp::Delete {
                old_index, old_len, ..
            } => (old_index, old_len, 0..0),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => (old_index, 0, new_index..new_index + new_len),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => (old_index, old_len, new_index..new_index + new_len),
        };
        let position = base + old_index;

        match hunks.last_mut() {
            Some(hunk) if hunk.position + hunk.count == position => {
                hunk.count += count;
                hunk.data.extend_from_slice(&new[inserted]);
            }
            _ => hunks.push(Hunk {
                position,
                count,
                data: new[inserted].to_vec(),
            }),
        }
    }

    hunks
}
