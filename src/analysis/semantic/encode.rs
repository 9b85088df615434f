//! Relative-delta encoding of classified ranges.
//!
//! Each range becomes five integers: `deltaLine`, `deltaStartChar`,
//! `length`, `tokenType`, `tokenModifier`. Positions are relative to the
//! previous range's start; `deltaStartChar` is absolute when the line
//! changes.

use std::ops::Deref;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::SemanticToken;

use crate::error::{SemanticError, SemanticResult};

use super::range::SemanticRange;

/// Number of integers per encoded token.
pub const TOKEN_STRIDE: usize = 5;

/// An immutable, cheaply clonable encoded token array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TokenArray(Arc<[u32]>);

impl TokenArray {
    /// Wrap raw integers, which must form whole tokens.
    pub fn new(data: Vec<u32>) -> SemanticResult<Self> {
        ensure_token_aligned("token array", &data)?;
        Ok(Self(data.into()))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn token_count(&self) -> usize {
        self.0.len() / TOKEN_STRIDE
    }

    /// View the array as LSP tokens.
    pub fn to_semantic_tokens(&self) -> Vec<SemanticToken> {
        self.0
            .chunks_exact(TOKEN_STRIDE)
            .map(token_from_chunk)
            .collect()
    }

    pub fn from_semantic_tokens(tokens: &[SemanticToken]) -> Self {
        let mut data = Vec::with_capacity(tokens.len() * TOKEN_STRIDE);
        for token in tokens {
            data.extend_from_slice(&[
                token.delta_line,
                token.delta_start,
                token.length,
                token.token_type,
                token.token_modifiers_bitset,
            ]);
        }
        Self(data.into())
    }
}

impl Deref for TokenArray {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

/// Reject arrays that do not consist of whole tokens.
pub(crate) fn ensure_token_aligned(name: &str, data: &[u32]) -> SemanticResult<()> {
    if data.len() % TOKEN_STRIDE != 0 {
        return Err(SemanticError::invalid_argument(format!(
            "{} length {} is not a multiple of {}",
            name,
            data.len(),
            TOKEN_STRIDE
        )));
    }
    Ok(())
}

pub(crate) fn token_from_chunk(chunk: &[u32]) -> SemanticToken {
    SemanticToken {
        delta_line: chunk[0],
        delta_start: chunk[1],
        length: chunk[2],
        token_type: chunk[3],
        token_modifiers_bitset: chunk[4],
    }
}

/// Encode sorted, single-line, non-empty ranges.
///
/// A range that is multi-line, empty, or out of order means an upstream
/// invariant was broken; debug builds panic, release builds return
/// [`SemanticError::Internal`].
pub fn encode(ranges: &[SemanticRange]) -> SemanticResult<TokenArray> {
    let mut data = Vec::with_capacity(ranges.len() * TOKEN_STRIDE);
    let mut last_line = 0u32;
    let mut last_start = 0u32;

    for range in ranges {
        let start = range.start();
        let Some(length) = range.length() else {
            debug_assert!(false, "invalid range reached the encoder: {range:?}");
            return Err(SemanticError::internal(format!(
                "range {}:{}-{}:{} is empty or spans lines",
                start.line,
                start.character,
                range.end().line,
                range.end().character
            )));
        };

        let Some(delta_line) = start.line.checked_sub(last_line) else {
            debug_assert!(false, "ranges reached the encoder out of order: {range:?}");
            return Err(SemanticError::internal("ranges are not sorted by line"));
        };
        let delta_start = if delta_line == 0 {
            match start.character.checked_sub(last_start) {
                Some(delta) => delta,
                None => {
                    debug_assert!(false, "ranges reached the encoder out of order: {range:?}");
                    return Err(SemanticError::internal("ranges are not sorted by column"));
                }
            }
        } else {
            start.character
        };

        data.extend_from_slice(&[
            delta_line,
            delta_start,
            length,
            range.token_type,
            range.modifier,
        ]);

        last_line = start.line;
        last_start = start.character;
    }

    Ok(TokenArray(data.into()))
}

/// [`encode`] with a cancellation checkpoint before the work starts.
pub fn encode_cancellable(ranges: &[SemanticRange], cancel: &CancellationToken) -> SemanticResult<TokenArray> {
    if cancel.is_cancelled() {
        return Err(SemanticError::cancelled("encode"));
    }
    encode(ranges)
}

/// Reconstruct absolute ranges from an encoded array.
pub fn decode(tokens: &[u32]) -> Vec<SemanticRange> {
    let mut line = 0u32;
    let mut character = 0u32;
    tokens
        .chunks_exact(TOKEN_STRIDE)
        .map(|chunk| {
            let token = token_from_chunk(chunk);
            line += token.delta_line;
            if token.delta_line > 0 {
                character = token.delta_start;
            } else {
                character += token.delta_start;
            }
            SemanticRange::on_line(
                line,
                character,
                character + token.length,
                token.token_type,
                token.token_modifiers_bitset,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_empty() {
        let encoded = encode(&[]).unwrap();
        assert!(encoded.is_empty());
        assert_eq!(encoded.token_count(), 0);
    }

    #[test]
    fn test_encode_single_token() {
        let encoded = encode(&[SemanticRange::on_line(0, 3, 7, 13, 0)]).unwrap();
        assert_eq!(encoded.as_slice(), &[0, 3, 4, 13, 0]);
    }

    #[test]
    fn test_encode_same_line_uses_previous_start() {
        let encoded = encode(&[
            SemanticRange::on_line(0, 3, 7, 1, 0),
            SemanticRange::on_line(0, 10, 14, 2, 1),
        ])
        .unwrap();
        assert_eq!(encoded.as_slice(), &[0, 3, 4, 1, 0, 0, 7, 4, 2, 1]);
    }

    #[test]
    fn test_encode_new_line_uses_absolute_column() {
        let encoded = encode(&[
            SemanticRange::on_line(1, 8, 9, 1, 0),
            SemanticRange::on_line(3, 2, 6, 2, 0),
        ])
        .unwrap();
        assert_eq!(encoded.as_slice(), &[1, 8, 1, 1, 0, 2, 2, 4, 2, 0]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let ranges = vec![
            SemanticRange::on_line(0, 0, 1, 11, 0),
            SemanticRange::on_line(0, 1, 4, 13, 0),
            SemanticRange::on_line(2, 4, 9, 6, 0),
            SemanticRange::on_line(2, 12, 13, 2, 1),
            SemanticRange::on_line(7, 0, 2, 5, 0),
        ];
        let encoded = encode(&ranges).unwrap();
        assert_eq!(decode(&encoded), ranges);
    }

    #[test]
    fn test_token_array_rejects_partial_tokens() {
        let err = TokenArray::new(vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidArgument { .. }));
    }

    #[test]
    fn test_semantic_token_conversion() {
        let array = TokenArray::new(vec![0, 3, 4, 1, 0, 1, 0, 2, 3, 1]).unwrap();
        let tokens = array.to_semantic_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].delta_line, 1);
        assert_eq!(tokens[1].token_modifiers_bitset, 1);
        assert_eq!(TokenArray::from_semantic_tokens(&tokens), array);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid range reached the encoder")]
    fn test_encode_zero_length_panics_in_debug() {
        let _ = encode(&[SemanticRange::on_line(0, 3, 3, 1, 0)]);
    }

    #[test]
    fn test_encode_cancellable() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = encode_cancellable(&[], &cancel).unwrap_err();
        assert!(err.is_cancelled());
    }

    /// Sorted single-line ranges built from (line gap, column gap, length, type, modifier).
    fn arb_sorted_ranges() -> impl Strategy<Value = Vec<SemanticRange>> {
        prop::collection::vec((0u32..3, 0u32..10, 1u32..8, 0u32..20, 0u32..4), 0..40).prop_map(
            |steps| {
                let mut line = 0;
                let mut column = 0;
                steps
                    .into_iter()
                    .map(|(line_gap, column_gap, length, token_type, modifier)| {
                        line += line_gap;
                        column = if line_gap > 0 { column_gap } else { column + column_gap };
                        SemanticRange::on_line(line, column, column + length, token_type, modifier)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(ranges in arb_sorted_ranges()) {
            let encoded = encode(&ranges).unwrap();
            prop_assert_eq!(encoded.token_count(), ranges.len());
            prop_assert_eq!(decode(&encoded), ranges);
        }
    }
}
