//! End-to-end tests of the semantic token pipeline on a Razor page.

mod helpers;

use helpers::test_fixtures::counter_page;
use razor_tokens::analysis::semantic::{
    LEGEND_TYPES, NoEmbeddedRanges, TokenArray, apply_edits, collect_host_ranges, decode, encode,
    minimal_token_edits, modifier_names,
};
use razor_tokens::config::defaults::default_settings;
use razor_tokens::analysis::ResultId;
use razor_tokens::lsp::SemanticTokensService;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{Position, Range, SemanticTokensFullDeltaResult};

fn describe(array: &TokenArray) -> Vec<String> {
    decode(array)
        .iter()
        .map(|range| {
            let mut line = format!(
                "{}:{}-{} {}",
                range.start().line,
                range.start().character,
                range.end().character,
                LEGEND_TYPES[range.token_type as usize].as_str()
            );
            for modifier in modifier_names(range.modifier) {
                line.push(' ');
                line.push_str(modifier);
            }
            line
        })
        .collect()
}

#[test]
fn test_counter_page_tokens() {
    let doc = counter_page(1, 0);
    let ranges =
        collect_host_ranges(doc.text(), doc.root(), None, true, &CancellationToken::new()).unwrap();
    let array = encode(&ranges).unwrap();

    insta::assert_json_snapshot!("counter_page_tokens", describe(&array));
}

#[test]
fn test_code_background_can_be_disabled() {
    let doc = counter_page(1, 0);
    let ranges =
        collect_host_ranges(doc.text(), doc.root(), None, false, &CancellationToken::new()).unwrap();
    assert!(ranges.iter().all(|range| range.modifier == 0));
}

#[test]
fn test_ranges_are_single_line_and_sorted() {
    let doc = counter_page(1, 3);
    let ranges =
        collect_host_ranges(doc.text(), doc.root(), None, true, &CancellationToken::new()).unwrap();

    assert!(ranges.iter().all(|range| range.length().is_some()));
    assert!(ranges.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(decode(&encode(&ranges).unwrap()), ranges);
}

#[test]
fn test_range_request_matches_full_subset() {
    let doc = counter_page(1, 0);
    let cancel = CancellationToken::new();
    let full = collect_host_ranges(doc.text(), doc.root(), None, true, &cancel).unwrap();

    let bounds = Range::new(Position::new(1, 0), Position::new(3, 0));
    let ranged = collect_host_ranges(doc.text(), doc.root(), Some(bounds), true, &cancel).unwrap();

    let expected: Vec<_> = full
        .into_iter()
        .filter(|range| (1..3).contains(&range.start().line))
        .collect();
    assert_eq!(ranged, expected);
}

#[test]
fn test_inverted_range_is_rejected() {
    let doc = counter_page(1, 0);
    let bounds = Range::new(Position::new(3, 0), Position::new(1, 0));
    let err = collect_host_ranges(
        doc.text(),
        doc.root(),
        Some(bounds),
        true,
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        razor_tokens::SemanticError::InvalidArgument { .. }
    ));
}

#[test]
fn test_edits_between_versions_reproduce_new_array() {
    let cancel = CancellationToken::new();
    let encode_doc = |extra| {
        let doc = counter_page(1, extra);
        encode(&collect_host_ranges(doc.text(), doc.root(), None, true, &cancel).unwrap()).unwrap()
    };
    let old = encode_doc(0);
    let new = encode_doc(2);

    let edits = minimal_token_edits(&old, &new, default_settings().max_diff_distance).unwrap();
    assert_eq!(apply_edits(&old, &edits).unwrap(), new.as_slice());
    assert!(edits.iter().all(|edit| edit.to_lsp().is_ok()));
}

#[tokio::test]
async fn test_service_full_then_delta() {
    let service = SemanticTokensService::new(NoEmbeddedRanges, default_settings()).unwrap();
    let cancel = CancellationToken::new();
    let v1 = counter_page(1, 0);
    let v2 = counter_page(2, 1);

    let full = service.full(&v1, &cancel).await.unwrap().unwrap();
    let previous_id = full.result_id.clone().unwrap();

    let result = service
        .full_delta(&v2, &previous_id, &cancel)
        .await
        .unwrap()
        .unwrap();
    let SemanticTokensFullDeltaResult::TokensDelta(delta) = result else {
        panic!("expected a delta, got {result:?}");
    };

    let old = TokenArray::from_semantic_tokens(&full.data);
    let edits: Vec<_> = delta
        .edits
        .iter()
        .map(|edit| razor_tokens::analysis::semantic::TokenEdit {
            start: edit.start,
            delete_count: edit.delete_count,
            data: TokenArray::from_semantic_tokens(edit.data.as_deref().unwrap_or_default())
                .as_slice()
                .to_vec(),
        })
        .collect();
    let rebuilt = apply_edits(&old, &edits).unwrap();

    let result_id = ResultId::from(delta.result_id.clone().unwrap());
    let cached = service.cache().get(v2.uri(), &result_id).unwrap().unwrap();
    assert_eq!(rebuilt, cached.as_slice());
    assert_eq!(service.cache().len_for(v2.uri()).unwrap(), 2);
}
