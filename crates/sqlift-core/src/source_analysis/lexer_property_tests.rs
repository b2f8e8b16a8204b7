// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Round-trip** — `leading + text + trailing` over the whole stream
//!    reconstructs the input verbatim
//! 2. **Lexer never panics** — arbitrary string input always produces tokens
//! 3. **Token spans within input** — all spans satisfy `end <= input.len()`
//! 4. **Token spans are ordered** — spans don't overlap
//! 5. **EOF is always last** — `lex_with_eof` always ends with EOF
//! 6. **Lexer is deterministic** — same input, same tokens
//! 7. **Valid fragments produce no errors** — known-valid inputs lex cleanly

use proptest::prelude::*;

use super::lexer::lex_with_eof;
use super::token::Token;

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    "3.14e2",
    "0xDEAD_BEEF",
    "0b1010",
    "00755",
    "'hello'",
    "\"quoted id\"",
    "`backtick`",
    "users",
    "_private",
    "CREATE",
    "table",
    "WiThOuT",
    "(",
    ")",
    ",",
    ";",
    "=",
    "!=",
    ">=",
    "<=",
    "+",
    "-",
    "*",
    "/",
    ".",
];

/// Multi-token valid fragments that should lex cleanly.
const VALID_FRAGMENTS: &[&str] = &[
    "CREATE TABLE t (id INTEGER)",
    "PRAGMA foreign_keys = ON",
    "x >= 1",
    "lower(name)",
    "a.b.c",
    "-- comment\nCREATE",
    "/* block */ SELECT",
    "DEFAULT 'text'",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(std::string::ToString::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases; override via `PROPTEST_CASES` env var.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: trivia-and-text concatenation reconstructs the source.
    #[test]
    fn round_trip_reconstructs_any_input(input in "\\PC{0,400}") {
        let reconstructed: String = lex_with_eof(&input)
            .iter()
            .map(Token::to_source_string)
            .collect();
        prop_assert_eq!(reconstructed, input);
    }

    /// Property 2: lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = lex_with_eof(&input);
    }

    /// Property 3: all token spans are within input bounds, and span length
    /// always equals text length. Both are measured in code points, the
    /// addressing the data model prescribes, so multi-byte input catches
    /// any byte/code-point confusion.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        let input_len = u32::try_from(input.chars().count()).unwrap_or(u32::MAX);
        for token in &tokens {
            let span = token.span();
            prop_assert!(
                span.end() <= input_len,
                "Token {:?} span end {} exceeds input length {}",
                token.kind(),
                span.end(),
                input_len,
            );
            prop_assert_eq!(
                span.len() as usize,
                token.text().chars().count(),
                "span/text length mismatch for {:?}",
                token.kind(),
            );
        }
    }

    /// Property 4: token spans are non-overlapping and ordered.
    #[test]
    fn token_spans_non_overlapping(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        for window in tokens.windows(2) {
            let prev = &window[0];
            let next = &window[1];
            prop_assert!(
                next.span().start() >= prev.span().end(),
                "Overlapping spans: {:?} at {:?} and {:?} at {:?}",
                prev.kind(),
                prev.span(),
                next.kind(),
                next.span(),
            );
        }
    }

    /// Property 5: lex_with_eof always ends with exactly one EOF.
    #[test]
    fn eof_always_last(input in "\\PC{0,500}") {
        let tokens = lex_with_eof(&input);
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.last().is_some_and(|token| token.kind().is_eof()));
        let eof_count = tokens.iter().filter(|token| token.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Property 6: lexer is deterministic.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        let first = lex_with_eof(&input);
        let second = lex_with_eof(&input);
        prop_assert_eq!(first, second);
    }

    /// Property 7: known-valid single tokens produce no error tokens.
    #[test]
    fn valid_tokens_no_errors(input in valid_single_token()) {
        for token in lex_with_eof(&input) {
            prop_assert!(
                !token.kind().is_error(),
                "valid input {:?} produced error token",
                input,
            );
        }
    }

    /// Property 7b: known-valid fragments produce no error tokens.
    #[test]
    fn valid_fragments_no_errors(input in valid_fragment()) {
        for token in lex_with_eof(&input) {
            prop_assert!(
                !token.kind().is_error(),
                "valid fragment {:?} produced error token",
                input,
            );
        }
    }

    /// Keyword folding: any ASCII case permutation lexes to the same kind.
    #[test]
    fn keyword_case_permutations_fold(mask in 0u32..(1 << 7)) {
        let base = "without";
        let mutated: String = base
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if mask & (1 << i) != 0 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect();
        let base_kind = lex_with_eof(base)[0].kind();
        let mutated_kind = lex_with_eof(&mutated)[0].kind();
        prop_assert_eq!(base_kind, mutated_kind);
    }
}
