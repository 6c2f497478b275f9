// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte decoder (C1): UTF-8 decoding and grapheme/width classification.
//!
//! [`vte::Parser`] already performs the actual UTF-8 state-machine work
//! (invalid sequences become U+FFFD before `Perform::print` is ever called),
//! so this module's job is one layer up: group the stream of `char`s that
//! `Perform::print` delivers one-at-a-time back into grapheme clusters (so a
//! base letter plus combining marks, or a ZWJ emoji sequence, becomes one
//! [`crate::buffer::Cell`]) and classify each cluster's display width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A decoded token, used by [`decode_str`] for standalone/offline decoding
/// and testing. The live parser path (see [`crate::parser`]) consumes
/// `vte::Perform::print` calls directly through [`GraphemeAccumulator`]
/// rather than constructing these tokens, since `vte` has already resolved
/// UTF-8 validity by the time `print` is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    C0(u8),
    C1(u8),
    Printable(String, usize),
    Invalid(Vec<u8>),
}

/// Decode a complete, already-available byte slice into tokens. Useful for
/// tests and for hosts that want to classify text outside of the live
/// `vte`-driven path.
#[must_use]
pub fn decode_str(bytes: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut acc = GraphemeAccumulator::new();
    match core::str::from_utf8(bytes) {
        Ok(s) => {
            for g in s.graphemes(true) {
                if let Some(ch) = g.chars().next()
                    && g.chars().count() == 1
                    && (ch as u32) < 0x20
                {
                    if let Some((grapheme, width)) = acc.flush() {
                        tokens.push(Token::Printable(grapheme, width));
                    }
                    tokens.push(classify_control(ch as u8));
                    continue;
                }
                if let Some((grapheme, width)) = acc.push_grapheme(g) {
                    tokens.push(Token::Printable(grapheme, width));
                }
            }
        }
        Err(_) => tokens.push(Token::Invalid(bytes.to_vec())),
    }
    if let Some((grapheme, width)) = acc.flush() {
        tokens.push(Token::Printable(grapheme, width));
    }
    tokens
}

fn classify_control(byte: u8) -> Token {
    if byte < 0x20 || byte == 0x7F {
        Token::C0(byte)
    } else {
        Token::C1(byte)
    }
}

/// Width of a single grapheme cluster, clamped to `{1, 2}` per the spec's
/// `Printable(grapheme, width)` contract (zero-width combining marks resolve
/// to the width of their base character, which the cluster already carries).
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    match UnicodeWidthStr::width(grapheme) {
        0 => 1,
        1 => 1,
        _ => 2,
    }
}

/// Buffers `char`s delivered one at a time (as `vte::Perform::print` does)
/// and flushes completed grapheme clusters.
///
/// A single lookahead char is enough: appending a char to the pending buffer
/// either still forms one grapheme cluster (keep accumulating) or it
/// doesn't, in which case the previously pending cluster is complete and is
/// flushed before the new char starts a fresh one.
#[derive(Debug, Default)]
pub struct GraphemeAccumulator {
    pending: String,
}

impl GraphemeAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded `char`. Returns a completed `(grapheme, width)` pair
    /// if feeding this char closed out a previous cluster.
    #[must_use]
    pub fn push(&mut self, ch: char) -> Option<(String, usize)> {
        if self.pending.is_empty() {
            self.pending.push(ch);
            return None;
        }
        let mut probe = self.pending.clone();
        probe.push(ch);
        if probe.graphemes(true).count() == 1 {
            self.pending = probe;
            return None;
        }
        let completed = std::mem::take(&mut self.pending);
        let width = grapheme_width(&completed);
        self.pending.push(ch);
        Some((completed, width))
    }

    fn push_grapheme(&mut self, grapheme: &str) -> Option<(String, usize)> {
        let mut out = None;
        for ch in grapheme.chars() {
            if let Some(done) = self.push(ch) {
                out = Some(done);
            }
        }
        out
    }

    /// Flush any pending partial cluster, e.g. at end of stream or before a
    /// control/escape sequence interrupts a run of printables.
    #[must_use]
    pub fn flush(&mut self) -> Option<(String, usize)> {
        if self.pending.is_empty() {
            return None;
        }
        let completed = std::mem::take(&mut self.pending);
        let width = grapheme_width(&completed);
        Some((completed, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_printables_flush_one_at_a_time() {
        let mut acc = GraphemeAccumulator::new();
        assert_eq!(acc.push('H'), None);
        assert_eq!(acc.push('i'), Some(("H".to_string(), 1)));
        assert_eq!(acc.flush(), Some(("i".to_string(), 1)));
    }

    #[test]
    fn combining_mark_joins_base_char() {
        let mut acc = GraphemeAccumulator::new();
        assert_eq!(acc.push('e'), None);
        // U+0301 COMBINING ACUTE ACCENT.
        assert_eq!(acc.push('\u{0301}'), None);
        assert_eq!(acc.push('x'), Some(("e\u{0301}".to_string(), 1)));
        assert_eq!(acc.flush(), Some(("x".to_string(), 1)));
    }

    #[test]
    fn wide_char_reports_width_two() {
        let mut acc = GraphemeAccumulator::new();
        acc.push('\u{4e2d}'); // CJK "middle".
        let (grapheme, width) = acc.flush().unwrap();
        assert_eq!(grapheme, "\u{4e2d}");
        assert_eq!(width, 2);
    }

    #[test]
    fn decode_str_classifies_control_and_printable() {
        let tokens = decode_str(b"A\x07B");
        assert_eq!(
            tokens,
            vec![
                Token::Printable("A".to_string(), 1),
                Token::C0(0x07),
                Token::Printable("B".to_string(), 1),
            ]
        );
    }

    #[test]
    fn decode_str_flags_invalid_utf8() {
        let tokens = decode_str(&[0xFF, 0xFE]);
        assert_eq!(tokens, vec![Token::Invalid(vec![0xFF, 0xFE])]);
    }
}
