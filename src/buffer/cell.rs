// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `Cell`: one screen position's grapheme, style reference, and flags.

use smallstr::SmallString;

use crate::style::StyleKey;

/// Inline storage for a cell's grapheme cluster. Most graphemes are a
/// single ASCII byte; `SmallString` (already a teacher dependency) avoids a
/// heap allocation for the overwhelming common case while still handling
/// multi-codepoint clusters (emoji + ZWJ, combining marks).
pub type Grapheme = SmallString<[u8; 8]>;

/// Per-cell flags. A manual bitset rather than a `bitflags`-style crate:
/// the teacher's stack has no such dependency and three booleans don't earn
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellFlags {
    /// Left half of a wide (East Asian double-width) glyph.
    pub wide_left: bool,
    /// Right half of a wide glyph; a placeholder with no glyph of its own.
    pub wide_right: bool,
    /// Protected from `ED`/`EL` erase operations invoked with the DEC
    /// selective-erase private variant. The core tracks the flag; selective
    /// erase itself is Non-goal-adjacent and not wired to any operation.
    pub protected: bool,
}

/// One screen position: grapheme, interned style, and flags.
///
/// Default cell is a space glyph with [`StyleKey::DEFAULT`], matching
/// "Default cell = space glyph + default style" in the data model.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub grapheme: Grapheme,
    pub style_key: StyleKey,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            grapheme: Grapheme::from(" "),
            style_key: StyleKey::DEFAULT,
            flags: CellFlags::default(),
        }
    }
}

impl Cell {
    #[must_use]
    pub fn new(grapheme: impl Into<Grapheme>, style_key: StyleKey) -> Self {
        Self {
            grapheme: grapheme.into(),
            style_key,
            flags: CellFlags::default(),
        }
    }

    #[must_use]
    pub fn wide_left(grapheme: impl Into<Grapheme>, style_key: StyleKey) -> Self {
        Self {
            grapheme: grapheme.into(),
            style_key,
            flags: CellFlags {
                wide_left: true,
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn wide_right(style_key: StyleKey) -> Self {
        Self {
            grapheme: Grapheme::from(""),
            style_key,
            flags: CellFlags {
                wide_right: true,
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.flags.wide_left || self.flags.wide_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_space_with_default_style() {
        let cell = Cell::default();
        assert_eq!(cell.grapheme.as_str(), " ");
        assert_eq!(cell.style_key, StyleKey::DEFAULT);
        assert!(!cell.is_wide());
    }

    #[test]
    fn wide_left_and_right_pair() {
        let left = Cell::wide_left("\u{4e2d}", StyleKey::DEFAULT);
        let right = Cell::wide_right(StyleKey::DEFAULT);
        assert!(left.flags.wide_left);
        assert!(right.flags.wide_right);
        assert!(left.is_wide() && right.is_wide());
    }
}
