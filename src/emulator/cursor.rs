// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cursor state: position, pen style, charset, and save/restore snapshot.

use crate::style::Style;

use super::charset::CharsetState;

#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    /// The "pen": the style applied to the next printed cell, mutated by
    /// SGR.
    pub style: Style,
    pub charsets: CharsetState,
    /// Set when the cursor sits at `col == cols` (one past the right
    /// margin); the next printable triggers wrap-and-print.
    pub pending_wrap: bool,
    /// DECOM: cursor addressing is relative to the scroll region.
    pub origin_mode: bool,
}

impl Cursor {
    #[must_use]
    pub fn home() -> Self {
        Self {
            row: 0,
            col: 0,
            style: Style::default(),
            charsets: CharsetState::default(),
            pending_wrap: false,
            origin_mode: false,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::home()
    }
}
