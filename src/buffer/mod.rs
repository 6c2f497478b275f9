// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Screen Buffer (C4): primary + alternate grid, scrollback, and margins.
//!
//! Grounded on the teacher's `OffscreenBuffer` (inferred from its usage in
//! `test_fixtures_ofs_buf.rs` and the ANSI-parser call sites, since the
//! struct body itself is not present in this retrieval) generalized to two
//! grids plus a real scrollback ring, neither of which the teacher's
//! single-pane `OffscreenBuffer` needs.

pub mod cell;
pub mod grid;
pub mod row;
pub mod scrollback;

pub use cell::{Cell, CellFlags, Grapheme};
pub use grid::Grid;
pub use row::Row;
pub use scrollback::Scrollback;

/// Which grid is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveGrid {
    Primary,
    Alternate,
}

/// Scrolling-region margins. Horizontal margins are only honored when
/// DECLRMM (`Modes::decl rmm`) is set; otherwise `left`/`right` are ignored
/// and the full row width applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Margins {
    #[must_use]
    pub fn full(cols: usize, rows: usize) -> Self {
        Self {
            top: 0,
            bottom: rows.saturating_sub(1),
            left: 0,
            right: cols.saturating_sub(1),
        }
    }
}

/// Two independent grids plus the scrollback that belongs to the primary
/// one. Exactly one grid is active at a time (§3 Buffer).
pub struct Buffer {
    primary: Grid,
    alternate: Grid,
    scrollback: Scrollback,
    active: ActiveGrid,
    pub margins: Margins,
}

impl Buffer {
    #[must_use]
    pub fn new(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        Self {
            primary: Grid::new(cols, rows),
            alternate: Grid::new(cols, rows),
            scrollback: Scrollback::new(scrollback_capacity),
            active: ActiveGrid::Primary,
            margins: Margins::full(cols, rows),
        }
    }

    #[must_use]
    pub fn active(&self) -> ActiveGrid {
        self.active
    }

    #[must_use]
    pub fn is_alt_screen(&self) -> bool {
        self.active == ActiveGrid::Alternate
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        match self.active {
            ActiveGrid::Primary => &self.primary,
            ActiveGrid::Alternate => &self.alternate,
        }
    }

    #[must_use]
    pub fn grid_mut(&mut self) -> &mut Grid {
        match self.active {
            ActiveGrid::Primary => &mut self.primary,
            ActiveGrid::Alternate => &mut self.alternate,
        }
    }

    #[must_use]
    pub fn primary(&self) -> &Grid {
        &self.primary
    }

    #[must_use]
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.grid().cols()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid().rows()
    }

    /// Scroll the active grid's current scroll region up by `n`. Only the
    /// primary grid, and only when the region spans the whole screen (the
    /// common case for normal-mode scroll), pushes evicted rows to
    /// scrollback — matching "only primary buffer pushes evicted top rows
    /// to scrollback" (§4.4). Returns every row whose cells are gone for
    /// good (discarded outright, or pushed out of scrollback by capacity),
    /// so the caller can release their style references.
    #[must_use]
    pub fn scroll_up(&mut self, n: usize, fill: &Cell) -> Vec<Row> {
        let Margins { top, bottom, .. } = self.margins;
        let is_primary = self.active == ActiveGrid::Primary;
        let full_screen = top == 0 && bottom == self.grid().rows().saturating_sub(1);
        let evicted = self.grid_mut().scroll_up(top, bottom, n, fill);
        if is_primary && full_screen {
            evicted
                .into_iter()
                .filter_map(|row| self.scrollback.push(row))
                .collect()
        } else {
            evicted
        }
    }

    #[must_use]
    pub fn scroll_down(&mut self, n: usize, fill: &Cell) -> Vec<Row> {
        let Margins { top, bottom, .. } = self.margins;
        self.grid_mut().scroll_down(top, bottom, n, fill)
    }

    /// Switch to the alternate screen: clear it fresh and make it active.
    /// The caller (the emulator) is responsible for cursor save/restore
    /// semantics around this call (§4.5 DECSET 1049).
    pub fn switch_to_alternate(&mut self) {
        self.alternate = Grid::new(self.primary.cols(), self.primary.rows());
        self.active = ActiveGrid::Alternate;
    }

    pub fn switch_to_primary(&mut self) {
        self.active = ActiveGrid::Primary;
    }

    /// Resize both grids. `reflow_alt` gates whether the alternate buffer
    /// also reflows on a column change; per §4.4 and the resolved open
    /// question in SPEC_FULL.md, it defaults to `false` at the call site in
    /// [`crate::emulator::Emulator::resize`]. `cursor` is the active grid's
    /// current `(row, col)`; per §4.4 the cursor is re-anchored rather than
    /// merely clamped: a same-width shrink trims from the top instead of the
    /// bottom when needed to keep the cursor's logical line in view (pushing
    /// the displaced rows to scrollback for the primary grid), and a
    /// column-width change re-anchors the cursor to the same character
    /// position within its logical line.
    ///
    /// Returns `(rows whose cells are gone for good, the active grid's new
    /// cursor position)`. The former is every row trimmed outright plus
    /// anything scrollback evicted by capacity, for style-reference release.
    #[must_use]
    pub fn resize(
        &mut self,
        new_cols: usize,
        new_rows: usize,
        reflow_alt: bool,
        cursor: (usize, usize),
    ) -> (Vec<Row>, (usize, usize)) {
        let mut released = Vec::new();
        let mut new_cursor = cursor;
        if new_cols == self.primary.cols() {
            let primary_cursor_row = if self.active == ActiveGrid::Primary { cursor.0 } else { 0 };
            let (from_top, from_bottom, new_row) =
                self.primary.resize_same_width(new_rows, primary_cursor_row);
            released.extend(from_top.into_iter().filter_map(|row| self.scrollback.push(row)));
            released.extend(from_bottom);
            if self.active == ActiveGrid::Primary {
                new_cursor = (new_row, cursor.1.min(new_cols.saturating_sub(1)));
            }

            let alt_cursor_row = if self.active == ActiveGrid::Alternate { cursor.0 } else { 0 };
            let (alt_top, alt_bottom, alt_new_row) =
                self.alternate.resize_same_width(new_rows, alt_cursor_row);
            released.extend(alt_top);
            released.extend(alt_bottom);
            if self.active == ActiveGrid::Alternate {
                new_cursor = (alt_new_row, cursor.1.min(new_cols.saturating_sub(1)));
            }
        } else {
            let primary_cursor = if self.active == ActiveGrid::Primary { cursor } else { (0, 0) };
            let (reflowed_row, reflowed_col) = self.primary.reflow_with_cursor(new_cols, primary_cursor);
            let (from_top, from_bottom, new_row) = self.primary.resize_same_width(new_rows, reflowed_row);
            released.extend(from_top.into_iter().filter_map(|row| self.scrollback.push(row)));
            released.extend(from_bottom);
            if self.active == ActiveGrid::Primary {
                new_cursor = (new_row, reflowed_col);
            }

            if reflow_alt {
                let alt_cursor = if self.active == ActiveGrid::Alternate { cursor } else { (0, 0) };
                let (alt_reflowed_row, alt_reflowed_col) = self.alternate.reflow_with_cursor(new_cols, alt_cursor);
                let (alt_top, alt_bottom, alt_new_row) =
                    self.alternate.resize_same_width(new_rows, alt_reflowed_row);
                released.extend(alt_top);
                released.extend(alt_bottom);
                if self.active == ActiveGrid::Alternate {
                    new_cursor = (alt_new_row, alt_reflowed_col);
                }
            } else {
                self.alternate = Grid::new(new_cols, new_rows);
                if self.active == ActiveGrid::Alternate {
                    new_cursor = (0, 0);
                }
            }
        }
        self.margins = Margins::full(new_cols, new_rows);
        (released, new_cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleKey;

    #[test]
    fn new_buffer_starts_on_primary() {
        let buf = Buffer::new(10, 5, 100);
        assert_eq!(buf.active(), ActiveGrid::Primary);
        assert!(!buf.is_alt_screen());
    }

    #[test]
    fn alt_screen_roundtrip_preserves_primary_contents() {
        let mut buf = Buffer::new(4, 2, 100);
        buf.grid_mut().put(0, 0, Cell::new("p", StyleKey::DEFAULT));
        buf.switch_to_alternate();
        buf.grid_mut().put(0, 0, Cell::new("a", StyleKey::DEFAULT));
        buf.switch_to_primary();
        assert_eq!(buf.grid().get(0, 0).grapheme.as_str(), "p");
    }

    #[test]
    fn scroll_up_on_primary_full_screen_feeds_scrollback() {
        let mut buf = Buffer::new(2, 2, 100);
        buf.grid_mut().put(0, 0, Cell::new("x", StyleKey::DEFAULT));
        let _ = buf.scroll_up(1, &Cell::default());
        assert_eq!(buf.scrollback().len(), 1);
        assert_eq!(buf.scrollback().get(0).unwrap().cells[0].grapheme.as_str(), "x");
    }

    #[test]
    fn alt_screen_scroll_does_not_touch_scrollback() {
        let mut buf = Buffer::new(2, 2, 100);
        buf.switch_to_alternate();
        let _ = buf.scroll_up(1, &Cell::default());
        assert_eq!(buf.scrollback().len(), 0);
    }
}
