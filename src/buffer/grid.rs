// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Screen Buffer grid operations (C4): the rectangular `cols x rows` array
//! of cells, scrolling, line/char insert-delete, and resize/reflow.

use super::{cell::Cell, row::Row, scrollback::Scrollback};

/// One `cols x rows` rectangular grid of cells.
#[derive(Debug)]
pub struct Grid {
    rows: Vec<Row>,
    cols: usize,
}

impl Grid {
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| Row::new(cols)).collect(),
            cols,
        }
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row(&self, r: usize) -> &Row {
        &self.rows[r]
    }

    #[must_use]
    pub fn row_mut(&mut self, r: usize) -> &mut Row {
        &mut self.rows[r]
    }

    #[must_use]
    pub fn all_rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> &Cell {
        &self.rows[r].cells[c]
    }

    /// Write a cell at `(r, c)`. The caller (the emulator) is responsible
    /// for marking the row dirty in the damage tracker; `Grid` itself has
    /// no damage-tracker reference, keeping C4 and C6 decoupled.
    pub fn put(&mut self, r: usize, c: usize, cell: Cell) {
        self.rows[r].cells[c] = cell;
    }

    /// Fill every cell in `[top..=bottom] x [left..=right]` with `cell`.
    /// Returns the set of affected row indices for the caller to mark dirty.
    pub fn clear_region(
        &mut self,
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
        cell: Cell,
    ) -> Vec<usize> {
        let mut touched = Vec::new();
        for r in top..=bottom.min(self.rows.len().saturating_sub(1)) {
            for c in left..=right.min(self.cols.saturating_sub(1)) {
                self.rows[r].cells[c] = cell.clone();
            }
            touched.push(r);
        }
        touched
    }

    /// Shift rows `[top..=bottom]` up by `n`, filling the vacated bottom
    /// rows with `fill`. Rows scrolled off the top of the region are
    /// returned (caller pushes them to scrollback only when scrolling the
    /// primary buffer's full-screen region).
    pub fn scroll_up(&mut self, top: usize, bottom: usize, n: usize, fill: &Cell) -> Vec<Row> {
        let region_len = bottom + 1 - top;
        let n = n.min(region_len);
        let mut evicted = Vec::with_capacity(n);
        for _ in 0..n {
            evicted.push(self.rows.remove(top));
            self.rows.insert(bottom, Row {
                cells: vec![fill.clone(); self.cols],
                wrapped: false,
            });
        }
        evicted
    }

    /// Returns the rows discarded off the bottom of the region (caller
    /// releases any style references they hold).
    pub fn scroll_down(&mut self, top: usize, bottom: usize, n: usize, fill: &Cell) -> Vec<Row> {
        let region_len = bottom + 1 - top;
        let n = n.min(region_len);
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            discarded.push(self.rows.remove(bottom));
            self.rows.insert(top, Row {
                cells: vec![fill.clone(); self.cols],
                wrapped: false,
            });
        }
        discarded
    }

    /// Insert `n` blank lines at row `r`, within `[r..=bottom]`; lines
    /// pushed past `bottom` are discarded (never sent to scrollback) and
    /// returned so the caller can release their style references.
    pub fn insert_lines(&mut self, r: usize, bottom: usize, n: usize, fill: &Cell) -> Vec<Row> {
        let n = n.min(bottom + 1 - r);
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            discarded.push(self.rows.remove(bottom));
            self.rows.insert(r, Row {
                cells: vec![fill.clone(); self.cols],
                wrapped: false,
            });
        }
        discarded
    }

    pub fn delete_lines(&mut self, r: usize, bottom: usize, n: usize, fill: &Cell) -> Vec<Row> {
        let n = n.min(bottom + 1 - r);
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            discarded.push(self.rows.remove(r));
            self.rows.insert(bottom, Row {
                cells: vec![fill.clone(); self.cols],
                wrapped: false,
            });
        }
        discarded
    }

    /// Shift cells `[c..=right_margin]` of row `r` right by `n`, dropping
    /// cells pushed past `right_margin` (returned for style release).
    pub fn insert_chars(
        &mut self,
        r: usize,
        c: usize,
        right_margin: usize,
        n: usize,
        fill: &Cell,
    ) -> Vec<Cell> {
        let row = &mut self.rows[r];
        let end = right_margin.min(row.cells.len() - 1);
        let n = n.min(end + 1 - c);
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            discarded.push(row.cells.remove(end));
            row.cells.insert(c, fill.clone());
        }
        discarded
    }

    pub fn delete_chars(
        &mut self,
        r: usize,
        c: usize,
        right_margin: usize,
        n: usize,
        fill: &Cell,
    ) -> Vec<Cell> {
        let row = &mut self.rows[r];
        let end = right_margin.min(row.cells.len() - 1);
        let n = n.min(end + 1 - c);
        let mut discarded = Vec::with_capacity(n);
        for _ in 0..n {
            discarded.push(row.cells.remove(c));
            row.cells.insert(end, fill.clone());
        }
        discarded
    }

    /// Same-width resize (§4.4 policy 1): trim or extend rows at the
    /// bottom. If shrinking would put `cursor_row` out of bounds, rows are
    /// instead peeled off the *top* first -- just enough to bring the
    /// cursor's logical line back into view -- so "scrollback absorbs the
    /// shifted content [and] cursor remains on the same logical line"; any
    /// further shrinkage beyond that trims unused rows off the bottom,
    /// discarded outright. Returns `(scrollback_candidates, discarded,
    /// new_cursor_row)`; only the former were peeled off the top and are
    /// eligible for `Scrollback::push` by the caller.
    pub fn resize_same_width(&mut self, new_rows: usize, cursor_row: usize) -> (Vec<Row>, Vec<Row>, usize) {
        let old_len = self.rows.len();
        if old_len > new_rows {
            let overflow = old_len - new_rows;
            let shift = cursor_row.saturating_sub(new_rows.saturating_sub(1)).min(overflow);
            let mut from_top = Vec::with_capacity(shift);
            for _ in 0..shift {
                from_top.push(self.rows.remove(0));
            }
            let remaining = overflow - shift;
            let mut from_bottom = Vec::with_capacity(remaining);
            for _ in 0..remaining {
                from_bottom.push(self.rows.pop().expect("old_len > new_rows >= 1, so rows is non-empty"));
            }
            let new_cursor_row = cursor_row.saturating_sub(shift).min(new_rows.saturating_sub(1));
            (from_top, from_bottom, new_cursor_row)
        } else {
            while self.rows.len() < new_rows {
                self.rows.push(Row::new(self.cols));
            }
            (Vec::new(), Vec::new(), cursor_row)
        }
    }

    /// Reflow to `new_cols` (§4.4 policy 2): concatenate wrapped-chain rows
    /// into logical lines, rewrap to the new width without ever splitting a
    /// wide glyph, and reset `cols`. Scrollback lines are reflowed the same
    /// way by the caller if desired (scrollback reflow is not required by
    /// the spec and is not performed automatically here).
    pub fn reflow(&mut self, new_cols: usize) {
        self.reflow_with_cursor(new_cols, (0, 0));
    }

    /// Like [`Self::reflow`], but also re-anchors `cursor` (row, col) to the
    /// same character position within its logical line (§4.4 policy 2),
    /// returning the new `(row, col)`.
    pub fn reflow_with_cursor(&mut self, new_cols: usize, cursor: (usize, usize)) -> (usize, usize) {
        let old_rows = std::mem::take(&mut self.rows);
        let (logical_lines, cursor_locus) = group_into_logical_lines(old_rows, cursor);
        let mut new_rows = Vec::new();
        let mut new_cursor = None;
        for (line_idx, line) in logical_lines.into_iter().enumerate() {
            let line_start_row = new_rows.len();
            let rewrapped = rewrap_logical_line(line, new_cols);
            let rewrapped_len = rewrapped.len();
            if let Some((target_line, flat_col)) = cursor_locus
                && target_line == line_idx
            {
                let row_off = (flat_col / new_cols).min(rewrapped_len.saturating_sub(1));
                let col = (flat_col % new_cols).min(new_cols.saturating_sub(1));
                new_cursor = Some((line_start_row + row_off, col));
            }
            new_rows.extend(rewrapped);
        }
        if new_rows.is_empty() {
            new_rows.push(Row::new(new_cols));
        }
        self.cols = new_cols;
        self.rows = new_rows;
        new_cursor.unwrap_or((0, cursor.1.min(new_cols.saturating_sub(1))))
    }
}

/// Concatenate chains of `wrapped`-linked rows into logical lines (each a
/// flat `Vec<Cell>`), tracking which logical line `cursor` (row, col) falls
/// in and its flat cell-offset within that line (so the caller can re-anchor
/// it after rewrapping).
fn group_into_logical_lines(
    rows: Vec<Row>,
    cursor: (usize, usize),
) -> (Vec<Vec<Cell>>, Option<(usize, usize)>) {
    let mut lines = Vec::new();
    let mut current: Vec<Cell> = Vec::new();
    let mut cursor_locus = None;
    let mut line_idx = 0usize;
    for (row_idx, row) in rows.into_iter().enumerate() {
        let was_wrapped = row.wrapped;
        if row_idx == cursor.0 {
            cursor_locus = Some((line_idx, current.len() + cursor.1));
        }
        current.extend(row.cells);
        if !was_wrapped {
            lines.push(std::mem::take(&mut current));
            line_idx += 1;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    (lines, cursor_locus)
}

/// Rewrap one logical line's cells into `new_cols`-wide physical rows,
/// never splitting a wide-left/wide-right pair across a row boundary.
fn rewrap_logical_line(cells: Vec<Cell>, new_cols: usize) -> Vec<Row> {
    let mut out = Vec::new();
    let mut current: Vec<Cell> = Vec::with_capacity(new_cols);
    let mut i = 0;
    while i < cells.len() {
        let cell = &cells[i];
        let needed = if cell.flags.wide_left { 2 } else { 1 };
        if current.len() + needed > new_cols {
            current.resize_with(new_cols, Cell::default);
            out.push(Row {
                cells: std::mem::replace(&mut current, Vec::with_capacity(new_cols)),
                wrapped: true,
            });
        }
        current.push(cell.clone());
        if cell.flags.wide_left && i + 1 < cells.len() {
            current.push(cells[i + 1].clone());
            i += 1;
        }
        i += 1;
    }
    current.resize_with(new_cols, Cell::default);
    out.push(Row {
        cells: current,
        wrapped: false,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleKey;

    #[test]
    fn put_and_get_roundtrip() {
        let mut g = Grid::new(4, 2);
        g.put(0, 1, Cell::new("x", StyleKey::DEFAULT));
        assert_eq!(g.get(0, 1).grapheme.as_str(), "x");
    }

    #[test]
    fn clear_region_fills_and_reports_touched_rows() {
        let mut g = Grid::new(4, 3);
        let touched = g.clear_region(0, 1, 0, 3, Cell::new("*", StyleKey::DEFAULT));
        assert_eq!(touched, vec![0, 1]);
        assert_eq!(g.get(1, 3).grapheme.as_str(), "*");
        assert_eq!(g.get(2, 0).grapheme.as_str(), " ");
    }

    #[test]
    fn scroll_up_evicts_top_row_and_fills_bottom() {
        let mut g = Grid::new(2, 3);
        g.put(0, 0, Cell::new("a", StyleKey::DEFAULT));
        g.put(1, 0, Cell::new("b", StyleKey::DEFAULT));
        let evicted = g.scroll_up(0, 2, 1, &Cell::default());
        assert_eq!(evicted[0].cells[0].grapheme.as_str(), "a");
        assert_eq!(g.get(0, 0).grapheme.as_str(), "b");
        assert_eq!(g.get(2, 0).grapheme.as_str(), " ");
    }

    #[test]
    fn reflow_wider_concatenates_wrapped_rows() {
        let mut g = Grid::new(2, 2);
        g.put(0, 0, Cell::new("a", StyleKey::DEFAULT));
        g.put(0, 1, Cell::new("b", StyleKey::DEFAULT));
        g.row_mut(0).wrapped = true;
        g.put(1, 0, Cell::new("c", StyleKey::DEFAULT));
        g.put(1, 1, Cell::new("d", StyleKey::DEFAULT));
        g.reflow(4);
        assert_eq!(g.cols(), 4);
        let joined: String = g.row(0).cells.iter().take(4).map(|c| c.grapheme.as_str()).collect();
        assert_eq!(joined, "abcd");
    }

    #[test]
    fn reflow_never_splits_a_wide_glyph() {
        let mut g = Grid::new(3, 1);
        g.put(0, 0, Cell::new("a", StyleKey::DEFAULT));
        g.put(0, 1, Cell::wide_left("\u{4e2d}", StyleKey::DEFAULT));
        g.put(0, 2, Cell::wide_right(StyleKey::DEFAULT));
        g.reflow(2);
        assert_eq!(g.row(0).cells[0].grapheme.as_str(), "a");
        assert!(g.row(0).cells[1] == Cell::default());
        assert!(g.row(0).wrapped);
        assert!(g.row(1).cells[0].flags.wide_left);
    }

    #[test]
    fn resize_same_width_shrinks_from_bottom_when_cursor_fits() {
        let mut g = Grid::new(2, 5);
        let (from_top, from_bottom, new_row) = g.resize_same_width(3, 1);
        assert!(from_top.is_empty());
        assert_eq!(from_bottom.len(), 2);
        assert_eq!(new_row, 1);
        assert_eq!(g.rows(), 3);
    }

    #[test]
    fn resize_same_width_shrinks_from_top_when_cursor_would_be_clipped() {
        let mut g = Grid::new(2, 5);
        g.put(4, 0, Cell::new("x", StyleKey::DEFAULT));
        let (from_top, from_bottom, new_row) = g.resize_same_width(2, 4);
        assert_eq!(from_top.len(), 2);
        assert!(from_bottom.is_empty());
        assert_eq!(new_row, 2);
        assert_eq!(g.get(2, 0).grapheme.as_str(), "x");
    }

    #[test]
    fn reflow_with_cursor_reanchors_within_wrapped_logical_line() {
        let mut g = Grid::new(2, 2);
        g.put(0, 0, Cell::new("a", StyleKey::DEFAULT));
        g.put(0, 1, Cell::new("b", StyleKey::DEFAULT));
        g.row_mut(0).wrapped = true;
        g.put(1, 0, Cell::new("c", StyleKey::DEFAULT));
        g.put(1, 1, Cell::new("d", StyleKey::DEFAULT));
        let new_cursor = g.reflow_with_cursor(4, (1, 1));
        assert_eq!(new_cursor, (0, 3));
    }
}
