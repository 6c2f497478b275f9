// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Snapshot / Diff API (C8): pure-read output forms for an external
//! renderer.
//!
//! No teacher module has an intermediate snapshot representation — it
//! renders straight from `OffscreenBuffer`. `Snapshot`/`Diff` are authored
//! fresh as plain owned structs (styles dereferenced, not style-keys) so
//! that `apply_diff` is pure data manipulation with no borrow on the
//! emulator, and so the round-trip testable property (§8.4) is a direct
//! `assert_eq!` between two owned values.

use crate::{
    buffer::{Cell, Grid},
    damage::Damage,
    style::{Style, StyleCache},
};

/// One resolved cell: grapheme plus its fully dereferenced style (no
/// `StyleKey` indirection — a snapshot outlives the style cache generation
/// it was taken from).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCell {
    pub grapheme: String,
    pub style: Style,
    pub wide_left: bool,
    pub wide_right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub cells: Vec<ResolvedCell>,
    pub wrapped: bool,
}

fn resolve_row(row: &crate::buffer::Row, styles: &StyleCache) -> SnapshotRow {
    SnapshotRow {
        cells: row
            .cells
            .iter()
            .map(|c: &Cell| ResolvedCell {
                grapheme: c.grapheme.to_string(),
                style: styles.get(c.style_key).copied().unwrap_or_default(),
                wide_left: c.flags.wide_left,
                wide_right: c.flags.wide_right,
            })
            .collect(),
        wrapped: row.wrapped,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub row: usize,
    pub col: usize,
    pub visible: bool,
}

/// Full snapshot: dimensions, dereferenced buffer contents, cursor state.
/// Mode flags are intentionally not embedded here — a host that needs them
/// reads [`crate::emulator::Emulator::modes`] directly, since they change
/// independently of cell content and are cheap to read live.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: Vec<SnapshotRow>,
    pub cursor: CursorSnapshot,
}

impl Snapshot {
    #[must_use]
    pub fn capture(grid: &Grid, styles: &StyleCache, cursor: CursorSnapshot) -> Self {
        Self {
            cols: grid.cols(),
            rows: grid.all_rows().iter().map(|r| resolve_row(r, styles)).collect(),
            cursor,
        }
    }
}

/// Incremental diff: changed rows (full new contents) plus cursor and scroll
/// deltas. `scrolled` is advisory only (e.g. for a renderer's scroll-blit
/// fast path); round-trip correctness only depends on `changed_rows` and
/// `cursor`, since every row whose content changed — including rows shifted
/// by a scroll — is already listed there.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub changed_rows: Vec<(usize, SnapshotRow)>,
    pub cursor: CursorSnapshot,
    pub scrolled: i64,
}

impl Diff {
    #[must_use]
    pub fn capture(
        grid: &Grid,
        styles: &StyleCache,
        damage: &Damage,
        cursor: CursorSnapshot,
    ) -> Self {
        Self {
            changed_rows: damage
                .dirty_rows
                .iter()
                .filter_map(|&r| grid.all_rows().get(r).map(|row| (r, resolve_row(row, styles))))
                .collect(),
            cursor,
            scrolled: damage.scrolled,
        }
    }
}

/// Apply `diff` to `prev`, reproducing the state the diff was captured
/// against (testable property 4). Pure: does not mutate `prev` or any live
/// buffer/damage state.
#[must_use]
pub fn apply_diff(prev: &Snapshot, diff: &Diff) -> Snapshot {
    let mut next = prev.clone();
    for (row_index, new_row) in &diff.changed_rows {
        if let Some(slot) = next.rows.get_mut(*row_index) {
            *slot = new_row.clone();
        }
    }
    next.cursor = diff.cursor;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer::Grid, style::StyleKey};

    #[test]
    fn snapshot_round_trip_via_diff() {
        let styles = StyleCache::new(16, 1000);
        let mut grid = Grid::new(3, 2);
        let before = Snapshot::capture(&grid, &styles, CursorSnapshot { row: 0, col: 0, visible: true });

        grid.put(1, 0, Cell::new("z", StyleKey::DEFAULT));
        let mut damage = crate::damage::DamageTracker::new(2);
        damage.mark_row_dirty(1);
        damage.mark_cursor_moved();
        let drained = damage.take_damage();
        let cursor_after = CursorSnapshot { row: 1, col: 1, visible: true };
        let diff = Diff::capture(&grid, &styles, &drained, cursor_after);

        let after = Snapshot::capture(&grid, &styles, cursor_after);
        let reconstructed = apply_diff(&before, &diff);
        assert_eq!(reconstructed, after);
    }
}
