// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Style Cache (C7): bounded LRU interner mapping `Style` values to compact
//! `StyleKey`s, with reference counts so an in-use style is never evicted
//! out from under a live cell.
//!
//! No teacher module interns styles this way (the teacher stores `TuiStyle`
//! directly inline per cell); this is authored fresh using the "arena +
//! index" approach the teacher uses everywhere else instead of node-based
//! structures: slots live in one `Vec`, and LRU order is an intrusive
//! doubly-linked list threaded through slot indices rather than a separate
//! allocation per node. Each slot carries a generation counter (the usual
//! "generational index" trick) so a `StyleKey` captured before an eviction
//! can never silently alias a different, later style that happens to reuse
//! the same slot.

use rustc_hash::FxHashMap;

use super::style_attribs::Style;

/// Opaque handle to an interned [`Style`]. Valid only within the
/// [`StyleCache`] that produced it, and only until the entry it names is
/// evicted (after which [`StyleCache::get`] returns `None` rather than
/// aliasing whatever style later reused the slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    index: u32,
    generation: u32,
}

impl StyleKey {
    /// Reserved key for [`Style::default`], pre-interned and never evicted.
    pub const DEFAULT: StyleKey = StyleKey {
        index: 0,
        generation: 0,
    };
}

struct Slot {
    style: Style,
    refcount: u32,
    generation: u32,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded LRU-backed style interner with refcounted entries.
///
/// - `intern` looks up or inserts a style and returns its key, bumping the
///   refcount and moving the entry to most-recently-used.
/// - `release` drops a reference (called when a cell's style changes or the
///   cell is overwritten); a zero-refcount entry becomes evictable.
/// - On overflow, the least-recently-used *evictable* (refcount == 0) entry
///   is evicted. If every entry is still referenced, capacity grows and a
///   high-water-mark warning is logged once per doubling.
pub struct StyleCache {
    slots: Vec<Option<Slot>>,
    index: FxHashMap<Style, StyleKey>,
    free_list: Vec<usize>,
    lru_head: Option<usize>, // most recently used
    lru_tail: Option<usize>, // least recently used
    capacity: usize,
    next_log_threshold: usize,
}

impl StyleCache {
    #[must_use]
    pub fn new(capacity: usize, high_water_log_threshold: usize) -> Self {
        let mut cache = Self {
            slots: Vec::with_capacity(capacity.max(1)),
            index: FxHashMap::default(),
            free_list: Vec::new(),
            lru_head: None,
            lru_tail: None,
            capacity: capacity.max(1),
            next_log_threshold: high_water_log_threshold,
        };
        // Slot 0 is reserved for the default style. It holds one permanent
        // phantom reference and is never linked into the LRU list, so it can
        // never be evicted.
        cache.slots.push(Some(Slot {
            style: Style::default(),
            refcount: 1,
            generation: 0,
            prev: None,
            next: None,
        }));
        cache.index.insert(Style::default(), StyleKey::DEFAULT);
        cache
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn get(&self, key: StyleKey) -> Option<&Style> {
        match self.slots.get(key.index as usize).and_then(|s| s.as_ref()) {
            Some(slot) if slot.generation == key.generation => Some(&slot.style),
            _ => None,
        }
    }

    /// Intern `style`, returning its key. Bumps the refcount and marks it
    /// most-recently-used.
    pub fn intern(&mut self, style: Style) -> StyleKey {
        if style == Style::default() {
            return StyleKey::DEFAULT;
        }
        if let Some(&key) = self.index.get(&style) {
            self.bump_refcount(key.index, 1);
            self.touch(key.index);
            return key;
        }
        if self.len() >= self.capacity && !self.evict_one() {
            self.capacity *= 2;
            if self.capacity >= self.next_log_threshold {
                tracing::warn!(
                    capacity = self.capacity,
                    "style cache grew past its configured capacity; no evictable entries were found"
                );
                self.next_log_threshold = self.capacity * 2;
            }
        }
        let key = self.insert_slot(style);
        self.bump_refcount(key.index, 1);
        self.push_front(key.index);
        key
    }

    /// Drop one reference to `key`. Once the refcount reaches zero the entry
    /// becomes eligible for eviction (it is not removed immediately). A
    /// stale key (already evicted) is a harmless no-op.
    pub fn release(&mut self, key: StyleKey) {
        if key == StyleKey::DEFAULT {
            return;
        }
        if let Some(Some(slot)) = self.slots.get(key.index as usize)
            && slot.generation == key.generation
        {
            self.bump_refcount(key.index, -1);
        }
    }

    fn insert_slot(&mut self, style: Style) -> StyleKey {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.slots[idx]
                .as_ref()
                .map_or(0, |s| s.generation.wrapping_add(1));
            self.slots[idx] = Some(Slot {
                style,
                refcount: 0,
                generation,
                prev: None,
                next: None,
            });
            (idx, generation)
        } else {
            self.slots.push(Some(Slot {
                style,
                refcount: 0,
                generation: 0,
                prev: None,
                next: None,
            }));
            (self.slots.len() - 1, 0)
        };
        let key = StyleKey {
            index: idx as u32,
            generation,
        };
        self.index.insert(style, key);
        key
    }

    fn bump_refcount(&mut self, idx: u32, delta: i64) {
        if let Some(Some(slot)) = self.slots.get_mut(idx as usize) {
            let new_count = i64::from(slot.refcount) + delta;
            slot.refcount = new_count.max(0) as u32;
        }
    }

    fn touch(&mut self, idx: u32) {
        if self.slots.get(idx as usize).and_then(|s| s.as_ref()).is_some() {
            self.unlink(idx as usize);
            self.push_front(idx as usize);
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.lru_head;
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(old_head_idx) = old_head
            && let Some(slot) = self.slots[old_head_idx].as_mut()
        {
            slot.prev = Some(idx);
        }
        self.lru_head = Some(idx);
        if self.lru_tail.is_none() {
            self.lru_tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(slot) => (slot.prev, slot.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(slot) = self.slots[p].as_mut() {
                    slot.next = next;
                }
            }
            None => self.lru_head = next,
        }
        match next {
            Some(n) => {
                if let Some(slot) = self.slots[n].as_mut() {
                    slot.prev = prev;
                }
            }
            None => self.lru_tail = prev,
        }
    }

    /// Walk from the LRU end looking for an evictable (refcount == 0,
    /// non-default) entry. Returns `true` if one was evicted.
    fn evict_one(&mut self) -> bool {
        let mut cursor = self.lru_tail;
        while let Some(idx) = cursor {
            let (refcount, prev, style) = match self.slots[idx].as_ref() {
                Some(slot) => (slot.refcount, slot.prev, slot.style),
                None => break,
            };
            if idx != 0 && refcount == 0 {
                self.unlink(idx);
                self.slots[idx] = None;
                self.index.remove(&style);
                self.free_list.push(idx);
                return true;
            }
            cursor = prev;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::color::Color;

    fn styled(fg: u8) -> Style {
        Style {
            fg: Color::Indexed(fg),
            ..Default::default()
        }
    }

    #[test]
    fn default_style_is_preinterned_at_key_zero() {
        let cache = StyleCache::new(4, 1000);
        assert_eq!(cache.get(StyleKey::DEFAULT), Some(&Style::default()));
    }

    #[test]
    fn identical_styles_intern_to_the_same_key() {
        let mut cache = StyleCache::new(4, 1000);
        let a = cache.intern(styled(1));
        let b = cache.intern(styled(1));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_styles_get_distinct_keys() {
        let mut cache = StyleCache::new(4, 1000);
        let a = cache.intern(styled(1));
        let b = cache.intern(styled(2));
        assert_ne!(a, b);
    }

    #[test]
    fn eviction_skips_referenced_entries() {
        let mut cache = StyleCache::new(1, 1000);
        let kept = cache.intern(styled(1));
        let _ = cache.intern(styled(2));
        assert!(cache.get(kept).is_some(), "referenced style must survive");
    }

    #[test]
    fn released_entry_becomes_evictable_and_old_key_goes_stale() {
        let mut cache = StyleCache::new(1, 1000);
        let first = cache.intern(styled(1));
        cache.release(first);
        let _ = cache.intern(styled(2));
        assert!(
            cache.get(first).is_none(),
            "evicted key must not resolve, even if its slot was reused"
        );
    }

    #[test]
    fn capacity_grows_when_nothing_is_evictable() {
        let mut cache = StyleCache::new(1, 1000);
        let a = cache.intern(styled(1));
        let b = cache.intern(styled(2));
        assert!(cache.get(a).is_some());
        assert!(cache.get(b).is_some());
        assert!(cache.capacity() > 1);
    }
}
