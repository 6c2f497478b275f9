/*
 *   Copyright (c) 2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! # `r3bl_term_core`
//!
//! A terminal emulator core: an ANSI/VT byte-stream parser driving a
//! two-dimensional styled cell grid with scrollback, damage tracking, and a
//! snapshot/diff API for an external renderer to consume.
//!
//! This crate has no opinion on how bytes reach it (PTY, network, test
//! fixture) or how a [`snapshot::Snapshot`]/[`snapshot::Diff`] gets painted.
//! It owns exactly one thing: turning a byte stream that conforms to
//! ECMA-48/DEC VT100-and-later conventions into grid state, plus the
//! out-of-band signals (title changes, bell, hyperlinks, host replies) a
//! terminal emulator's screen model is expected to produce alongside it.
//!
//! ## Layout
//!
//! - [`emulator`] — the `Emulator`: owns the buffer, cursor, modes, style
//!   cache, and damage tracker, and exposes the public `feed_bytes`/
//!   `snapshot`/`diff`/`resize` API. This is the crate's front door.
//! - [`parser`] — a thin [`vte::Perform`] shim translating the VT500 state
//!   machine's callbacks into `Emulator` method calls.
//! - [`buffer`] — the primary/alternate grid pair, scrollback ring, and the
//!   `Cell`/`Row` types they're built from.
//! - [`style`] — the `Style`/`Color` model and the bounded `StyleCache`
//!   interner cells reference by key rather than by value.
//! - [`damage`] — per-row dirty tracking consumed by `Emulator::take_damage`.
//! - [`snapshot`] — pure-read `Snapshot`/`Diff` output forms, dereferenced
//!   from the live style cache so they outlive any particular interning
//!   generation.
//! - [`decoder`] — UTF-8 to grapheme-cluster accumulation feeding `print`.
//! - [`events`] — the out-of-band `EmulatorEvent` enum.
//! - [`encode`] — the host-facing half of the contract: turning semantic key
//!   and mouse events back into the byte sequences the active modes expect.
//! - [`config`] — construction-time tunables ([`config::TermCoreConfig`]).
//! - [`error`] — the small `Result`-returning error taxonomy
//!   ([`error::TermCoreError`]).
//!
//! ## Example
//!
//! ```
//! use r3bl_term_core::{Emulator, TermCoreConfig};
//!
//! let mut emulator = Emulator::new(TermCoreConfig::new(80, 24));
//! let events = emulator.feed_bytes(b"\x1b[1;31mhello\x1b[0m");
//! assert!(events.is_empty());
//!
//! let damage = emulator.take_damage();
//! let diff = emulator.diff(&damage);
//! assert!(!diff.changed_rows.is_empty());
//! ```

pub mod buffer;
pub mod config;
pub mod damage;
pub mod decoder;
pub mod emulator;
pub mod encode;
pub mod error;
pub mod events;
pub(crate) mod parser;
pub mod snapshot;
pub mod style;

pub use config::TermCoreConfig;
pub use damage::Damage;
pub use emulator::Emulator;
pub use error::{TermCoreError, TermCoreResult};
pub use events::EmulatorEvent;
pub use snapshot::{apply_diff, CursorSnapshot, Diff, ResolvedCell, Snapshot, SnapshotRow};
