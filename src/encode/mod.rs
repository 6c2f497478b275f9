// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key/mouse encoding (§6 EXPANDED): the host-facing half of the input
//! contract. The core never generates key or mouse events itself (it has no
//! input device); it only turns host-supplied semantic events into the byte
//! sequences the currently active modes call for.
//!
//! Grounded in the teacher's `core::ansi::constants::input_sequences` /
//! `core::ansi::constants::mouse` constant tables (xterm's documented
//! encodings) and its `generator::input_event_generator` shape, since that
//! is where the teacher already enumerates the same repertoire for its own
//! `crossterm`-sourced key events -- generalized here to free functions over
//! this crate's own `KeyCode`/`Modifiers`/`MouseEvent` types rather than
//! `crossterm`'s (a dropped dependency, see DESIGN.md), and returning
//! `smallvec`-backed buffers instead of `String`s since the output is
//! always raw bytes for an outbound channel.

mod key;
mod mouse;

pub use key::{encode_key, KeyCode, Modifiers};
pub use mouse::{encode_mouse, MouseButton, MouseEvent, MouseEventKind};

/// Inline-storage output buffer: the longest sequence this module emits
/// (an SGR mouse report with 3-digit coordinates) is well under 16 bytes.
pub type EncodedBytes = smallvec::SmallVec<[u8; 16]>;
