// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Out-of-band events (§6 EXPANDED): title changes, bell, DCS pass-through,
//! hyperlinks, and host-reply bytes, drained alongside damage after each
//! [`crate::emulator::Emulator::feed_bytes`] call.
//!
//! Modeled as an owned `Vec<EmulatorEvent>` rather than a callback registry
//! or trait-object hook, matching the teacher's preference for explicit
//! owned return values over closures at its API boundaries (`feed_bytes`
//! returns a `Vec<EmulatorEvent>` the same way `take_damage` returns an
//! owned `Damage`).

/// One out-of-band signal produced while applying a batch of input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatorEvent {
    /// OSC 0 or OSC 2: set the window/icon title.
    TitleChanged(String),
    /// BEL (0x07).
    Bell,
    /// An unhandled DCS string's payload, passed through verbatim.
    DcsPassthrough(Vec<u8>),
    /// OSC 8: a hyperlink annotation for subsequently printed cells.
    Hyperlink { uri: String, id: Option<String> },
    /// Bytes the host should write back to the controlling process in
    /// response to a device query (DA, DSR, DECRQM).
    HostReply(Vec<u8>),
}
