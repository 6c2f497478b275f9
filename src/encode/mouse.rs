// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mouse encoding: SGR (1006), UTF-8 (1005), and normal/X10 (1000) mouse
//! protocols, selected by [`crate::emulator::modes::MouseProtocol`].
//!
//! Grounded in the teacher's `core::ansi::constants::mouse` prefix/button
//! constants (`MOUSE_SGR_PREFIX`, `MOUSE_X10_PREFIX`, button bit masks).

use crate::emulator::modes::{MouseProtocol, Modes};

use super::EncodedBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Scroll wheel up/down, encoded as buttons 4/5.
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release,
    /// Motion with a button held (only reported under tracking levels that
    /// request drag events; the core does not gate on tracking level since
    /// it does not generate these events, only encodes them).
    Drag(MouseButton),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// 0-based column; encoded functions add the protocol's 1-based offset.
    pub col: u16,
    pub row: u16,
}

fn button_code(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::WheelUp => 64,
        MouseButton::WheelDown => 65,
    }
}

fn event_code(kind: MouseEventKind) -> (u16, bool) {
    match kind {
        MouseEventKind::Press(b) => (button_code(b), true),
        MouseEventKind::Drag(b) => (button_code(b) + 32, true),
        MouseEventKind::Release => (3, false),
    }
}

/// Encode `event` per the currently selected [`MouseProtocol`]. Returns an
/// empty buffer if mouse reporting is off.
#[must_use]
pub fn encode_mouse(event: MouseEvent, modes: &Modes) -> EncodedBytes {
    let mut out = EncodedBytes::new();
    let (code, is_press) = event_code(event.kind);
    match modes.mouse_reporting {
        MouseProtocol::Off => {}
        MouseProtocol::Sgr => {
            out.extend_from_slice(b"\x1b[<");
            out.extend_from_slice(code.to_string().as_bytes());
            out.push(b';');
            out.extend_from_slice((event.col + 1).to_string().as_bytes());
            out.push(b';');
            out.extend_from_slice((event.row + 1).to_string().as_bytes());
            out.push(if is_press { b'M' } else { b'm' });
        }
        MouseProtocol::Utf8 => {
            out.extend_from_slice(b"\x1b[M");
            push_coord_byte(&mut out, code);
            push_coord_byte(&mut out, event.col + 1);
            push_coord_byte(&mut out, event.row + 1);
        }
        MouseProtocol::Normal => {
            out.extend_from_slice(b"\x1b[M");
            out.push((code + 32).min(255) as u8);
            out.push((event.col + 1 + 32).min(255) as u8);
            out.push((event.row + 1 + 32).min(255) as u8);
        }
    }
    out
}

/// X10/1000 coordinates are limited to a single byte (`value + 32`); UTF-8
/// mode (1005) extends this past 223 by encoding the value as a UTF-8
/// codepoint instead of clamping.
fn push_coord_byte(out: &mut EncodedBytes, value: u16) {
    let encoded = value + 32;
    if encoded < 128 {
        out.push(encoded as u8);
    } else if let Some(ch) = char::from_u32(u32::from(encoded)) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes_with(protocol: MouseProtocol) -> Modes {
        let mut m = Modes::default();
        m.mouse_reporting = protocol;
        m
    }

    #[test]
    fn off_emits_nothing() {
        let modes = Modes::default();
        let event = MouseEvent { kind: MouseEventKind::Press(MouseButton::Left), col: 0, row: 0 };
        assert!(encode_mouse(event, &modes).is_empty());
    }

    #[test]
    fn sgr_press_and_release() {
        let modes = modes_with(MouseProtocol::Sgr);
        let press = MouseEvent { kind: MouseEventKind::Press(MouseButton::Left), col: 9, row: 4 };
        assert_eq!(&*encode_mouse(press, &modes), b"\x1b[<0;10;5M");
        let release = MouseEvent { kind: MouseEventKind::Release, col: 9, row: 4 };
        assert_eq!(&*encode_mouse(release, &modes), b"\x1b[<3;10;5m");
    }

    #[test]
    fn normal_protocol_offsets_by_32() {
        let modes = modes_with(MouseProtocol::Normal);
        let press = MouseEvent { kind: MouseEventKind::Press(MouseButton::Left), col: 0, row: 0 };
        assert_eq!(&*encode_mouse(press, &modes), &[0x1b, b'[', b'M', 32, 33, 33]);
    }

    #[test]
    fn wheel_up_uses_button_64() {
        let modes = modes_with(MouseProtocol::Sgr);
        let event = MouseEvent { kind: MouseEventKind::Press(MouseButton::WheelUp), col: 0, row: 0 };
        assert_eq!(&*encode_mouse(event, &modes), b"\x1b[<64;1;1M");
    }
}
