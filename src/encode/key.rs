// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key encoding: arrow/navigation/function keys, modifier encoding, and
//! DECCKM-sensitive (application vs. normal cursor-key mode) arrow output.

use crate::emulator::modes::Modes;

use super::EncodedBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Function(u8),
    Char(char),
    Enter,
    Backspace,
    Tab,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    #[must_use]
    pub fn is_none(self) -> bool {
        !self.shift && !self.alt && !self.ctrl
    }

    /// xterm's modifier parameter: 1 (none) + 1 for shift, 2 for alt, 4 for
    /// ctrl, summed. Emitted as `CSI 1 ; {modifier} {final}`.
    #[must_use]
    fn xterm_code(self) -> u8 {
        1 + u8::from(self.shift) + 2 * u8::from(self.alt) + 4 * u8::from(self.ctrl)
    }
}

/// Encode one key event given the current mode state. `DECCKM`
/// (`modes.cursor_key_application`) switches arrow/Home/End between
/// `CSI` (normal) and `SS3` (application) introducers, matching xterm.
#[must_use]
pub fn encode_key(key: KeyCode, mods: Modifiers, modes: &Modes) -> EncodedBytes {
    let mut out = EncodedBytes::new();
    match key {
        KeyCode::Up | KeyCode::Down | KeyCode::Right | KeyCode::Left => {
            let final_byte = match key {
                KeyCode::Up => b'A',
                KeyCode::Down => b'B',
                KeyCode::Right => b'C',
                KeyCode::Left => b'D',
                _ => unreachable!(),
            };
            encode_cursor_key(&mut out, final_byte, mods, modes.cursor_key_application);
        }
        KeyCode::Home => encode_cursor_key(&mut out, b'H', mods, modes.cursor_key_application),
        KeyCode::End => encode_cursor_key(&mut out, b'F', mods, modes.cursor_key_application),
        KeyCode::PageUp => encode_tilde(&mut out, 5, mods),
        KeyCode::PageDown => encode_tilde(&mut out, 6, mods),
        KeyCode::Insert => encode_tilde(&mut out, 2, mods),
        KeyCode::Delete => encode_tilde(&mut out, 3, mods),
        KeyCode::Function(n) => encode_function(&mut out, n, mods),
        KeyCode::Enter => out.push(b'\r'),
        KeyCode::Backspace => out.push(0x7f),
        KeyCode::Tab => out.push(b'\t'),
        KeyCode::Escape => out.push(0x1b),
        KeyCode::Char(ch) => encode_char(&mut out, ch, mods),
    }
    out
}

fn encode_cursor_key(out: &mut EncodedBytes, final_byte: u8, mods: Modifiers, app_mode: bool) {
    if mods.is_none() {
        out.push(0x1b);
        out.push(if app_mode { b'O' } else { b'[' });
        out.push(final_byte);
    } else {
        out.extend_from_slice(b"\x1b[1;");
        push_decimal(out, mods.xterm_code());
        out.push(final_byte);
    }
}

fn encode_tilde(out: &mut EncodedBytes, code: u16, mods: Modifiers) {
    out.extend_from_slice(b"\x1b[");
    push_decimal_u16(out, code);
    if !mods.is_none() {
        out.push(b';');
        push_decimal(out, mods.xterm_code());
    }
    out.push(b'~');
}

/// F1-F4 use SS3 (`ESC O P/Q/R/S`); F5 and up use the `CSI n~` family,
/// matching xterm's historical VT220 function-key codes.
fn encode_function(out: &mut EncodedBytes, n: u8, mods: Modifiers) {
    if (1..=4).contains(&n) && mods.is_none() {
        out.extend_from_slice(b"\x1bO");
        out.push(b'P' + (n - 1));
        return;
    }
    let code: u16 = match n {
        1 => 11,
        2 => 12,
        3 => 13,
        4 => 14,
        5 => 15,
        6 => 17,
        7 => 18,
        8 => 19,
        9 => 20,
        10 => 21,
        11 => 23,
        12 => 24,
        _ => return,
    };
    encode_tilde(out, code, mods);
}

/// A plain printable char, optionally with Ctrl (clears bits 6-7, the
/// classic "control character" transform) or Alt (ESC-prefixes the byte,
/// matching xterm's `metaSendsEscape`).
fn encode_char(out: &mut EncodedBytes, ch: char, mods: Modifiers) {
    if mods.alt {
        out.push(0x1b);
    }
    if mods.ctrl && ch.is_ascii_alphabetic() {
        out.push(ch.to_ascii_uppercase() as u8 & 0x1f);
        return;
    }
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

fn push_decimal(out: &mut EncodedBytes, n: u8) {
    push_decimal_u16(out, u16::from(n));
}

fn push_decimal_u16(out: &mut EncodedBytes, n: u16) {
    out.extend_from_slice(n.to_string().as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_up_arrow_in_normal_mode() {
        let modes = Modes::default();
        assert_eq!(&*encode_key(KeyCode::Up, Modifiers::default(), &modes), b"\x1b[A");
    }

    #[test]
    fn plain_up_arrow_in_application_mode() {
        let mut modes = Modes::default();
        modes.cursor_key_application = true;
        assert_eq!(&*encode_key(KeyCode::Up, Modifiers::default(), &modes), b"\x1bOA");
    }

    #[test]
    fn shift_up_arrow_uses_modifier_form() {
        let modes = Modes::default();
        let mods = Modifiers { shift: true, ..Default::default() };
        assert_eq!(&*encode_key(KeyCode::Up, mods, &modes), b"\x1b[1;2A");
    }

    #[test]
    fn delete_key_is_tilde_form() {
        let modes = Modes::default();
        assert_eq!(&*encode_key(KeyCode::Delete, Modifiers::default(), &modes), b"\x1b[3~");
    }

    #[test]
    fn f1_uses_ss3() {
        let modes = Modes::default();
        assert_eq!(&*encode_key(KeyCode::Function(1), Modifiers::default(), &modes), b"\x1bOP");
    }

    #[test]
    fn f5_uses_tilde_form() {
        let modes = Modes::default();
        assert_eq!(&*encode_key(KeyCode::Function(5), Modifiers::default(), &modes), b"\x1b[15~");
    }

    #[test]
    fn ctrl_char_clears_high_bits() {
        let modes = Modes::default();
        let mods = Modifiers { ctrl: true, ..Default::default() };
        assert_eq!(&*encode_key(KeyCode::Char('c'), mods, &modes), &[0x03]);
    }

    #[test]
    fn plain_char_passes_through_utf8() {
        let modes = Modes::default();
        assert_eq!(&*encode_key(KeyCode::Char('é'), Modifiers::default(), &modes), "é".as_bytes());
    }
}
