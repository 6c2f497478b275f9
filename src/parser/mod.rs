// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ANSI/VT Parser (C2): a thin [`vte::Perform`] shim over [`Emulator`].
//!
//! Grounded in the teacher's `AnsiToOfsBufPerformer` (`core::ansi::parser::performer`):
//! same "discard-on-`ignore`" malformed-sequence policy, same split between a
//! dispatch-table `Perform` impl here and business logic living on the target
//! type (here [`Emulator`] directly, rather than a further `operations/*`
//! shim layer -- the teacher's own split exists to share logic between two
//! parser variants it carries (`vt_100_ansi_parser` and
//! `vt_100_pty_output_parser`); this crate has one parser, so shim and impl
//! collapse into the dispatch table below plus [`Emulator`]'s public
//! methods).

use vte::{Params, Parser, Perform};

use crate::emulator::{charset::Charset, EraseMode, Emulator, ModeId, SgrCode};
use crate::style::{Color, UnderlineStyle};

/// Drive `bytes` through a fresh [`vte::Parser`], applying every resulting
/// operation onto `emulator` in order.
pub(crate) fn feed(emulator: &mut Emulator, bytes: &[u8]) {
    let mut vte_parser = Parser::new();
    let mut performer = EmulatorPerformer { emulator };
    for &byte in bytes {
        vte_parser.advance(&mut performer, byte);
    }
    performer.emulator.flush_pending_grapheme();
}

struct EmulatorPerformer<'a> {
    emulator: &'a mut Emulator,
}

fn collect_params(params: &Params) -> Vec<Vec<i64>> {
    params.iter().map(|group| group.iter().map(|&v| i64::from(v)).collect()).collect()
}

/// First value of the `idx`th parameter group, or `default` if absent or the
/// group is empty (VT100: a missing parameter means "default").
fn param(groups: &[Vec<i64>], idx: usize, default: i64) -> i64 {
    groups.get(idx).and_then(|g| g.first()).copied().unwrap_or(default)
}

/// Like [`param`], but a parameter of literal `0` is also treated as the
/// default -- the convention for count-like CSI parameters (CUU, SU, DCH,
/// ...).
fn param_count(groups: &[Vec<i64>], idx: usize, default: i64) -> usize {
    let v = param(groups, idx, default);
    usize::try_from(if v == 0 { default } else { v }).unwrap_or(default as usize)
}

fn is_private(intermediates: &[u8]) -> bool {
    intermediates.contains(&b'?')
}

impl Perform for EmulatorPerformer<'_> {
    fn print(&mut self, ch: char) {
        self.emulator.print_char(ch);
    }

    fn execute(&mut self, byte: u8) {
        self.emulator.flush_pending_grapheme();
        match byte {
            0x07 => self.emulator.bell(),
            0x08 => self.emulator.backspace(),
            0x09 => self.emulator.horizontal_tab(),
            0x0a | 0x0b | 0x0c => self.emulator.line_feed(),
            0x0d => self.emulator.carriage_return(),
            0x0e => self.emulator.shift_out(),
            0x0f => self.emulator.shift_in(),
            _ => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        self.emulator.flush_pending_grapheme();
        if ignore {
            tracing::debug!(action, "CSI: discarding malformed sequence");
            return;
        }
        let groups = collect_params(params);
        let private = is_private(intermediates);

        match action {
            'A' => self.emulator.cursor_up(param_count(&groups, 0, 1)),
            'B' | 'e' => self.emulator.cursor_down(param_count(&groups, 0, 1)),
            'C' | 'a' => self.emulator.cursor_forward(param_count(&groups, 0, 1)),
            'D' => self.emulator.cursor_back(param_count(&groups, 0, 1)),
            'E' => {
                self.emulator.cursor_down(param_count(&groups, 0, 1));
                self.emulator.carriage_return();
            }
            'F' => {
                self.emulator.cursor_up(param_count(&groups, 0, 1));
                self.emulator.carriage_return();
            }
            'G' | '`' => {
                let col = param_count(&groups, 0, 1).saturating_sub(1);
                let row = self.emulator.cursor().0;
                self.emulator.cursor_position(row, col);
            }
            'd' => {
                let row = param_count(&groups, 0, 1).saturating_sub(1);
                let col = self.emulator.cursor().1;
                self.emulator.cursor_position(row, col);
            }
            'H' | 'f' => {
                let row = param_count(&groups, 0, 1).saturating_sub(1);
                let col = param_count(&groups, 1, 1).saturating_sub(1);
                self.emulator.cursor_position(row, col);
            }
            'J' => {
                let mode = param(&groups, 0, 0);
                if mode == 3 {
                    self.emulator.erase_display_and_scrollback();
                } else {
                    self.emulator.erase_display(EraseMode::from_param(mode));
                }
            }
            'K' => self.emulator.erase_line(EraseMode::from_param(param(&groups, 0, 0))),
            'L' => self.emulator.insert_lines(param_count(&groups, 0, 1)),
            'M' => self.emulator.delete_lines(param_count(&groups, 0, 1)),
            '@' => self.emulator.insert_chars(param_count(&groups, 0, 1)),
            'P' => self.emulator.delete_chars(param_count(&groups, 0, 1)),
            'X' => self.emulator.erase_chars(param_count(&groups, 0, 1)),
            'S' => self.emulator.scroll_up(param_count(&groups, 0, 1)),
            'T' => self.emulator.scroll_down(param_count(&groups, 0, 1)),
            'r' if private => {
                let left = param_count(&groups, 0, 1).saturating_sub(1);
                let right = param_count(&groups, 1, 1).saturating_sub(1);
                self.emulator.set_lr_margins(left, right);
            }
            'r' => {
                let rows = self.emulator.rows();
                let top = param_count(&groups, 0, 1).saturating_sub(1);
                let bottom = param_count(&groups, 1, rows).saturating_sub(1);
                self.emulator.set_scroll_region(top, bottom);
            }
            's' if private => {
                let left = param_count(&groups, 0, 1).saturating_sub(1);
                let right = param_count(&groups, 1, 1).saturating_sub(1);
                self.emulator.set_lr_margins(left, right);
            }
            's' => self.emulator.save_cursor(),
            'u' => self.emulator.restore_cursor(),
            'm' => apply_sgr(self.emulator, &groups),
            'h' => set_modes(self.emulator, &groups, private, true),
            'l' => set_modes(self.emulator, &groups, private, false),
            'n' => match param(&groups, 0, 0) {
                5 => self.emulator.reply_device_status_ok(),
                6 => self.emulator.reply_cursor_position(),
                _ => {}
            },
            'c' if !private => self.emulator.reply_device_attributes(),
            'g' => {
                let mode = param(&groups, 0, 0);
                self.emulator.tab_clear(mode == 3);
            }
            _ => tracing::debug!(action, "CSI: unsupported sequence ignored"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], ignore: bool, byte: u8) {
        self.emulator.flush_pending_grapheme();
        if ignore {
            return;
        }
        match (intermediates, byte) {
            ([], b'7') => self.emulator.save_cursor(),
            ([], b'8') => self.emulator.restore_cursor(),
            ([], b'D') => self.emulator.line_feed(),
            ([], b'M') => self.emulator.reverse_index(),
            ([], b'H') => self.emulator.tab_set(),
            ([], b'=') | ([], b'>') => {} // DECKPAM/DECKPNM: no distinct keypad output in this core.
            ([b'('], b'B') => self.emulator.designate_charset(0, Charset::Ascii),
            ([b'('], b'0') => self.emulator.designate_charset(0, Charset::DecSpecialGraphics),
            ([b')'], b'B') => self.emulator.designate_charset(1, Charset::Ascii),
            ([b')'], b'0') => self.emulator.designate_charset(1, Charset::DecSpecialGraphics),
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        self.emulator.flush_pending_grapheme();
        let Some(code_bytes) = params.first() else { return };
        let Ok(code_str) = core::str::from_utf8(code_bytes) else { return };
        let Ok(code) = code_str.parse::<u32>() else { return };
        match code {
            0 | 2 => {
                if let Some(title) = params.get(1).and_then(|b| core::str::from_utf8(b).ok()) {
                    self.emulator.osc_set_title(title.to_string());
                }
            }
            8 => {
                let id = params
                    .get(1)
                    .and_then(|b| core::str::from_utf8(b).ok())
                    .and_then(|s| s.strip_prefix("id="))
                    .map(str::to_string);
                let uri = params.get(2).and_then(|b| core::str::from_utf8(b).ok()).map(str::to_string);
                self.emulator.osc_hyperlink(uri, id);
            }
            4 | 10 | 11 | 12 => {
                let spec = params.get(2).or_else(|| params.get(1)).and_then(|b| core::str::from_utf8(b).ok());
                let index = params.get(1).and_then(|b| core::str::from_utf8(b).ok()).and_then(|s| s.parse().ok());
                self.emulator.osc_palette(index, spec.unwrap_or_default().to_string());
            }
            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {
        self.emulator.flush_pending_grapheme();
        self.dcs_buf().clear();
    }

    fn put(&mut self, byte: u8) {
        self.dcs_buf().push(byte);
    }

    fn unhook(&mut self) {
        let bytes = std::mem::take(self.dcs_buf());
        self.emulator.dcs_passthrough(bytes);
    }
}

impl EmulatorPerformer<'_> {
    fn dcs_buf(&mut self) -> &mut Vec<u8> {
        self.emulator.dcs_scratch()
    }
}

/// Apply one `ESC[...m` sequence's worth of SGR codes. Handles both the
/// semicolon-separated legacy form (`38;5;196`) and the colon-subparameter
/// form (`38:5:196` arrives as one group `[38, 5, 196]`).
fn apply_sgr(emulator: &mut Emulator, groups: &[Vec<i64>]) {
    if groups.is_empty() {
        emulator.apply_sgr(SgrCode::Reset);
        return;
    }
    let mut i = 0;
    while i < groups.len() {
        let group = &groups[i];
        let head = group.first().copied().unwrap_or(0);
        match head {
            38 | 48 => {
                let target = head;
                if group.len() >= 2 {
                    apply_extended_color(emulator, target, &group[1..]);
                } else if let Some(rest) = groups.get(i + 1..) {
                    let consumed = apply_extended_color_semicolon(emulator, target, rest);
                    i += consumed;
                }
            }
            _ => apply_basic_sgr(emulator, group),
        }
        i += 1;
    }
}

fn apply_extended_color(emulator: &mut Emulator, target: i64, sub: &[i64]) {
    let color = match sub.first().copied() {
        Some(5) => sub.get(1).map(|&n| Color::Indexed(clamp_u8(n))),
        Some(2) => {
            if sub.len() >= 4 {
                Some(Color::Rgb(clamp_u8(sub[1]), clamp_u8(sub[2]), clamp_u8(sub[3])))
            } else {
                None
            }
        }
        _ => None,
    };
    if let Some(color) = color {
        emulator.apply_sgr(if target == 38 { SgrCode::Foreground(color) } else { SgrCode::Background(color) });
    }
}

/// Legacy semicolon form: `38;5;n` or `38;2;r;g;b` as separate top-level
/// groups. Returns how many extra groups (beyond the `38`/`48` itself) were
/// consumed, so the caller's loop index can skip past them.
fn apply_extended_color_semicolon(emulator: &mut Emulator, target: i64, rest: &[Vec<i64>]) -> usize {
    match rest.first().and_then(|g| g.first()).copied() {
        Some(5) => {
            let Some(n) = rest.get(1).and_then(|g| g.first()).copied() else { return 0 };
            let color = Color::Indexed(clamp_u8(n));
            emulator.apply_sgr(if target == 38 { SgrCode::Foreground(color) } else { SgrCode::Background(color) });
            2
        }
        Some(2) => {
            let r = rest.get(1).and_then(|g| g.first()).copied();
            let g = rest.get(2).and_then(|g| g.first()).copied();
            let b = rest.get(3).and_then(|g| g.first()).copied();
            let (Some(r), Some(g), Some(b)) = (r, g, b) else { return 0 };
            let color = Color::Rgb(clamp_u8(r), clamp_u8(g), clamp_u8(b));
            emulator.apply_sgr(if target == 38 { SgrCode::Foreground(color) } else { SgrCode::Background(color) });
            4
        }
        _ => 0,
    }
}

fn clamp_u8(n: i64) -> u8 {
    u8::try_from(n.clamp(0, 255)).unwrap_or(255)
}

fn apply_basic_sgr(emulator: &mut Emulator, group: &[i64]) {
    let code = group.first().copied().unwrap_or(0);
    let sgr = match code {
        0 => SgrCode::Reset,
        1 => SgrCode::Bold,
        2 => SgrCode::Faint,
        3 => SgrCode::Italic,
        4 => match group.get(1).copied() {
            Some(0) => SgrCode::NoUnderline,
            Some(2) => SgrCode::Underline(UnderlineStyle::Double),
            Some(3) => SgrCode::Underline(UnderlineStyle::Curly),
            Some(4) => SgrCode::Underline(UnderlineStyle::Dotted),
            Some(5) => SgrCode::Underline(UnderlineStyle::Dashed),
            _ => SgrCode::Underline(UnderlineStyle::Single),
        },
        5 | 6 => SgrCode::Blink,
        7 => SgrCode::Inverse,
        8 => SgrCode::Invisible,
        9 => SgrCode::Strikethrough,
        21 => SgrCode::Underline(UnderlineStyle::Double),
        22 => SgrCode::NormalIntensity,
        23 => SgrCode::NoItalic,
        24 => SgrCode::NoUnderline,
        25 => SgrCode::NoBlink,
        27 => SgrCode::NoInverse,
        28 => SgrCode::NoInvisible,
        29 => SgrCode::NoStrikethrough,
        30..=37 | 90..=97 => SgrCode::Foreground(Color::Indexed(basic_index(code))),
        39 => SgrCode::DefaultForeground,
        40..=47 | 100..=107 => SgrCode::Background(Color::Indexed(basic_index(code))),
        49 => SgrCode::DefaultBackground,
        53 => SgrCode::Overline,
        55 => SgrCode::NoOverline,
        _ => return,
    };
    emulator.apply_sgr(sgr);
}

fn basic_index(code: i64) -> u8 {
    match code {
        30..=37 => (code - 30) as u8,
        90..=97 => (code - 90) as u8 + 8,
        40..=47 => (code - 40) as u8,
        100..=107 => (code - 100) as u8 + 8,
        _ => 0,
    }
}

fn set_modes(emulator: &mut Emulator, groups: &[Vec<i64>], private: bool, enable: bool) {
    for group in groups {
        let Some(&n) = group.first() else { continue };
        let mode = if private { private_mode_id(n) } else { ansi_mode_id(n) };
        emulator.set_mode(mode, enable);
    }
}

fn private_mode_id(n: i64) -> ModeId {
    match n {
        1 => ModeId::Decckm,
        3 => ModeId::Deccolm,
        5 => ModeId::Decscnm,
        6 => ModeId::Decom,
        7 => ModeId::Decawm,
        25 => ModeId::Dectcem,
        69 => ModeId::Declrmm,
        1000 => ModeId::MouseNormal,
        1005 => ModeId::MouseUtf8,
        1006 => ModeId::MouseSgr,
        1048 => ModeId::Unknown(n as u16), // cursor save/restore via DECSET, unused: ESC 7/8 and CSI s/u cover it.
        1049 => ModeId::AltScreen1049,
        2004 => ModeId::BracketedPaste,
        1004 => ModeId::FocusEvents,
        _ => ModeId::Unknown(u16::try_from(n).unwrap_or(0)),
    }
}

fn ansi_mode_id(n: i64) -> ModeId {
    match n {
        4 => ModeId::Irm,
        _ => ModeId::Unknown(u16::try_from(n).unwrap_or(0)),
    }
}
