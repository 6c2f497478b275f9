// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mode flags (§3): a fixed set of named booleans. No runtime reflection —
//! behavior branches on these explicitly (§9 Design Notes).

/// Mouse-reporting protocol selected via DEC private modes 9/1000/1002/1003
/// (tracking level) combined with 1005/1006/1015 (encoding). Only the
/// encoding is modeled here since it's what [`crate::encode`] needs; the
/// core does not generate mouse events on its own (it has no input device),
/// it only encodes host-supplied [`crate::encode::MouseEvent`]s once a
/// protocol is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseProtocol {
    #[default]
    Off,
    /// Mode 1000: X10/normal tracking, coordinates as `byte + 32`.
    Normal,
    /// Mode 1005: UTF-8 extended coordinates.
    Utf8,
    /// Mode 1006: SGR extended coordinates (the modern default).
    Sgr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    /// DECAWM, default on.
    pub auto_wrap: bool,
    /// DECOM, default off.
    pub origin: bool,
    /// IRM, default off.
    pub insert: bool,
    /// DECCKM, default off.
    pub cursor_key_application: bool,
    /// DECNKM, default off.
    pub keypad_application: bool,
    /// DECSCNM, default off.
    pub reverse_screen: bool,
    /// DECCOLM, default off (80 columns).
    pub col_132: bool,
    /// DECTCEM, default on.
    pub cursor_visible: bool,
    pub mouse_reporting: MouseProtocol,
    pub bracketed_paste: bool,
    pub focus_events: bool,
    pub alt_screen: bool,
    /// DECLRMM: when set, DECSLRM sets real left/right margins; otherwise
    /// DECSLRM is ignored and the full row width is always in scope.
    pub left_right_margin_mode: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            auto_wrap: true,
            origin: false,
            insert: false,
            cursor_key_application: false,
            keypad_application: false,
            reverse_screen: false,
            col_132: false,
            cursor_visible: true,
            mouse_reporting: MouseProtocol::Off,
            bracketed_paste: false,
            focus_events: false,
            alt_screen: false,
            left_right_margin_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let m = Modes::default();
        assert!(m.auto_wrap);
        assert!(!m.origin);
        assert!(!m.insert);
        assert!(m.cursor_visible);
        assert_eq!(m.mouse_reporting, MouseProtocol::Off);
    }
}
