// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `Style` record itself: colors plus text attributes.

use super::color::Color;

/// Underline substyle, selected via the `4:n` SGR subparameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnderlineStyle {
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

/// An immutable, internable style record. Two `Style` values that are
/// `==` always resolve to the same [`super::cache::StyleKey`] (testable
/// property 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: Option<UnderlineStyle>,
    pub blink: bool,
    pub inverse: bool,
    pub invisible: bool,
    pub strikethrough: bool,
    pub overline: bool,
}

impl Style {
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_has_no_attributes() {
        let s = Style::default();
        assert_eq!(s.fg, Color::Default);
        assert_eq!(s.bg, Color::Default);
        assert!(!s.bold);
        assert_eq!(s.underline, None);
    }

    #[test]
    fn identical_styles_are_equal() {
        let a = Style {
            bold: true,
            fg: Color::Indexed(1),
            ..Default::default()
        };
        let b = Style {
            bold: true,
            fg: Color::Indexed(1),
            ..Default::default()
        };
        assert_eq!(a, b);
    }
}
