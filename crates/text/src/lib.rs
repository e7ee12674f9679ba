use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The character the client renders formatting codes from.
pub const COLOR_CHAR: char = '§';

/// The character operators type in config files instead of [`COLOR_CHAR`].
pub const ALT_COLOR_CHAR: char = '&';

static STRIP_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)§[0-9A-FK-ORX]").expect("color strip pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
    /// Start of a `§x§r§r§g§g§b§b` hex sequence.
    Hex,
}

impl ColorCode {
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            'x' => ColorCode::Hex,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        use ColorCode::*;
        match self {
            Black => '0',
            DarkBlue => '1',
            DarkGreen => '2',
            DarkAqua => '3',
            DarkRed => '4',
            DarkPurple => '5',
            Gold => '6',
            Gray => '7',
            DarkGray => '8',
            Blue => '9',
            Green => 'a',
            Aqua => 'b',
            Red => 'c',
            LightPurple => 'd',
            Yellow => 'e',
            White => 'f',
            Obfuscated => 'k',
            Bold => 'l',
            Strikethrough => 'm',
            Underline => 'n',
            Italic => 'o',
            Reset => 'r',
            Hex => 'x',
        }
    }
}

/// Renders the code the way it appears inside a colorized string, e.g. `§c`.
impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COLOR_CHAR, self.code())
    }
}

/// Translates every `alt_char` that is directly followed by a valid color
/// code into [`COLOR_CHAR`]. The code itself is lowercased. Anything else is
/// copied through unchanged.
pub fn translate_alternate_color_codes(alt_char: char, text: &str) -> String {
    let mut translated = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == alt_char {
            if let Some(color) = chars.peek().copied().and_then(ColorCode::parse) {
                chars.next();
                translated.push(COLOR_CHAR);
                translated.push(color.code());
                continue;
            }
        }
        translated.push(c);
    }
    translated
}

/// Colorizes operator-written text using `&` codes.
pub fn colorize(text: &str) -> String {
    translate_alternate_color_codes(ALT_COLOR_CHAR, text)
}

/// Removes every rendered color code, for output that can't display them.
pub fn strip_color(text: &str) -> String {
    STRIP_COLOR_REGEX.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_translates_known_codes() {
        assert_eq!(colorize("&7[&aCommandAlias&7] &c"), "§7[§aCommandAlias§7] §c");
        assert_eq!(colorize("&LBold"), "§lBold");
    }

    #[test]
    fn colorize_keeps_unknown_and_trailing_ampersands() {
        assert_eq!(colorize("salt & pepper"), "salt & pepper");
        assert_eq!(colorize("&z&"), "&z&");
        assert_eq!(colorize("&&a"), "&§a");
    }

    #[test]
    fn colorize_is_not_reapplied_to_output() {
        let once = colorize("&ahi");
        assert_eq!(colorize(&once), once);
    }

    #[test]
    fn strip_removes_rendered_codes_only() {
        assert_eq!(strip_color("§7[§aCA§7] §cNope & done"), "[CA] Nope & done");
    }

    #[test]
    fn display_renders_legacy_code() {
        assert_eq!(ColorCode::Red.to_string(), "§c");
        assert_eq!(format!("{}x{}", ColorCode::Gray, ColorCode::Aqua), "§7x§b");
    }
}
