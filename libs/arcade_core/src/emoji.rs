//! Reaction symbols used as controls.

pub const ACCEPT: &str = "\u{2705}";
pub const DECLINE: &str = "\u{274C}";

pub const ROCK: &str = "\u{1FAA8}";
pub const PAPER: &str = "\u{1F4F0}";
pub const SCISSORS: &str = "\u{2702}\u{FE0F}";

/// Keycap digits one through nine.
pub const DIGITS: [&str; 9] = [
    "1\u{FE0F}\u{20E3}",
    "2\u{FE0F}\u{20E3}",
    "3\u{FE0F}\u{20E3}",
    "4\u{FE0F}\u{20E3}",
    "5\u{FE0F}\u{20E3}",
    "6\u{FE0F}\u{20E3}",
    "7\u{FE0F}\u{20E3}",
    "8\u{FE0F}\u{20E3}",
    "9\u{FE0F}\u{20E3}",
];

/// Checks whether two unicode emoji are the same, ignoring variation
/// selectors.
///
/// Clients are inconsistent about sending U+FE0F with reactions.
pub fn equivalent(a: &str, b: &str) -> bool {
    fn strip(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().filter(|&c| c != '\u{FE0F}')
    }

    strip(a).eq(strip(b))
}

/// Finds the index of `text` in `set`.
pub fn position(set: &[&str], text: &str) -> Option<usize> {
    set.iter().position(|e| equivalent(e, text))
}
