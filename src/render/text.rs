//! Deterministic text measurement.
//!
//! Layout never consults the font database, so the same content always produces the same line
//! breaks regardless of which fonts the host has installed. Widths are estimated from an average
//! advance per character.

use crate::document::node::{FontFamily, FontSpec};

/// Average advance as a fraction of the font size.
fn advance_factor(font: &FontSpec) -> f64 {
    let base = match font.family {
        FontFamily::Monospace => 0.6,
        FontFamily::Serif => 0.5,
        FontFamily::SansSerif => 0.52,
    };
    if font.weight >= 700 { base * 1.1 } else { base }
}

pub fn estimate_width(text: &str, font: &FontSpec) -> f64 {
    text.chars().count() as f64 * font.size * advance_factor(font)
}

/// Greedy word wrap into lines no wider than `max_width`.
///
/// A single word wider than the line is kept whole on its own line. Empty input yields no lines.
pub fn wrap(text: &str, font: &FontSpec, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate_len = current.chars().count() + 1 + word.chars().count();
        let candidate_width = candidate_len as f64 * font.size * advance_factor(font);
        if candidate_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f64) -> FontSpec {
        FontSpec {
            family: FontFamily::Monospace,
            size,
            weight: 400,
            italic: false,
        }
    }

    #[test]
    fn wraps_on_word_boundaries() {
        // 10px mono -> 6px per char; 60px fits 10 chars.
        let lines = wrap("aaaa bbbb cccc dd", &font(10.0), 60.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc dd"]);
    }

    #[test]
    fn long_word_stays_whole() {
        let lines = wrap("supercalifragilistic ok", &font(10.0), 30.0);
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(wrap("   \n ", &font(10.0), 100.0).is_empty());
        assert!((estimate_width("abc", &font(10.0)) - 18.0).abs() < 1e-9);
    }
}
