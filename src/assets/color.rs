use crate::foundation::core::Rgba8;

/// Resolve a CSS-style color string into RGBA8.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a
/// short table of named colors. Anything else resolves to `None`; callers fall back to the
/// platform default for that paint instead of failing.
pub fn resolve_color(s: &str) -> Option<Rgba8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args);
    }

    named_color(&lower)
}

fn parse_hex(s: &str) -> Option<Rgba8> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    fn hex_nibble(c: &str) -> Option<u8> {
        u8::from_str_radix(c, 16).ok().map(|n| n * 17)
    }

    match s.len() {
        3 | 4 => {
            let r = hex_nibble(&s[0..1])?;
            let g = hex_nibble(&s[1..2])?;
            let b = hex_nibble(&s[2..3])?;
            let a = if s.len() == 4 {
                hex_nibble(&s[3..4])?
            } else {
                255
            };
            Some(Rgba8::new(r, g, b, a))
        }
        6 | 8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = if s.len() == 8 {
                hex_byte(&s[6..8])?
            } else {
                255
            };
            Some(Rgba8::new(r, g, b, a))
        }
        _ => None,
    }
}

fn parse_rgb_fn(args: &str) -> Option<Rgba8> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |p: &str| -> Option<u8> {
        let v: f64 = p.parse().ok()?;
        if !v.is_finite() || !(0.0..=255.0).contains(&v) {
            return None;
        }
        Some(v.round() as u8)
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(p) => {
            let v: f64 = p.parse().ok()?;
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return None;
            }
            (v * 255.0).round() as u8
        }
        None => 255,
    };
    Some(Rgba8::new(r, g, b, a))
}

fn named_color(name: &str) -> Option<Rgba8> {
    let c = match name {
        "black" => Rgba8::opaque(0, 0, 0),
        "white" => Rgba8::opaque(255, 255, 255),
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "navy" => Rgba8::opaque(0, 0, 128),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "silver" => Rgba8::opaque(192, 192, 192),
        "maroon" => Rgba8::opaque(128, 0, 0),
        "purple" => Rgba8::opaque(128, 0, 128),
        "teal" => Rgba8::opaque(0, 128, 128),
        "olive" => Rgba8::opaque(128, 128, 0),
        "orange" => Rgba8::opaque(255, 165, 0),
        "gold" => Rgba8::opaque(255, 215, 0),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "transparent" => Rgba8::new(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(resolve_color("#ff0000"), Some(Rgba8::opaque(255, 0, 0)));
        assert_eq!(resolve_color("#F00"), Some(Rgba8::opaque(255, 0, 0)));
        assert_eq!(resolve_color("#0000ff80"), Some(Rgba8::new(0, 0, 255, 0x80)));
        assert_eq!(resolve_color("  #1e3a8a "), Some(Rgba8::opaque(0x1e, 0x3a, 0x8a)));
    }

    #[test]
    fn parses_rgb_functions_and_names() {
        assert_eq!(
            resolve_color("rgb(10, 20, 30)"),
            Some(Rgba8::opaque(10, 20, 30))
        );
        assert_eq!(
            resolve_color("RGBA(10,20,30,0.5)"),
            Some(Rgba8::new(10, 20, 30, 128))
        );
        assert_eq!(resolve_color("Navy"), Some(Rgba8::opaque(0, 0, 128)));
    }

    #[test]
    fn garbage_resolves_to_none() {
        for bad in ["", "#12", "#ggg", "#1234567", "rgb(300,0,0)", "blurple", "#ééé"] {
            assert_eq!(resolve_color(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn signed_hex_digits_are_rejected() {
        for bad in ["#+f0000", "#+ff", "#-1ffff", "#ff+0", "# fff"] {
            assert_eq!(resolve_color(bad), None, "{bad:?}");
        }
    }
}
