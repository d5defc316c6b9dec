pub use kurbo::{Point, Rect, Size};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
    /// Opaque black, the fallback text color.
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);

    /// Color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha 255.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha replaced by `alpha` scaled into the existing alpha.
    ///
    /// Mirrors the `#rrggbb` + `aa` suffix tinting used for soft fills.
    pub fn with_alpha(self, alpha: u8) -> Self {
        let a = (u16::from(self.a) * u16::from(alpha) + 127) / 255;
        Self { a: a as u8, ..self }
    }

    /// `#rrggbb` form (alpha is carried separately as an opacity attribute).
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as an opacity in `0..=1`.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
