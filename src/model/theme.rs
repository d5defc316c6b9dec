use std::{fmt, str::FromStr};

use crate::foundation::error::FlyerError;

/// The four colors controlling the flyer palette.
///
/// Values are kept as the strings the user supplied. Resolution to pixels happens at render
/// time, where anything unparseable degrades to the platform default paint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub heading: String,
    pub accent: String,
    pub text: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#ffffff".to_owned(),
            heading: "#1e3a8a".to_owned(),
            accent: "#1e40af".to_owned(),
            text: "#374151".to_owned(),
        }
    }
}

/// Names one field of [`ThemeColors`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeField {
    Bg,
    Heading,
    Accent,
    Text,
}

impl ThemeField {
    pub const ALL: [ThemeField; 4] = [
        ThemeField::Bg,
        ThemeField::Heading,
        ThemeField::Accent,
        ThemeField::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeField::Bg => "bg",
            ThemeField::Heading => "heading",
            ThemeField::Accent => "accent",
            ThemeField::Text => "text",
        }
    }
}

impl fmt::Display for ThemeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeField {
    type Err = FlyerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bg" | "background" => Ok(ThemeField::Bg),
            "heading" => Ok(ThemeField::Heading),
            "accent" => Ok(ThemeField::Accent),
            "text" => Ok(ThemeField::Text),
            other => Err(FlyerError::validation(format!(
                "unknown theme field '{other}' (expected bg|heading|accent|text)"
            ))),
        }
    }
}

impl ThemeColors {
    pub fn get_field(&self, field: ThemeField) -> &str {
        match field {
            ThemeField::Bg => &self.bg,
            ThemeField::Heading => &self.heading,
            ThemeField::Accent => &self.accent,
            ThemeField::Text => &self.text,
        }
    }

    /// Replace exactly one field. Any string is accepted.
    pub fn set_field(&mut self, field: ThemeField, value: impl Into<String>) {
        let slot = match field {
            ThemeField::Bg => &mut self.bg,
            ThemeField::Heading => &mut self.heading,
            ThemeField::Accent => &mut self.accent,
            ThemeField::Text => &mut self.text,
        };
        *slot = value.into();
    }
}
