/// Crate-wide result alias.
pub type FlyerResult<T> = Result<T, FlyerError>;

/// Errors surfaced by the library.
#[derive(thiserror::Error, Debug)]
pub enum FlyerError {
    /// Bad project or content input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Saving, downloading or spooling output failed.
    #[error("export error: {0}")]
    Export(String),

    /// The image editor could not produce an image.
    #[error("image edit error: {0}")]
    Edit(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlyerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn edit(msg: impl Into<String>) -> Self {
        Self::Edit(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FlyerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            FlyerError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(FlyerError::render("x").to_string().contains("render error:"));
        assert!(FlyerError::export("x").to_string().contains("export error:"));
        assert!(
            FlyerError::edit("x")
                .to_string()
                .contains("image edit error:")
        );
        assert!(
            FlyerError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = FlyerError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: FlyerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FlyerError::Serde(_)));
    }
}
