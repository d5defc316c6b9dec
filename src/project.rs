use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    assets::image_data::ImageData,
    foundation::error::{FlyerError, FlyerResult},
    model::{content::FlyerContent, theme::ThemeColors},
    studio::Studio,
};

/// Product name used in export filenames when a project does not set one.
pub const DEFAULT_PRODUCT_NAME: &str = "flyer";

/// Where a project's text comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ContentSource {
    /// Path to a content JSON file, relative to the project file.
    Path(PathBuf),
    Inline(FlyerContent),
}

impl Default for ContentSource {
    fn default() -> Self {
        Self::Inline(FlyerContent::default())
    }
}

/// A flyer project file (JSON).
///
/// ```json
/// {
///   "productName": "plant-sale-flyer",
///   "theme": { "heading": "#14532d" },
///   "content": "content.json",
///   "logo": "logo.png",
///   "background": "leaves.jpg"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default)]
    pub theme: ThemeColors,
    #[serde(default)]
    pub content: ContentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<PathBuf>,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_owned()
}

impl Default for Project {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            theme: ThemeColors::default(),
            content: ContentSource::default(),
            logo: None,
            background: None,
            base_dir: PathBuf::from("."),
        }
    }
}

impl Project {
    pub fn from_path(path: impl AsRef<Path>) -> FlyerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FlyerError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let mut project: Project = serde_json::from_reader(BufReader::new(f))?;
        project.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> FlyerResult<()> {
        let name = self.product_name.trim();
        if name.is_empty() {
            return Err(FlyerError::validation("productName must be non-empty"));
        }
        if name.contains(['/', '\\']) {
            return Err(FlyerError::validation(
                "productName must not contain path separators",
            ));
        }
        Ok(())
    }

    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn load_content(&self) -> FlyerResult<FlyerContent> {
        match &self.content {
            ContentSource::Inline(c) => Ok(c.clone()),
            ContentSource::Path(p) => FlyerContent::from_path(self.resolve(p)),
        }
    }

    /// Build the studio state this project describes.
    pub fn load_studio(&self) -> FlyerResult<Studio> {
        let mut studio = Studio::new(self.load_content()?, self.theme.clone());
        if let Some(p) = &self.background {
            studio.set_background(Some(ImageData::from_path(self.resolve(p))?));
        }
        if let Some(p) = &self.logo {
            studio.select_logo(ImageData::from_path(self.resolve(p))?);
        }
        Ok(studio)
    }
}
