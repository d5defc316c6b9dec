use crate::{
    assets::image_data::ImageData,
    document::node::Document,
    edit::session::{EditOutcome, ImageEditSession, ImageEditState, ImageEditor},
    model::{
        content::FlyerContent,
        theme::{ThemeColors, ThemeField},
    },
    render::layout::render_flyer,
};

/// Owner of all flyer view state.
///
/// Everything that changes what the flyer looks like goes through a setter here, and every
/// setter re-renders, so [`Studio::document`] is always current.
#[derive(Clone, Debug)]
pub struct Studio {
    content: FlyerContent,
    theme: ThemeColors,
    logo: Option<ImageData>,
    background: Option<ImageData>,
    logo_edit: ImageEditSession,
    document: Document,
}

impl Studio {
    pub fn new(content: FlyerContent, theme: ThemeColors) -> Self {
        let document = render_flyer(&content, &theme, None, None);
        Self {
            content,
            theme,
            logo: None,
            background: None,
            logo_edit: ImageEditSession::new(),
            document,
        }
    }

    pub fn content(&self) -> &FlyerContent {
        &self.content
    }

    pub fn theme(&self) -> &ThemeColors {
        &self.theme
    }

    pub fn logo(&self) -> Option<&ImageData> {
        self.logo.as_ref()
    }

    pub fn background(&self) -> Option<&ImageData> {
        self.background.as_ref()
    }

    pub fn logo_edit_state(&self) -> &ImageEditState {
        self.logo_edit.state()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Look up the rendered document by its root id.
    pub fn find_document(&self, id: &str) -> Option<&Document> {
        (self.document.id() == Some(id)).then_some(&self.document)
    }

    pub fn set_theme_field(&mut self, field: ThemeField, value: impl Into<String>) {
        self.theme.set_field(field, value);
        self.rerender();
    }

    pub fn set_background(&mut self, image: Option<ImageData>) {
        self.background = image;
        self.rerender();
    }

    pub fn clear_background(&mut self) {
        self.set_background(None);
    }

    /// Use `image` as the logo and start a fresh edit session for it.
    pub fn select_logo(&mut self, image: ImageData) {
        self.logo_edit.select(image.clone());
        self.logo = Some(image);
        self.rerender();
    }

    pub fn clear_logo(&mut self) {
        self.logo_edit = ImageEditSession::new();
        self.logo = None;
        self.rerender();
    }

    /// Run an AI edit on the selected logo. On success the edited image becomes the logo.
    pub fn edit_logo(&mut self, editor: &dyn ImageEditor, instruction: &str) -> EditOutcome {
        let outcome = self.logo_edit.apply(editor, instruction);
        if outcome == EditOutcome::Applied {
            self.logo = self.logo_edit.current().cloned();
            self.rerender();
        }
        outcome
    }

    fn rerender(&mut self) {
        self.document = render_flyer(
            &self.content,
            &self.theme,
            self.logo.as_ref(),
            self.background.as_ref(),
        );
        tracing::debug!(
            height = self.document.size.height,
            logo = self.logo.is_some(),
            background = self.background.is_some(),
            "flyer re-rendered"
        );
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new(FlyerContent::default(), ThemeColors::default())
    }
}
