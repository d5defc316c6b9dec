use crate::{assets::image_data::ImageData, foundation::error::FlyerResult};

/// The one message users see for any failed edit, whatever the cause.
pub const EDIT_FAILED_MESSAGE: &str = "Failed to edit image. Check your API key.";

/// Remote "edit this image according to an instruction" capability.
pub trait ImageEditor {
    /// Return a new image produced from `image` by following `instruction`.
    fn edit(&self, image: &ImageData, instruction: &str) -> FlyerResult<ImageData>;
}

/// Observable state of an [`ImageEditSession`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageEditState {
    /// Image as selected by the user.
    pub original: Option<ImageData>,
    /// Latest successful edit of `original`.
    pub edited: Option<ImageData>,
    /// True while a request is outstanding.
    pub processing: bool,
    /// User-facing message from the last failed edit.
    pub error: Option<String>,
}

/// Result of one edit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edited image replaced the previous edit.
    Applied,
    /// No image selected or blank instruction.
    Skipped,
    /// A request for this image is still outstanding.
    Busy,
    /// The editor failed; `error` holds the user-facing message.
    Failed,
}

/// A request handed out by [`ImageEditSession::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
    /// Snapshot of the original image.
    pub image: ImageData,
    /// Trimmed instruction text.
    pub instruction: String,
}

/// Edit state for one selected image.
///
/// `begin` and `finish` bracket an outstanding request; `processing` is the guard between them.
#[derive(Clone, Debug, Default)]
pub struct ImageEditSession {
    state: ImageEditState,
}

impl ImageEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImageEditState {
        &self.state
    }

    /// Start over with a newly selected image.
    pub fn select(&mut self, image: ImageData) {
        self.state.original = Some(image);
        self.state.edited = None;
        self.state.error = None;
    }

    /// The image to display: the edit if there is one, else the original.
    pub fn current(&self) -> Option<&ImageData> {
        self.state.edited.as_ref().or(self.state.original.as_ref())
    }

    pub fn begin(&mut self, instruction: &str) -> Result<EditRequest, EditOutcome> {
        if self.state.processing {
            return Err(EditOutcome::Busy);
        }
        let instruction = instruction.trim();
        let Some(image) = self.state.original.clone() else {
            return Err(EditOutcome::Skipped);
        };
        if instruction.is_empty() {
            return Err(EditOutcome::Skipped);
        }

        self.state.processing = true;
        self.state.error = None;
        Ok(EditRequest {
            image,
            instruction: instruction.to_owned(),
        })
    }

    pub fn finish(&mut self, result: FlyerResult<ImageData>) -> EditOutcome {
        self.state.processing = false;
        match result {
            Ok(image) => {
                self.state.edited = Some(image);
                EditOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "image edit failed");
                self.state.error = Some(EDIT_FAILED_MESSAGE.to_owned());
                EditOutcome::Failed
            }
        }
    }

    /// `begin`, call `editor`, `finish`.
    pub fn apply(&mut self, editor: &dyn ImageEditor, instruction: &str) -> EditOutcome {
        match self.begin(instruction) {
            Ok(req) => {
                let result = editor.edit(&req.image, &req.instruction);
                self.finish(result)
            }
            Err(outcome) => outcome,
        }
    }
}
