//! Flyer Studio composes a themeable one-page flyer and exports it.
//!
//! The flow is one-directional:
//!
//! - A [`Studio`] owns the view state (content, theme, logo, background)
//! - every setter re-renders a [`Document`] via [`render_flyer`]
//! - an [`ExportPipeline`] rasterizes that document to a 3x PNG, or [`print`] sends an A4 page
//!   to a [`PrintSpooler`]
//!
//! Logos can be run through a remote [`ImageEditor`] before they are placed.
#![forbid(unsafe_code)]

mod assets;
mod document;
mod edit;
mod export;
mod foundation;
mod model;
mod project;
mod render;
mod studio;

pub use crate::assets::color::resolve_color;
pub use crate::assets::image_data::ImageData;
pub use crate::document::node::{
    Document, FLYER_ROOT_ID, FontFamily, FontSpec, Group, ImageFit, ImageNode, LineNode, Node,
    RectNode, Stroke, TextAnchor, TextNode,
};
pub use crate::edit::gemini::{API_KEY_VARS, DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiImageEditor};
pub use crate::edit::session::{
    EDIT_FAILED_MESSAGE, EditOutcome, EditRequest, ImageEditSession, ImageEditState, ImageEditor,
};
pub use crate::export::pipeline::{EXPORT_FAILED_MESSAGE, ExportOutcome, ExportPipeline};
pub use crate::export::print::{
    CommandSpooler, FileSpooler, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PrintSpooler, print,
    print_page_count, print_ready_svg, print_scale,
};
pub use crate::export::raster::{
    EXPORT_PIXEL_RATIO, RasterOptions, Rasterizer, ResvgRasterizer, raster_size,
};
pub use crate::export::sink::{
    Clock, DirDownloadSink, DownloadSink, FixedClock, InMemoryDownloads, Notifier,
    RecordingNotifier, StderrNotifier, SystemClock,
};
pub use crate::foundation::core::{Point, Rect, Rgba8, Size};
pub use crate::foundation::error::{FlyerError, FlyerResult};
pub use crate::model::content::{FlyerContent, Tier};
pub use crate::model::theme::{ThemeColors, ThemeField};
pub use crate::project::{ContentSource, DEFAULT_PRODUCT_NAME, Project};
pub use crate::render::layout::{BACKGROUND_OPACITY, FLYER_WIDTH, LOGO_PLACEHOLDER, render_flyer};
pub use crate::studio::Studio;
