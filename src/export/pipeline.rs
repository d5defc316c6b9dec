use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::color::resolve_color,
    document::node::{Document, FLYER_ROOT_ID},
    export::{
        raster::{RasterOptions, Rasterizer},
        sink::{Clock, DownloadSink, Notifier, SystemClock},
    },
    foundation::error::FlyerResult,
    model::theme::ThemeColors,
    studio::Studio,
};

/// Message shown to the user when a PNG export fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to export image. Please try again.";

/// What a call to [`ExportPipeline::export_png`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The PNG was written; holds the path the download sink reported.
    Saved(PathBuf),
    /// No document with the root id was found; nothing happened.
    Skipped,
    /// Another export was still running; nothing happened.
    Busy,
    /// Rasterizing or saving failed. The user has been notified.
    Failed(String),
}

/// Rasterize-and-download with a busy guard.
///
/// The pipeline is `Sync`: while one export is in flight, a second call from anywhere returns
/// [`ExportOutcome::Busy`] instead of starting another.
pub struct ExportPipeline<R, D, N, C = SystemClock> {
    rasterizer: R,
    downloads: D,
    notifier: N,
    clock: C,
    product_name: String,
    busy: AtomicBool,
}

impl<R, D, N> ExportPipeline<R, D, N, SystemClock>
where
    R: Rasterizer,
    D: DownloadSink,
    N: Notifier,
{
    pub fn new(product_name: impl Into<String>, rasterizer: R, downloads: D, notifier: N) -> Self {
        Self {
            rasterizer,
            downloads,
            notifier,
            clock: SystemClock,
            product_name: product_name.into(),
            busy: AtomicBool::new(false),
        }
    }
}

impl<R, D, N, C> ExportPipeline<R, D, N, C>
where
    R: Rasterizer,
    D: DownloadSink,
    N: Notifier,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ExportPipeline<R, D, N, C2> {
        ExportPipeline {
            rasterizer: self.rasterizer,
            downloads: self.downloads,
            notifier: self.notifier,
            clock,
            product_name: self.product_name,
            busy: self.busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// `<product-name>-<epoch-millis>.png`
    pub fn filename(&self) -> String {
        format!("{}-{}.png", self.product_name, self.clock.now_millis())
    }

    /// Export the studio's current flyer as a 3x PNG.
    #[tracing::instrument(level = "info", skip_all, fields(product = %self.product_name))]
    pub fn export_png(&self, studio: &Studio) -> ExportOutcome {
        self.export_document(studio.find_document(FLYER_ROOT_ID), studio.theme())
    }

    /// Export `doc` if present, using the theme's background as the canvas fill.
    pub fn export_document(&self, doc: Option<&Document>, theme: &ThemeColors) -> ExportOutcome {
        let Some(doc) = doc else {
            tracing::debug!("no flyer document to export");
            return ExportOutcome::Skipped;
        };
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("export already in progress");
            return ExportOutcome::Busy;
        };

        let opts = RasterOptions {
            background: resolve_color(&theme.bg),
            ..RasterOptions::default()
        };
        match self.rasterize_and_save(doc, &opts) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "flyer exported");
                ExportOutcome::Saved(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "flyer export failed");
                self.notifier.notify(EXPORT_FAILED_MESSAGE);
                ExportOutcome::Failed(e.to_string())
            }
        }
    }

    fn rasterize_and_save(&self, doc: &Document, opts: &RasterOptions) -> FlyerResult<PathBuf> {
        let png = self.rasterizer.render(doc, opts)?;
        self.downloads.save(&self.filename(), &png)
    }
}

/// Holds the busy flag for its lifetime; dropping clears it on every exit path, unwinding
/// included.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
