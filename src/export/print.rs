use std::{
    fmt::Write as _,
    path::PathBuf,
    process::{Command, Stdio},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context as _;

use crate::{
    document::node::{Document, Node},
    foundation::{
        core::Rect,
        error::{FlyerError, FlyerResult},
    },
    studio::Studio,
};

/// A4 page width in millimetres.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// A4 page height in millimetres.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Top border thickness used on the printed page, in logical pixels.
pub const PRINT_TOP_BORDER: f64 = 15.0;

/// Hands a print-ready page to whatever does the printing.
pub trait PrintSpooler {
    /// Print (or store) one page given as standalone SVG text.
    fn submit(&self, page_svg: &str) -> FlyerResult<()>;
}

/// Send the studio's current flyer to `spooler`.
#[tracing::instrument(level = "info", skip_all)]
pub fn print(studio: &Studio, spooler: &dyn PrintSpooler) -> FlyerResult<()> {
    spooler.submit(&print_ready_svg(studio.document()))
}

/// Millimetres per logical pixel when `doc` is printed at the full A4 width.
pub fn print_scale(doc: &Document) -> f64 {
    if doc.size.width > 0.0 {
        PAGE_WIDTH_MM / doc.size.width
    } else {
        1.0
    }
}

/// Number of A4 sheets the full-width flyer runs over.
pub fn print_page_count(doc: &Document) -> usize {
    let flyer_h = doc.size.height * print_scale(doc);
    (flyer_h / PAGE_HEIGHT_MM).ceil().max(1.0) as usize
}

/// Lay the document out on zero-margin A4 paper.
///
/// The flyer is scaled to the full page width and pinned to the top, with no drop shadow or
/// rounded frame, and a thicker top border. The sheet is as tall as a whole number of A4 pages,
/// so a tall flyer overflows onto further pages instead of shrinking.
pub fn print_ready_svg(doc: &Document) -> String {
    let mut doc = doc.clone();
    widen_top_border(&mut doc);

    let flyer_h = doc.size.height * print_scale(&doc);
    let sheet_h = print_page_count(&doc) as f64 * PAGE_HEIGHT_MM;

    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="{w}mm" height="{sheet_h}mm" viewBox="0 0 {w} {sheet_h}">"#,
        w = PAGE_WIDTH_MM,
    );
    let _ = write!(
        out,
        r##"<rect width="{PAGE_WIDTH_MM}" height="{sheet_h}" fill="#ffffff"/>"##
    );
    out.push_str(&doc.to_nested_svg(Rect::new(0.0, 0.0, PAGE_WIDTH_MM, flyer_h)));
    out.push_str("</svg>");
    out
}

fn widen_top_border(doc: &mut Document) {
    for node in &mut doc.root.children {
        if let Node::Rect(r) = node
            && r.id.as_deref() == Some("top-border")
        {
            r.rect.y1 = r.rect.y0 + PRINT_TOP_BORDER;
        }
    }
}

static NEXT_JOB: AtomicU64 = AtomicU64::new(0);

/// Writes the page to a temp file and runs a print command on it (`lp` by default).
#[derive(Clone, Debug)]
pub struct CommandSpooler {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the page path.
    pub args: Vec<String>,
}

impl Default for CommandSpooler {
    fn default() -> Self {
        Self {
            program: "lp".to_owned(),
            args: Vec::new(),
        }
    }
}

impl PrintSpooler for CommandSpooler {
    fn submit(&self, page_svg: &str) -> FlyerResult<()> {
        let job = NEXT_JOB.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "flyer-print-{}-{job}.svg",
            std::process::id()
        ));
        std::fs::write(&path, page_svg)
            .with_context(|| format!("write print page '{}'", path.display()))?;

        tracing::info!(program = %self.program, page = %path.display(), "spooling print job");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .stdin(Stdio::null())
            .status();
        // The spooler has its own copy once the command returns.
        if let Err(err) = std::fs::remove_file(&path) {
            tracing::debug!(page = %path.display(), %err, "could not remove print page");
        }
        let status = status.with_context(|| format!("run print command '{}'", self.program))?;
        if !status.success() {
            return Err(FlyerError::export(format!(
                "print command '{}' exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

/// Saves the page instead of printing it.
#[derive(Clone, Debug)]
pub struct FileSpooler {
    /// Destination file; parent directories are created.
    pub path: PathBuf,
}

impl FileSpooler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrintSpooler for FileSpooler {
    fn submit(&self, page_svg: &str) -> FlyerResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&self.path, page_svg)
            .with_context(|| format!("write '{}'", self.path.display()))?;
        Ok(())
    }
}
