use std::{
    io::Cursor,
    sync::{Arc, OnceLock},
};

use anyhow::Context as _;

use crate::{
    document::node::Document,
    foundation::{
        core::Rgba8,
        error::{FlyerError, FlyerResult},
    },
};

/// Supersampling factor for PNG export, relative to the logical layout.
pub const EXPORT_PIXEL_RATIO: f32 = 3.0;

/// Largest raster edge we are willing to allocate.
const MAX_DIM: u32 = 16_384;

#[derive(Clone, Debug, PartialEq)]
pub struct RasterOptions {
    /// Output pixels per logical pixel.
    pub pixel_ratio: f32,
    /// Canvas fill under the document. `None` leaves it transparent.
    pub background: Option<Rgba8>,
    /// Load system fonts so text is drawn into the raster.
    pub embed_fonts: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: EXPORT_PIXEL_RATIO,
            background: None,
            embed_fonts: true,
        }
    }
}

/// Turns a rendered [`Document`] into encoded PNG bytes.
///
/// This is the seam the export pipeline depends on; tests substitute their own impls.
pub trait Rasterizer: Send + Sync {
    fn render(&self, doc: &Document, opts: &RasterOptions) -> FlyerResult<Vec<u8>>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn render(&self, doc: &Document, opts: &RasterOptions) -> FlyerResult<Vec<u8>> {
        (**self).render(doc, opts)
    }
}

impl<R: Rasterizer + ?Sized> Rasterizer for Arc<R> {
    fn render(&self, doc: &Document, opts: &RasterOptions) -> FlyerResult<Vec<u8>> {
        (**self).render(doc, opts)
    }
}

/// Rasterizer backed by `usvg` + `resvg`, encoding with `image`.
#[derive(Default)]
pub struct ResvgRasterizer {
    fonts: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn system_fonts(&self) -> Arc<usvg::fontdb::Database> {
        self.fonts
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "loaded system fonts");
                Arc::new(db)
            })
            .clone()
    }
}

impl Rasterizer for ResvgRasterizer {
    #[tracing::instrument(level = "debug", skip_all, fields(ratio = opts.pixel_ratio))]
    fn render(&self, doc: &Document, opts: &RasterOptions) -> FlyerResult<Vec<u8>> {
        let (width, height) = raster_size(doc, opts.pixel_ratio)?;

        let mut usvg_opts = usvg::Options::default();
        if opts.embed_fonts {
            usvg_opts.fontdb = self.system_fonts();
        }
        let svg = doc.to_svg();
        let tree = usvg::Tree::from_str(&svg, &usvg_opts)
            .map_err(|e| FlyerError::render(format!("parse flyer svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| FlyerError::render("failed to allocate export pixmap"))?;
        if let Some(bg) = opts.background {
            pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        }
        let xform = resvg::tiny_skia::Transform::from_scale(opts.pixel_ratio, opts.pixel_ratio);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        let mut rgba = pixmap.take();
        demultiply_rgba8_in_place(&mut rgba);
        encode_png(width, height, rgba)
    }
}

/// Output pixel dimensions for `doc` at `ratio`.
pub fn raster_size(doc: &Document, ratio: f32) -> FlyerResult<(u32, u32)> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(FlyerError::validation("pixel ratio must be finite and > 0"));
    }
    let w = (doc.size.width * f64::from(ratio)).ceil();
    let h = (doc.size.height * f64::from(ratio)).ceil();
    if !(w >= 1.0 && h >= 1.0) {
        return Err(FlyerError::render("document has empty size"));
    }
    if w > f64::from(MAX_DIM) || h > f64::from(MAX_DIM) {
        return Err(FlyerError::render(format!(
            "raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w as u32, h as u32))
}

fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> FlyerResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| FlyerError::render("pixel buffer does not match raster size"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// tiny-skia pixmaps are premultiplied; PNG wants straight alpha.
fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::node::{FLYER_ROOT_ID, Group, Node, RectNode},
        foundation::core::{Rect, Size},
    };

    fn square(fill: Option<Rgba8>) -> Document {
        Document {
            size: Size::new(4.0, 2.0),
            root: Group {
                id: Some(FLYER_ROOT_ID.to_owned()),
                children: vec![Node::Rect(RectNode {
                    id: None,
                    rect: Rect::new(0.0, 0.0, 2.0, 2.0),
                    radius: 0.0,
                    fill,
                    stroke: None,
                })],
            },
        }
    }

    fn no_fonts(background: Option<Rgba8>) -> RasterOptions {
        RasterOptions {
            background,
            embed_fonts: false,
            ..RasterOptions::default()
        }
    }

    #[test]
    fn renders_at_three_x_with_background() {
        let doc = square(Some(Rgba8::opaque(255, 0, 0)));
        let png = ResvgRasterizer::new()
            .render(&doc, &no_fonts(Some(Rgba8::opaque(0, 0, 255))))
            .unwrap();

        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (12, 6));
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn no_background_stays_transparent() {
        let doc = square(None);
        let png = ResvgRasterizer::new().render(&doc, &no_fonts(None)).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn raster_size_rejects_bad_ratios() {
        let doc = square(None);
        assert_eq!(raster_size(&doc, 3.0).unwrap(), (12, 6));
        assert!(raster_size(&doc, 0.0).is_err());
        assert!(raster_size(&doc, f32::NAN).is_err());
        assert!(raster_size(&doc, 10_000.0).is_err());
    }

    #[test]
    fn demultiply_inverts_half_alpha() {
        let mut px = vec![64u8, 0, 128, 128, 9, 9, 9, 0];
        demultiply_rgba8_in_place(&mut px);
        assert_eq!(px, vec![128, 0, 255, 128, 9, 9, 9, 0]);
    }
}
