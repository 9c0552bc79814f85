//! CODE128 symbol → printable raster with its value spelled out underneath.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, ImageError};

use crate::barcode;
use crate::consts::{
    BAR_HEIGHT_CSS, BAR_HEIGHT_VERTICAL_CSS, BAR_MARGIN_CSS, BAR_MODULE_CSS, CSS_DPI, DEFAULT_DPI, HRI_FONT_CSS,
};
use crate::error::EncodingError;
use crate::geometry::Orientation;
use crate::glyphs::ADVANCE;
use crate::graphics::{bitmap_scale, blit_centered, render_bitmap_line, BLACK, WHITE};

/// Output resolution; every CSS-px length is scaled from 96 dpi to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

impl RenderOptions {
    pub fn css_px(&self, css: f64) -> f64 {
        css * self.dpi as f64 / CSS_DPI
    }

    fn css_px_u32(&self, css: f64) -> u32 {
        self.css_px(css).round().max(1.0) as u32
    }

    pub fn module_px(&self) -> u32 {
        self.css_px_u32(BAR_MODULE_CSS)
    }

    pub fn bar_height_px(&self, orientation: Orientation) -> u32 {
        match orientation {
            Orientation::Horizontal => self.css_px_u32(BAR_HEIGHT_CSS),
            Orientation::Vertical => self.css_px_u32(BAR_HEIGHT_VERTICAL_CSS),
        }
    }

    pub fn margin_px(&self) -> u32 {
        self.css_px_u32(BAR_MARGIN_CSS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeImage {
    pub value: String,
    pub orientation: Orientation,
    pub module_px: u32,
    pub bar_top: u32,
    pub bar_height: u32,
    pub image: GrayImage,
}

impl BarcodeImage {
    /// Pixel row that crosses every bar.
    pub fn scan_row(&self) -> u32 {
        self.bar_top + self.bar_height / 2
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ImageError> {
        encode_png(&self.image)
    }
}

pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::L8)?;
    Ok(out)
}

/// Draw `value` as CODE128. Vertical labels get taller bars; the quarter
/// turn itself happens when the label face is composed.
pub fn render_barcode(value: &str, orientation: Orientation, opts: &RenderOptions) -> Result<BarcodeImage, EncodingError> {
    render_barcode_within(value, orientation, opts, u32::MAX)
}

/// Like [`render_barcode`], but narrows the modules (never below one pixel)
/// and the value line so the image fits `max_width`. Modules stay a whole
/// number of pixels wide so the symbol still scans.
pub fn render_barcode_within(
    value: &str,
    orientation: Orientation,
    opts: &RenderOptions,
    max_width: u32,
) -> Result<BarcodeImage, EncodingError> {
    let symbol = barcode::encode(value)?;
    let modules = symbol.modules();
    let count = modules.len() as u32;

    let margin = opts.margin_px();
    let room = max_width.saturating_sub(2 * margin);
    let module_px = opts.module_px().min(room / count).max(1);
    let bar_h = opts.bar_height_px(orientation);

    let mut scale = bitmap_scale(opts.css_px(HRI_FONT_CSS));
    while scale > 1 && value.chars().count() as u32 * ADVANCE * scale > room {
        scale -= 1;
    }
    let text = render_bitmap_line(value, scale, false);
    let gap = 2 * scale;

    let bars_w = count * module_px;
    let w = bars_w.max(text.width().min(room)) + 2 * margin;
    let h = margin + bar_h + gap + text.height() + margin;
    let mut img = GrayImage::from_pixel(w, h, WHITE);

    let x0 = (w - bars_w) / 2;
    for (i, _) in modules.iter().enumerate().filter(|&(_, &bar)| bar) {
        let x = x0 + i as u32 * module_px;
        for dx in 0..module_px {
            for y in margin..margin + bar_h {
                img.put_pixel(x + dx, y, BLACK);
            }
        }
    }
    blit_centered(&mut img, &text, 0, w, margin + bar_h + gap);

    tracing::trace!(value, modules = count, module_px, width = w, height = h, "rendered barcode");
    Ok(BarcodeImage {
        value: value.to_string(),
        orientation,
        module_px,
        bar_top: margin,
        bar_height: bar_h,
        image: img,
    })
}
