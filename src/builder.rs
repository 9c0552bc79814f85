use image::GrayImage;
use rusttype::Font;

use crate::catalog::{Product, ProductId};
use crate::config::AppConfig;
use crate::consts::{BORDER_GRAY, DASH_PX, LABEL_PADDING_IN, LINE_GAP_IN};
use crate::error::{EncodingError, SettingsError};
use crate::geometry::{inches_to_px, resolve, LabelConfig, LabelType, ResolvedGeometry};
use crate::graphics::{blit_centered, dashed_border, fit_height, fit_within, render_line, rotate90, WHITE};
use crate::page::{paginate, PrintDocument, SheetLayout};
use crate::renderer::{render_barcode_within, BarcodeImage, RenderOptions};

/// One product's label, ready to be drawn.
#[derive(Debug, Clone)]
pub struct LabelInstance {
    pub product: Product,
    pub geometry: ResolvedGeometry,
    pub barcode: BarcodeImage,
}

/// A product whose barcode could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFailure {
    pub product_id: ProductId,
    pub title: String,
    pub value: String,
    pub error: EncodingError,
}

/// Outcome of generating labels for a selection. Some products failing is
/// normal; the rest still print.
#[derive(Debug, Clone)]
pub struct LabelBatch {
    pub config: LabelConfig,
    pub labels: Vec<LabelInstance>,
    pub failures: Vec<LabelFailure>,
}

impl LabelBatch {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders barcodes and label faces at one resolution with one text face.
#[derive(Clone, Default)]
pub struct LabelComposer {
    opts: RenderOptions,
    font: Option<Font<'static>>,
}

impl LabelComposer {
    pub fn new(opts: RenderOptions, font: Option<Font<'static>>) -> Self {
        Self { opts, font }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SettingsError> {
        Ok(Self::new(config.render_options(), config.load_font()?))
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Width of a face's content area, along the reading direction.
    fn content_width(&self, g: &ResolvedGeometry) -> u32 {
        let dpi = self.opts.dpi;
        let across = if g.is_rotated() { g.height_px(dpi) } else { g.width_px(dpi) };
        across.saturating_sub(2 * inches_to_px(LABEL_PADDING_IN, dpi))
    }

    /// Geometry is resolved once; each product's barcode is rendered on its
    /// own, sized for the label, and a failure only drops that product.
    pub fn build_batch(&self, products: &[Product], config: &LabelConfig) -> LabelBatch {
        let geometry = resolve(config);
        let room = self.content_width(&geometry);
        let mut labels = Vec::with_capacity(products.len());
        let mut failures = Vec::new();

        for product in products {
            let value = product.barcode_value();
            match render_barcode_within(value, config.orientation, &self.opts, room) {
                Ok(barcode) => labels.push(LabelInstance {
                    product: product.clone(),
                    geometry,
                    barcode,
                }),
                Err(error) => {
                    tracing::warn!(product = %product.id, value, %error, "skipping label");
                    failures.push(LabelFailure {
                        product_id: product.id.clone(),
                        title: product.title.clone(),
                        value: value.to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            rendered = labels.len(),
            failed = failures.len(),
            width_in = geometry.width_in,
            height_in = geometry.height_in,
            "label batch built"
        );
        LabelBatch { config: *config, labels, failures }
    }

    /// Draw a label box: title, price, SKU, then the barcode at the bottom,
    /// inside a dashed cut line. Rotated labels are laid out along the long
    /// axis and turned a quarter to fit the box.
    pub fn render_face(&self, label: &LabelInstance, label_type: LabelType) -> GrayImage {
        let dpi = self.opts.dpi;
        let g = &label.geometry;
        let (box_w, box_h) = (g.width_px(dpi), g.height_px(dpi));
        let (w, h) = if g.is_rotated() { (box_h, box_w) } else { (box_w, box_h) };

        let mut canvas = GrayImage::from_pixel(w, h, WHITE);
        let pad = inches_to_px(LABEL_PADDING_IN, dpi);
        let gap = inches_to_px(LINE_GAP_IN, dpi);
        let inner_w = self.content_width(g);
        let inner_bottom = h.saturating_sub(pad);

        let font = self.font.as_ref();
        let font_px = self.opts.css_px(label_type.font_css_px());
        let product = &label.product;

        let mut lines = vec![
            render_line(&product.title, font, font_px, true),
            render_line(&format!("${}", product.price().unwrap_or_default()), font, font_px, false),
        ];
        if let Some(sku) = product.sku() {
            lines.push(render_line(&format!("SKU: {sku}"), font, font_px, false));
        }

        let mut y = pad;
        for line in &lines {
            let line = fit_within(line, inner_w, inner_bottom.saturating_sub(y));
            blit_centered(&mut canvas, &line, pad, inner_w, y);
            y += line.height() + gap;
        }

        // bars narrower than the label only ever lose rows; scaling both
        // ways is the last resort when even one-pixel modules are too wide
        let room = inner_bottom.saturating_sub(y);
        let bars = if label.barcode.image.width() <= inner_w {
            fit_height(&label.barcode.image, room)
        } else {
            fit_within(&label.barcode.image, inner_w, room)
        };
        let bars_y = inner_bottom.saturating_sub(bars.height()).max(y.min(inner_bottom));
        blit_centered(&mut canvas, &bars, pad, inner_w, bars_y);

        dashed_border(&mut canvas, BORDER_GRAY, DASH_PX);
        if g.is_rotated() {
            rotate90(&canvas)
        } else {
            canvas
        }
    }

    /// Lay the batch out for printing: sticker sheets for standard labels,
    /// one page per label for label-maker rolls.
    pub fn compose(&self, batch: &LabelBatch) -> PrintDocument {
        let dpi = self.opts.dpi;
        let label_type = batch.config.label_type();
        let faces: Vec<GrayImage> = batch.labels.iter().map(|l| self.render_face(l, label_type)).collect();
        let layout = match label_type {
            LabelType::Standard => SheetLayout::letter(dpi),
            LabelType::LabelMaker => SheetLayout::roll(&resolve(&batch.config), dpi),
        };
        let doc = paginate(&faces, &layout, dpi);
        tracing::debug!(labels = faces.len(), pages = doc.pages.len(), "document composed");
        doc
    }
}
