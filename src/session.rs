//! The label generator screen as a state machine the host shell drives:
//! product list, selection, label settings, preview and print.

use crate::builder::{LabelBatch, LabelComposer};
use crate::catalog::{typed_products, FetchState, Product, ProductId, ProductSource};
use crate::error::{LabelError, PrintError};
use crate::geometry::{CustomSize, LabelConfig, LabelSize, LabelType, Orientation};
use crate::printer::{PrintReceipt, PrintSink};

pub struct LabelSession {
    composer: LabelComposer,
    product_limit: u32,
    products: FetchState<Vec<Product>>,
    selected: Vec<ProductId>,
    label_type: LabelType,
    preset: &'static str,
    custom_width: f64,
    custom_height: f64,
    config: LabelConfig,
    preview: Option<LabelBatch>,
}

impl LabelSession {
    pub fn new(composer: LabelComposer, product_limit: u32) -> Self {
        let config = LabelConfig::default();
        Self {
            composer,
            product_limit,
            products: FetchState::Loading,
            selected: Vec::new(),
            label_type: config.label_type(),
            preset: config.size.preset_name(),
            custom_width: 2.0,
            custom_height: 1.25,
            config,
            preview: None,
        }
    }

    /// Load the product list. The outcome, good or bad, lands in
    /// [`products`](Self::products); nothing is retried.
    pub async fn load_products<S: ProductSource>(&mut self, source: &S) {
        self.products = FetchState::Loading;
        let result = source
            .fetch_products(self.product_limit)
            .await
            .and_then(|raw| typed_products(&raw));
        if let Err(e) = &result {
            tracing::error!(error = %e, "There was an error loading products");
        }
        self.products = result.into();
    }

    pub fn products(&self) -> &FetchState<Vec<Product>> {
        &self.products
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn selected(&self) -> &[ProductId] {
        &self.selected
    }

    /// Replace the selection. Ids not in the loaded list are dropped.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ProductId>) {
        let known: Vec<ProductId> = self.loaded().iter().map(|p| p.id.clone()).collect();
        self.selected = ids.into_iter().filter(|id| known.contains(id)).collect();
        self.refresh_preview();
    }

    /// "Generate Barcode" on one row: select just that product and preview it.
    pub fn generate_single(&mut self, id: ProductId) -> &LabelBatch {
        self.select([id]);
        self.generate_bulk()
    }

    /// Switching type resets the size to that type's default preset.
    pub fn set_label_type(&mut self, label_type: LabelType) {
        self.label_type = label_type;
        self.config.size = label_type.default_size();
        self.preset = self.config.size.preset_name();
        self.refresh_preview();
    }

    /// Pick a size by its picker value. Presets of the other label type, or a
    /// custom size the current dimensions don't allow, are refused and the
    /// previous size stays.
    pub fn set_size_preset(&mut self, preset: &str) -> Result<(), LabelError> {
        let size = LabelSize::parse(self.label_type, preset, self.custom_width, self.custom_height)?;
        self.apply_size(size);
        Ok(())
    }

    pub fn set_custom_dimensions(&mut self, width: f64, height: f64) -> Result<(), LabelError> {
        if self.preset == "custom" {
            let size = LabelSize::parse(self.label_type, "custom", width, height)?;
            self.apply_size(size);
        } else {
            CustomSize::new(self.label_type, width, height)?;
        }
        self.custom_width = width;
        self.custom_height = height;
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.refresh_preview();
    }

    fn apply_size(&mut self, size: LabelSize) {
        self.config.size = size;
        self.preset = size.preset_name();
        self.refresh_preview();
    }

    fn loaded(&self) -> &[Product] {
        self.products.data().map(Vec::as_slice).unwrap_or(&[])
    }

    fn selected_products(&self) -> Vec<Product> {
        self.loaded()
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .cloned()
            .collect()
    }

    /// "Generate Bulk Barcodes": render every selected product and open the
    /// preview.
    pub fn generate_bulk(&mut self) -> &LabelBatch {
        let batch = self.composer.build_batch(&self.selected_products(), &self.config);
        self.preview.insert(batch)
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.generate_bulk();
        }
    }

    pub fn preview(&self) -> Option<&LabelBatch> {
        self.preview.as_ref()
    }

    /// Compose the open preview and hand it to `sink`.
    pub fn print(&self, sink: &mut dyn PrintSink) -> Result<PrintReceipt, PrintError> {
        let batch = self.preview.as_ref().ok_or(PrintError::Empty)?;
        let doc = self.composer.compose(batch);
        let receipt = sink.submit(&doc)?;
        tracing::info!(pages = receipt.pages, destination = %receipt.destination, "labels sent to print");
        Ok(receipt)
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }
}
