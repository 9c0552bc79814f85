//! Barcode labels for store products.
//! - Resolves label stock (sheet stickers or label-maker tape) to a physical box
//! - Encodes SKUs as CODE128 and rasterises them with a readable value line
//! - Builds a batch per selection where one bad SKU never sinks the rest
//! - Paginates faces onto sheets or rolls and sends them to PNG or an EPL2 printer
//! - Lists products from the Shopify Admin REST API for the product picker

pub mod barcode;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod epl;
pub mod error;
pub mod geometry;
mod glyphs;
pub mod graphics;
pub mod page;
pub mod printer;
pub mod renderer;
pub mod routes;
pub mod session;

pub use builder::{LabelBatch, LabelComposer, LabelFailure, LabelInstance};
pub use catalog::{
    FetchState, Product, ProductId, ProductSource, RawProduct, ShopSession, ShopifyAdminClient, Variant,
};
pub use config::AppConfig;
pub use error::{DecodeError, EncodingError, FetchError, LabelError, PrintError, SettingsError};
pub use geometry::{resolve, LabelConfig, LabelConfigForm, LabelSize, LabelType, Orientation, ResolvedGeometry};
pub use page::PrintDocument;
pub use printer::{PngDirectory, PrintReceipt, PrintSink, RawPrinter};
pub use renderer::{render_barcode, render_barcode_within, BarcodeImage, RenderOptions};
pub use session::LabelSession;
