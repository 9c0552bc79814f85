// Rendering defaults. Lengths in CSS px are at 96 px per inch and get scaled
// to the output DPI.
pub const DEFAULT_DPI: u32 = 203; // Zebra/DYMO thermal heads
pub const CSS_DPI: f64 = 96.0;

pub const BAR_MODULE_CSS: f64 = 1.5;
pub const BAR_HEIGHT_CSS: f64 = 40.0;
pub const BAR_HEIGHT_VERTICAL_CSS: f64 = 60.0;
pub const BAR_MARGIN_CSS: f64 = 2.0;
pub const HRI_FONT_CSS: f64 = 8.0;

pub const STANDARD_FONT_CSS: f64 = 9.0;
pub const LABEL_MAKER_FONT_CSS: f64 = 7.0;

pub const LABEL_PADDING_IN: f64 = 0.1;
pub const LABEL_MARGIN_IN: f64 = 0.125;
pub const LINE_GAP_IN: f64 = 0.05;

pub const SHEET_W_IN: f64 = 8.5; // US Letter
pub const SHEET_H_IN: f64 = 11.0;
pub const SHEET_MARGIN_IN: f64 = 0.25;

pub const BORDER_GRAY: u8 = 0xCC;
pub const DASH_PX: u32 = 4;

pub const CUSTOM_STEP_IN: f64 = 0.125;

pub const DARKNESS: u8 = 8; // D0..D15
pub const SPEED: u8 = 2; // S1..S6
pub const INVERT_BITS: bool = true; // flip GW bits → black text on white

pub const SHOPIFY_API_VERSION: &str = "2023-10";
pub const PRODUCT_LIMIT: u32 = 50;
