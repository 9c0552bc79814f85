//! Label stock and how big a label box ends up on paper.

use serde::{Deserialize, Serialize};

use crate::consts::{CUSTOM_STEP_IN, LABEL_MAKER_FONT_CSS, STANDARD_FONT_CSS};
use crate::error::LabelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelType {
    Standard,
    LabelMaker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Slider limits for custom sizes, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomBounds {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl LabelType {
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        match s {
            "standard" => Ok(Self::Standard),
            "labelMaker" => Ok(Self::LabelMaker),
            other => Err(LabelError::UnknownLabelType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LabelMaker => "labelMaker",
        }
    }

    pub fn custom_bounds(self) -> CustomBounds {
        match self {
            Self::Standard => CustomBounds { min_width: 1.0, max_width: 5.0, min_height: 0.5, max_height: 4.0 },
            Self::LabelMaker => CustomBounds { min_width: 1.0, max_width: 4.0, min_height: 0.5, max_height: 2.4 },
        }
    }

    /// Preset picked when the user switches to this label type.
    pub fn default_size(self) -> LabelSize {
        match self {
            Self::Standard => LabelSize::Standard(StandardSize::Medium),
            Self::LabelMaker => LabelSize::LabelMaker(LabelMakerSize::Dymo30252),
        }
    }

    /// Body text size in CSS px.
    pub fn font_css_px(self) -> f64 {
        match self {
            Self::Standard => STANDARD_FONT_CSS,
            Self::LabelMaker => LABEL_MAKER_FONT_CSS,
        }
    }

    /// `(value, display label)` pairs for the size picker.
    pub fn size_options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Standard => &[
                ("small", "Small (1.5\" x 1\")"),
                ("medium", "Medium (2\" x 1.25\")"),
                ("large", "Large (3\" x 2\")"),
                ("custom", "Custom"),
            ],
            Self::LabelMaker => &[
                ("dymo30252", "DYMO 30252 (1.125\" x 3.5\")"),
                ("dymo30336", "DYMO 30336 (1\" x 2.125\")"),
                ("brotherDK2205", "Brother DK-2205 (2.4\")"),
                ("brotherDK1201", "Brother DK-1201 (1.1\" x 3.5\")"),
                ("custom", "Custom"),
            ],
        }
    }
}

/// User-chosen label dimensions, already validated against the label type
/// it remembers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomSize {
    label_type: LabelType,
    width: f64,
    height: f64,
}

impl CustomSize {
    /// Validates against the type's bounds and snaps both values to the
    /// slider step counted from the minimum.
    pub fn new(label_type: LabelType, width: f64, height: f64) -> Result<Self, LabelError> {
        let b = label_type.custom_bounds();
        Ok(Self {
            label_type,
            width: snap("width", width, b.min_width, b.max_width)?,
            height: snap("height", height, b.min_height, b.max_height)?,
        })
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn claim(self, expected: LabelType) -> Result<Self, LabelError> {
        if self.label_type == expected {
            Ok(self)
        } else {
            Err(LabelError::CustomSizeMismatch {
                validated_for: self.label_type.as_str(),
                used_for: expected.as_str(),
            })
        }
    }
}

/// Custom dimensions inside the standard sticker bounds.
///
/// A size checked for another label type does not convert:
///
/// ```
/// use barcode_labels::geometry::{CustomSize, StandardCustom};
/// use barcode_labels::LabelType;
///
/// let tape = CustomSize::new(LabelType::LabelMaker, 3.0, 2.0).unwrap();
/// assert!(StandardCustom::try_from(tape).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardCustom(CustomSize);

impl StandardCustom {
    pub fn new(width: f64, height: f64) -> Result<Self, LabelError> {
        CustomSize::new(LabelType::Standard, width, height).map(Self)
    }

    pub fn size(&self) -> &CustomSize {
        &self.0
    }
}

impl TryFrom<CustomSize> for StandardCustom {
    type Error = LabelError;

    fn try_from(c: CustomSize) -> Result<Self, Self::Error> {
        c.claim(LabelType::Standard).map(Self)
    }
}

/// Custom dimensions inside the label-maker tape bounds.
///
/// ```compile_fail
/// use barcode_labels::geometry::{LabelMakerSize, StandardCustom};
///
/// let big = StandardCustom::new(5.0, 4.0).unwrap();
/// let _ = LabelMakerSize::Custom(big);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMakerCustom(CustomSize);

impl LabelMakerCustom {
    pub fn new(width: f64, height: f64) -> Result<Self, LabelError> {
        CustomSize::new(LabelType::LabelMaker, width, height).map(Self)
    }

    pub fn size(&self) -> &CustomSize {
        &self.0
    }
}

impl TryFrom<CustomSize> for LabelMakerCustom {
    type Error = LabelError;

    fn try_from(c: CustomSize) -> Result<Self, Self::Error> {
        c.claim(LabelType::LabelMaker).map(Self)
    }
}

fn snap(dimension: &'static str, value: f64, min: f64, max: f64) -> Result<f64, LabelError> {
    if !value.is_finite() {
        return Err(LabelError::NonFiniteDimension(dimension));
    }
    if value < min || value > max {
        return Err(LabelError::DimensionOutOfRange { dimension, value, min, max });
    }
    let steps = ((value - min) / CUSTOM_STEP_IN).round();
    let mut snapped = min + steps * CUSTOM_STEP_IN;
    if snapped > max {
        snapped -= CUSTOM_STEP_IN;
    }
    Ok(snapped)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardSize {
    Small,
    Medium,
    Large,
    Custom(StandardCustom),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelMakerSize {
    Dymo30252,
    Dymo30336,
    BrotherDk2205,
    BrotherDk1201,
    Custom(LabelMakerCustom),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelSize {
    Standard(StandardSize),
    LabelMaker(LabelMakerSize),
}

impl LabelSize {
    /// Parses a size picker value for the given label type. Custom
    /// dimensions are only looked at when `preset` is `custom`.
    pub fn parse(label_type: LabelType, preset: &str, custom_w: f64, custom_h: f64) -> Result<Self, LabelError> {
        let unknown = || LabelError::UnknownPreset {
            label_type: label_type.as_str(),
            preset: preset.to_string(),
        };
        let size = match label_type {
            LabelType::Standard => LabelSize::Standard(match preset {
                "small" => StandardSize::Small,
                "medium" => StandardSize::Medium,
                "large" => StandardSize::Large,
                "custom" => StandardSize::Custom(StandardCustom::new(custom_w, custom_h)?),
                _ => return Err(unknown()),
            }),
            LabelType::LabelMaker => LabelSize::LabelMaker(match preset {
                "dymo30252" => LabelMakerSize::Dymo30252,
                "dymo30336" => LabelMakerSize::Dymo30336,
                "brotherDK2205" => LabelMakerSize::BrotherDk2205,
                "brotherDK1201" => LabelMakerSize::BrotherDk1201,
                "custom" => LabelMakerSize::Custom(LabelMakerCustom::new(custom_w, custom_h)?),
                _ => return Err(unknown()),
            }),
        };
        Ok(size)
    }

    pub fn label_type(&self) -> LabelType {
        match self {
            Self::Standard(_) => LabelType::Standard,
            Self::LabelMaker(_) => LabelType::LabelMaker,
        }
    }

    pub fn preset_name(&self) -> &'static str {
        match self {
            Self::Standard(StandardSize::Small) => "small",
            Self::Standard(StandardSize::Medium) => "medium",
            Self::Standard(StandardSize::Large) => "large",
            Self::LabelMaker(LabelMakerSize::Dymo30252) => "dymo30252",
            Self::LabelMaker(LabelMakerSize::Dymo30336) => "dymo30336",
            Self::LabelMaker(LabelMakerSize::BrotherDk2205) => "brotherDK2205",
            Self::LabelMaker(LabelMakerSize::BrotherDk1201) => "brotherDK1201",
            Self::Standard(StandardSize::Custom(_)) | Self::LabelMaker(LabelMakerSize::Custom(_)) => "custom",
        }
    }

    /// Width and height in inches with the long side across.
    pub fn horizontal_inches(&self) -> (f64, f64) {
        match self {
            Self::Standard(s) => match s {
                StandardSize::Small => (1.5, 1.0),
                StandardSize::Medium => (2.0, 1.25),
                StandardSize::Large => (3.0, 2.0),
                StandardSize::Custom(c) => (c.0.width, c.0.height),
            },
            Self::LabelMaker(s) => match s {
                LabelMakerSize::Dymo30252 => (3.5, 1.125),
                LabelMakerSize::Dymo30336 => (2.125, 1.0),
                LabelMakerSize::BrotherDk2205 => (2.4, 1.5),
                LabelMakerSize::BrotherDk1201 => (3.5, 1.1),
                LabelMakerSize::Custom(c) => (c.0.width, c.0.height),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelConfig {
    pub size: LabelSize,
    pub orientation: Orientation,
}

impl LabelConfig {
    pub fn label_type(&self) -> LabelType {
        self.size.label_type()
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            size: LabelType::Standard.default_size(),
            orientation: Orientation::Horizontal,
        }
    }
}

/// Label settings as the admin UI posts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelConfigForm {
    pub label_type: String,
    pub size_preset: String,
    #[serde(default = "default_custom_width")]
    pub custom_width_inches: f64,
    #[serde(default = "default_custom_height")]
    pub custom_height_inches: f64,
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_custom_width() -> f64 {
    2.0
}

fn default_custom_height() -> f64 {
    1.25
}

impl TryFrom<LabelConfigForm> for LabelConfig {
    type Error = LabelError;

    fn try_from(form: LabelConfigForm) -> Result<Self, Self::Error> {
        let label_type = LabelType::parse(&form.label_type)?;
        let size = LabelSize::parse(
            label_type,
            &form.size_preset,
            form.custom_width_inches,
            form.custom_height_inches,
        )?;
        Ok(Self { size, orientation: form.orientation })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGeometry {
    pub width_in: f64,
    pub height_in: f64,
    pub rotation_degrees: u16,
}

impl ResolvedGeometry {
    pub fn width_px(&self, dpi: u32) -> u32 {
        inches_to_px(self.width_in, dpi)
    }

    pub fn height_px(&self, dpi: u32) -> u32 {
        inches_to_px(self.height_in, dpi)
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees != 0
    }
}

pub fn inches_to_px(inches: f64, dpi: u32) -> u32 {
    (inches * dpi as f64).round().max(1.0) as u32
}

/// Physical box for a label. Vertical labels swap the sides and rotate the
/// content a quarter turn so it still runs along the long axis.
pub fn resolve(config: &LabelConfig) -> ResolvedGeometry {
    let (w, h) = config.size.horizontal_inches();
    match config.orientation {
        Orientation::Horizontal => ResolvedGeometry { width_in: w, height_in: h, rotation_degrees: 0 },
        Orientation::Vertical => ResolvedGeometry { width_in: h, height_in: w, rotation_degrees: 90 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(label_type: &str, preset: &str, orientation: Orientation) -> LabelConfig {
        LabelConfig::try_from(LabelConfigForm {
            label_type: label_type.into(),
            size_preset: preset.into(),
            custom_width_inches: 2.0,
            custom_height_inches: 1.25,
            orientation,
        })
        .unwrap()
    }

    #[test]
    fn standard_medium_horizontal() {
        let g = resolve(&config("standard", "medium", Orientation::Horizontal));
        assert_eq!(g, ResolvedGeometry { width_in: 2.0, height_in: 1.25, rotation_degrees: 0 });
    }

    #[test]
    fn dymo30336_vertical_swaps_sides() {
        let g = resolve(&config("labelMaker", "dymo30336", Orientation::Vertical));
        assert_eq!(g, ResolvedGeometry { width_in: 1.0, height_in: 2.125, rotation_degrees: 90 });
    }

    #[test]
    fn label_maker_preset_rejected_for_standard() {
        let err = LabelSize::parse(LabelType::Standard, "dymo30252", 2.0, 1.25).unwrap_err();
        assert!(matches!(err, LabelError::UnknownPreset { label_type: "standard", .. }));
        assert!(LabelSize::parse(LabelType::LabelMaker, "medium", 2.0, 1.25).is_err());
        assert!(LabelType::parse("sticker").is_err());
    }

    #[test]
    fn custom_bounds_per_type() {
        assert!(CustomSize::new(LabelType::Standard, 5.0, 4.0).is_ok());
        assert!(CustomSize::new(LabelType::Standard, 5.125, 1.0).is_err());
        assert!(CustomSize::new(LabelType::Standard, 0.875, 1.0).is_err());
        assert!(CustomSize::new(LabelType::LabelMaker, 4.5, 1.0).is_err());
        assert!(CustomSize::new(LabelType::LabelMaker, 2.0, 2.5).is_err());
        assert!(matches!(
            CustomSize::new(LabelType::Standard, f64::NAN, 1.0),
            Err(LabelError::NonFiniteDimension("width"))
        ));
    }

    #[test]
    fn custom_size_stays_with_its_type() {
        let sticker = CustomSize::new(LabelType::Standard, 5.0, 4.0).unwrap();
        assert_eq!(
            LabelMakerCustom::try_from(sticker),
            Err(LabelError::CustomSizeMismatch { validated_for: "standard", used_for: "labelMaker" })
        );
        assert!(LabelMakerCustom::new(5.0, 4.0).is_err());
        let ok = StandardCustom::try_from(sticker).unwrap();
        let size = LabelSize::Standard(StandardSize::Custom(ok));
        assert_eq!(size.horizontal_inches(), (5.0, 4.0));
        assert_eq!(ok.size().label_type(), LabelType::Standard);
    }

    #[test]
    fn custom_snaps_to_eighths_without_passing_max() {
        let c = CustomSize::new(LabelType::Standard, 2.06, 1.3).unwrap();
        assert_eq!((c.width(), c.height()), (2.0, 1.25));
        // 2.4 is not on the step grid; the largest reachable value is 2.375
        let c = CustomSize::new(LabelType::LabelMaker, 1.0, 2.4).unwrap();
        assert_eq!(c.height(), 2.375);
    }

    #[test]
    fn form_defaults_and_camel_case() {
        let form: LabelConfigForm =
            serde_json::from_str(r#"{"labelType":"labelMaker","sizePreset":"brotherDK1201"}"#).unwrap();
        assert_eq!(form.orientation, Orientation::Horizontal);
        let cfg = LabelConfig::try_from(form).unwrap();
        assert_eq!(resolve(&cfg).width_in, 3.5);
        assert_eq!(cfg.size.preset_name(), "brotherDK1201");
    }

    #[test]
    fn every_option_parses_for_its_type() {
        for t in [LabelType::Standard, LabelType::LabelMaker] {
            for (value, _) in t.size_options() {
                let size = LabelSize::parse(t, value, 2.0, 1.25).unwrap();
                assert_eq!(size.label_type(), t);
                assert_eq!(size.preset_name(), *value);
            }
        }
    }

    #[test]
    fn pixels_round_at_dpi() {
        let g = ResolvedGeometry { width_in: 2.0, height_in: 1.25, rotation_degrees: 0 };
        assert_eq!(g.width_px(203), 406);
        assert_eq!(g.height_px(203), 254);
    }
}
