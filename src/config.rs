use std::path::PathBuf;

use rusttype::Font;

use crate::consts::{DEFAULT_DPI, PRODUCT_LIMIT, SHOPIFY_API_VERSION};
use crate::error::SettingsError;
use crate::renderer::RenderOptions;

/// Settings read once at startup and handed to whatever needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Public app key the embedded frontend boots App Bridge with.
    pub api_key: Option<String>,
    pub api_version: String,
    pub dpi: u32,
    pub product_limit: u32,
    /// TrueType face for label text. Without one, text uses the bitmap font.
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: SHOPIFY_API_VERSION.to_string(),
            dpi: DEFAULT_DPI,
            product_limit: PRODUCT_LIMIT,
            font_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key/value lookup; unset keys keep their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut cfg = Self::default();
        if let Some(v) = get("SHOPIFY_API_KEY").filter(|v| !v.is_empty()) {
            cfg.api_key = Some(v);
        }
        if let Some(v) = get("SHOPIFY_API_VERSION").filter(|v| !v.is_empty()) {
            cfg.api_version = v;
        }
        if let Some(v) = get("LABEL_DPI") {
            cfg.dpi = parse_positive("LABEL_DPI", &v)?;
        }
        if let Some(v) = get("PRODUCT_LIMIT") {
            cfg.product_limit = parse_positive("PRODUCT_LIMIT", &v)?;
        }
        if let Some(v) = get("LABEL_FONT_PATH").filter(|v| !v.is_empty()) {
            cfg.font_path = Some(PathBuf::from(v));
        }
        Ok(cfg)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { dpi: self.dpi }
    }

    pub fn load_font(&self) -> Result<Option<Font<'static>>, SettingsError> {
        let Some(path) = &self.font_path else {
            return Ok(None);
        };
        let shown = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| SettingsError::FontIo { path: shown.clone(), source })?;
        let font = Font::try_from_vec(bytes).ok_or(SettingsError::BadFont(shown))?;
        Ok(Some(font))
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u32, SettingsError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SettingsError::Invalid { var, value: value.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.render_options().dpi, 203);
        assert!(cfg.load_font().unwrap().is_none());
    }

    #[test]
    fn overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("SHOPIFY_API_KEY", "abc"),
            ("SHOPIFY_API_VERSION", "2024-01"),
            ("LABEL_DPI", "300"),
            ("PRODUCT_LIMIT", "250"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.api_version, "2024-01");
        assert_eq!((cfg.dpi, cfg.product_limit), (300, 250));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("LABEL_DPI", "0")])),
            Err(SettingsError::Invalid { var: "LABEL_DPI", .. })
        ));
        assert!(AppConfig::from_lookup(lookup(&[("PRODUCT_LIMIT", "lots")])).is_err());
    }

    #[test]
    fn missing_font_file_is_reported() {
        let cfg = AppConfig { font_path: Some("/nonexistent/label.ttf".into()), ..AppConfig::default() };
        assert!(matches!(cfg.load_font(), Err(SettingsError::FontIo { .. })));
    }
}
