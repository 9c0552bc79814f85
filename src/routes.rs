//! Backend routes the host shell mounts: `GET /api/products` hands the
//! Admin API product list straight through, `GET /api/config` boots App
//! Bridge in the embedded frontend.

use serde::Serialize;

use crate::catalog::ProductSource;
use crate::config::AppConfig;
use crate::consts::PRODUCT_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductsQuery {
    pub limit: u32,
}

impl Default for ProductsQuery {
    fn default() -> Self {
        Self { limit: PRODUCT_LIMIT }
    }
}

impl ProductsQuery {
    /// Parse a raw query string such as `limit=50`. Missing or unusable
    /// values keep the default.
    pub fn parse(query: &str) -> Self {
        let limit = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "limit")
            .and_then(|(_, v)| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(PRODUCT_LIMIT);
        Self { limit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl RouteResponse {
    fn text(status: u16, msg: String) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: msg.into_bytes(),
        }
    }
}

/// 200 with the bare products array exactly as the Admin API listed it, or
/// 500 with the error message as plain text.
pub async fn get_products<S: ProductSource>(source: &S, query: ProductsQuery) -> RouteResponse {
    let products = match source.fetch_products(query.limit).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching products");
            return RouteResponse::text(500, e.to_string());
        }
    };
    match serde_json::to_vec(&products) {
        Ok(body) => RouteResponse {
            status: 200,
            content_type: "application/json",
            body,
        },
        Err(e) => {
            tracing::error!(error = %e, "Error encoding products");
            RouteResponse::text(500, e.to_string())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppBridgeConfig<'a> {
    api_key: &'a str,
    api_version: &'a str,
}

/// 200 with `{"apiKey", "apiVersion"}` for App Bridge, or 500 when the app
/// was started without `SHOPIFY_API_KEY`.
pub fn get_app_config(config: &AppConfig) -> RouteResponse {
    let Some(api_key) = config.api_key.as_deref() else {
        tracing::warn!("app is running without SHOPIFY_API_KEY");
        return RouteResponse::text(
            500,
            "Your app is running without the SHOPIFY_API_KEY environment variable.".to_string(),
        );
    };
    let body = AppBridgeConfig { api_key, api_version: &config.api_version };
    match serde_json::to_vec(&body) {
        Ok(body) => RouteResponse {
            status: 200,
            content_type: "application/json",
            body,
        },
        Err(e) => RouteResponse::text(500, e.to_string()),
    }
}
