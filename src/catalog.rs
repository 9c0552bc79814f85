//! Products as the Shopify Admin REST API lists them, and the seam that
//! fetches them.

use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::config::AppConfig;
use crate::error::FetchError;

/// Shopify ids are JSON numbers; tests and fixtures sometimes use strings.
/// Equality only looks at the text, but serializing writes the id back in
/// whichever JSON type it arrived as, so `"0042"` stays a string.
#[derive(Debug, Clone)]
pub struct ProductId {
    value: String,
    numeric: bool,
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self { value: s.to_string(), numeric: false }
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        Self { value: n.to_string(), numeric: true }
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Num(n) => Self::from(n),
            Raw::Str(s) => Self { value: s, numeric: false },
        })
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.value.parse::<u64>() {
            Ok(n) if self.numeric => s.serialize_u64(n),
            _ => s.serialize_str(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// First variant's SKU, when it has a non-empty one.
    pub fn sku(&self) -> Option<&str> {
        self.variants
            .first()
            .and_then(|v| v.sku.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn price(&self) -> Option<&str> {
        self.variants.first().map(|v| v.price.as_str())
    }

    /// What goes into the barcode: the SKU, or the product id without one.
    pub fn barcode_value(&self) -> &str {
        self.sku().unwrap_or(self.id.as_str())
    }
}

/// One product exactly as the Admin API sent it, every field included.
pub type RawProduct = Box<RawValue>;

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<RawProduct>,
}

/// Pull the `products` array out of an Admin API `products.json` body
/// without touching the entries.
pub fn parse_product_list(body: &[u8]) -> Result<Vec<RawProduct>, FetchError> {
    let envelope: ProductsEnvelope = serde_json::from_slice(body)?;
    Ok(envelope.products)
}

/// Read the fields labels need out of untouched product entries.
pub fn typed_products(raw: &[RawProduct]) -> Result<Vec<Product>, FetchError> {
    raw.iter()
        .map(|entry| serde_json::from_str(entry.get()).map_err(FetchError::from))
        .collect()
}

/// Parse an Admin API `products.json` body into typed products.
pub fn parse_products(body: &[u8]) -> Result<Vec<Product>, FetchError> {
    typed_products(&parse_product_list(body)?)
}

/// Anything that can list the shop's products. Entries come back as the
/// upstream sent them; [`typed_products`] reads them when labels need to.
pub trait ProductSource {
    fn fetch_products(&self, limit: u32) -> impl Future<Output = Result<Vec<RawProduct>, FetchError>> + Send;
}

/// Where a fetch currently stands, as the UI needs to show it.
#[derive(Debug, Default)]
pub enum FetchState<T> {
    #[default]
    Loading,
    Failed(FetchError),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(d) => Some(d),
            _ => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchState<T> {
    fn from(r: Result<T, FetchError>) -> Self {
        match r {
            Ok(d) => Self::Ready(d),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Shop domain and offline access token obtained by the host's OAuth flow.
#[derive(Clone)]
pub struct ShopSession {
    pub shop: String,
    pub access_token: String,
}

impl fmt::Debug for ShopSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopSession")
            .field("shop", &self.shop)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Admin REST client bound to one shop session.
#[derive(Debug, Clone)]
pub struct ShopifyAdminClient {
    http: reqwest::Client,
    session: ShopSession,
    api_version: String,
}

impl ShopifyAdminClient {
    pub fn new(config: &AppConfig, session: ShopSession) -> Self {
        Self::with_client(reqwest::Client::new(), config, session)
    }

    pub fn with_client(http: reqwest::Client, config: &AppConfig, session: ShopSession) -> Self {
        Self {
            http,
            session,
            api_version: config.api_version.clone(),
        }
    }

    pub fn products_url(&self, limit: u32) -> String {
        format!(
            "https://{}/admin/api/{}/products.json?limit={}",
            self.session.shop, self.api_version, limit
        )
    }
}

impl ProductSource for ShopifyAdminClient {
    async fn fetch_products(&self, limit: u32) -> Result<Vec<RawProduct>, FetchError> {
        let url = self.products_url(limit);
        tracing::debug!(shop = %self.session.shop, limit, "fetching products");

        let response = self
            .http
            .get(&url)
            .header("X-Shopify-Access-Token", &self.session.access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let products = parse_product_list(&body)?;
        tracing::debug!(count = products.len(), "products fetched");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"products":[
        {"id":632910392,"title":"IPod Nano - 8GB","variants":[{"sku":"IPOD2008PINK","price":"199.00"}]},
        {"id":"123","title":"Gift card","variants":[]},
        {"id":921728736,"title":"Mug","variants":[{"sku":"","price":"9.50"},{"sku":"MUG-2","price":"11.00"}]},
        {"id":7,"title":"Sticker","variants":[{"sku":null,"price":"1.00"}]}
    ]}"#;

    #[test]
    fn parses_admin_payload() {
        let products = parse_products(BODY.as_bytes()).unwrap();
        assert_eq!(products.len(), 4);
        assert_eq!(products[0].id, ProductId::from("632910392"));
        assert_eq!(products[0].price(), Some("199.00"));
    }

    #[test]
    fn barcode_value_prefers_first_sku() {
        let products = parse_products(BODY.as_bytes()).unwrap();
        assert_eq!(products[0].barcode_value(), "IPOD2008PINK");
        assert_eq!(products[1].barcode_value(), "123");
        // empty first sku falls back to the id, later variants are ignored
        assert_eq!(products[2].barcode_value(), "921728736");
        assert_eq!(products[3].barcode_value(), "7");
    }

    #[test]
    fn ids_keep_their_json_type() {
        let p = Product { id: ProductId::from(42), title: "x".into(), variants: vec![] };
        assert_eq!(serde_json::to_value(&p).unwrap()["id"], serde_json::json!(42));
        let p = Product { id: ProductId::from("0042"), ..p };
        assert_eq!(serde_json::to_value(&p).unwrap()["id"], serde_json::json!("0042"));

        let back: Product = serde_json::from_str(r#"{"id":"0042","title":"Cap"}"#).unwrap();
        assert!(!back.id.is_numeric());
        assert_eq!(back.barcode_value(), "0042");
        assert_eq!(serde_json::to_string(&back.id).unwrap(), r#""0042""#);
        // text equality regardless of JSON type
        assert_eq!(ProductId::from(7), ProductId::from("7"));
    }

    #[test]
    fn raw_list_keeps_every_field() {
        let body = br#"{"products":[{"id":"0042","title":"Cap","handle":"cap","variants":[{"sku":"C1","barcode":"999"}]}]}"#;
        let raw = parse_product_list(body).unwrap();
        assert_eq!(
            raw[0].get(),
            r#"{"id":"0042","title":"Cap","handle":"cap","variants":[{"sku":"C1","barcode":"999"}]}"#
        );
        let typed = typed_products(&raw).unwrap();
        assert_eq!(typed[0].barcode_value(), "C1");
        assert_eq!(typed[0].price(), Some(""));
    }

    #[test]
    fn missing_products_key_is_a_decode_error() {
        assert!(matches!(parse_products(b"{}"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn fetch_state_from_result() {
        let ok: FetchState<u8> = Ok(1).into();
        assert_eq!(ok.data(), Some(&1));
        let failed: FetchState<u8> = Err(FetchError::Upstream { status: 502, body: String::new() }).into();
        assert!(failed.error().is_some());
        assert!(FetchState::<u8>::default().is_loading());
    }

    #[test]
    fn url_and_redacted_session() {
        let session = ShopSession { shop: "demo.myshopify.com".into(), access_token: "shpat_secret".into() };
        let client = ShopifyAdminClient::new(&AppConfig::default(), session.clone());
        assert_eq!(
            client.products_url(50),
            "https://demo.myshopify.com/admin/api/2023-10/products.json?limit=50"
        );
        assert!(!format!("{session:?}").contains("shpat_secret"));
    }
}
