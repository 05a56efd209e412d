use crate::error::CatalogError;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{header::HeaderMap, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

pub const SETS: &str = "sets";
pub const CARDS: &str = "cards";
pub const TYPES: &str = "types";

lazy_static! {
    static ref PLAIN_TERM: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
}

/// JSON envelope every catalog resource answers with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

pub type QueryParams = Vec<(String, String)>;

#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// GETs `resource` with `params` and returns the raw response body.
    async fn get(&self, resource: &str, params: &QueryParams) -> Result<String, CatalogError>;
}

pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(client: Client, headers: HeaderMap, base_url: Url) -> Self {
        HttpTransport {
            client,
            headers,
            base_url,
        }
    }

    fn endpoint(&self, resource: &str, params: &QueryParams) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| CatalogError::Transport {
                resource: resource.to_string(),
                message: e.to_string(),
            })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, resource: &str, params: &QueryParams) -> Result<String, CatalogError> {
        let url = self.endpoint(resource, params)?;
        debug!(%url, "catalog request");
        let transport_err = |e: reqwest::Error| CatalogError::Transport {
            resource: resource.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport_err)
    }
}

pub fn parse_envelope<T: DeserializeOwned>(
    resource: &str,
    body: &str,
) -> Result<Envelope<T>, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Parse {
        resource: resource.to_string(),
        source,
    })
}

/// Quotes `value` unless it is a bare identifier, escaping query syntax so
/// the catalog matches it literally.
pub fn quote_term(value: &str) -> String {
    if PLAIN_TERM.is_match(value) {
        return value.to_string();
    }
    format!("\"{}\"", escape_term(value))
}

fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '*' | '?') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `field:"*value*"` substring clause.
pub fn substring_clause(field: &str, value: &str) -> String {
    format!("{}:\"*{}*\"", field, escape_term(value))
}

/// `field:value` exact clause.
pub fn exact_clause(field: &str, value: &str) -> String {
    format!("{}:{}", field, quote_term(value))
}

/// `field:a|b` alternation clause.
pub fn any_of_clause(field: &str, values: &[String]) -> String {
    let terms: Vec<String> = values.iter().map(|v| quote_term(v)).collect();
    format!("{}:{}", field, terms.join("|"))
}
