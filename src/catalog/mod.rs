//! External cosmetics catalog client (fortnite-api.com compatible)
//!
//! Endpoints:
//! 1. `/v2/cosmetics/br/search/ids?id=..&id=..` - batch lookup by cosmetic id
//! 2. `/v1/banners` - global banner catalog
pub mod types;

pub use self::types::{CatalogBanner, CatalogCosmetic, CatalogEnvelope, CatalogImages, CatalogValue};

use crate::config::CatalogConfig;
use crate::errors::EpicResult;
use crate::http::{ApiRequest, EpicTransport, HttpTransport};
use crate::logger::{self, LogTag};
use std::sync::Arc;

/// Upper bound the catalog accepts per search request
pub const MAX_IDS_PER_REQUEST: usize = 50;

pub struct CatalogClient {
    transport: Arc<dyn EpicTransport>,
    base_url: String,
    language: String,
    batch_size: usize,
}

impl CatalogClient {
    pub fn new(transport: Arc<dyn EpicTransport>, config: &CatalogConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            batch_size: config.batch_size.clamp(1, MAX_IDS_PER_REQUEST),
        }
    }

    /// Client over its own reqwest transport built from config
    pub fn from_config(config: &CatalogConfig) -> Result<Self, String> {
        let transport = HttpTransport::new("", config.timeout_secs)?
            .with_rate_limit(config.rate_limit_per_minute);
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Looks up one chunk of cosmetic ids. Unknown ids are simply absent from
    /// the result; a 404 means none of them matched.
    pub async fn search_ids(&self, ids: &[String]) -> EpicResult<Vec<CatalogCosmetic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = ApiRequest::get(format!("{}/v2/cosmetics/br/search/ids", self.base_url));
        for id in ids {
            request = request.query("id", id.as_str());
        }
        if !self.language.is_empty() {
            request = request.query("language", self.language.as_str());
        }

        let response = self.transport.send(request).await?;
        if response.status == 404 {
            logger::debug(
                LogTag::Catalog,
                &format!("No catalog matches for {} ids", ids.len()),
            );
            return Ok(Vec::new());
        }

        let envelope: CatalogEnvelope<Vec<CatalogCosmetic>> = response
            .ensure_success("cosmetics search")?
            .json("cosmetics search")?;

        logger::debug(
            LogTag::Catalog,
            &format!("Resolved {}/{} ids", envelope.data.len(), ids.len()),
        );
        Ok(envelope.data)
    }

    /// Full banner catalog
    pub async fn banners(&self) -> EpicResult<Vec<CatalogBanner>> {
        let mut request = ApiRequest::get(format!("{}/v1/banners", self.base_url));
        if !self.language.is_empty() {
            request = request.query("language", self.language.as_str());
        }

        let envelope: CatalogEnvelope<Vec<CatalogBanner>> = self
            .transport
            .send(request)
            .await?
            .ensure_success("banners")?
            .json("banners")?;

        logger::debug(
            LogTag::Catalog,
            &format!("Banner catalog has {} entries", envelope.data.len()),
        );
        Ok(envelope.data)
    }
}
