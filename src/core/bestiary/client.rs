//! Monster data gateway.
//!
//! [`MonsterGateway`] is the seam between the combat core and the outside
//! world; [`Dnd5eApiClient`] implements it against the public SRD API.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::error::{BestiaryError, Result};
use super::models::{MonsterDetail, MonsterList, MonsterSummary};

/// Default public API root.
pub const DEFAULT_BASE_URL: &str = "https://www.dnd5eapi.co/api";

/// Read-only access to monster reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonsterGateway: Send + Sync {
    /// `GET <base>/monsters`
    async fn fetch_monster_list(&self) -> Result<Vec<MonsterSummary>>;

    /// `GET <base>/monsters/<index>`
    async fn fetch_monster_detail(&self, index: &str) -> Result<MonsterDetail>;
}

/// reqwest client for the D&D 5e SRD API.
#[derive(Debug, Clone)]
pub struct Dnd5eApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Dnd5eApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Client for the public API.
    pub fn public() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "monster API returned an error");
            return Err(BestiaryError::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for Dnd5eApiClient {
    fn default() -> Self {
        Self::public()
    }
}

#[async_trait]
impl MonsterGateway for Dnd5eApiClient {
    async fn fetch_monster_list(&self) -> Result<Vec<MonsterSummary>> {
        let list: MonsterList = self.get_json("/monsters").await?;
        info!(count = list.results.len(), "loaded monster list");
        Ok(list.results)
    }

    async fn fetch_monster_detail(&self, index: &str) -> Result<MonsterDetail> {
        match self.get_json::<MonsterDetail>(&format!("/monsters/{index}")).await {
            Ok(detail) => {
                info!(index, name = %detail.name, actions = detail.actions.len(), "loaded monster");
                Ok(detail)
            }
            Err(BestiaryError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(BestiaryError::MonsterNotFound(index.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
