use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{DexError, Result};
use crate::types::{CatalogEntry, DetailResponse, PageRef, PageResponse};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Paginated catalog source. `list` returns summary references, `detail`
/// resolves one reference to a full entry.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<PageRef>>;
    async fn detail(&self, url: &str) -> Result<CatalogEntry>;
}

pub struct PokeApi {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for PokeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PokeApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dexgrid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DexError::Api(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn list_url(&self, offset: u64, limit: u32) -> String {
        format!(
            "{}/pokemon/?offset={}&limit={}",
            self.base_url, offset, limit
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DexError::Api(format!("PokeAPI {}: {}", status, text)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| DexError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl Catalog for PokeApi {
    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<PageRef>> {
        let url = self.list_url(offset, limit);
        tracing::debug!(%url, "listing catalog page");
        let page: PageResponse = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn detail(&self, url: &str) -> Result<CatalogEntry> {
        let detail: DetailResponse = self.get_json(url).await?;
        Ok(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api_for(server: &MockServer) -> PokeApi {
        PokeApi::new(server.uri()).unwrap()
    }

    #[test]
    fn list_url_uses_offset_and_limit() {
        let api = PokeApi::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            api.list_url(151, 151),
            "https://pokeapi.co/api/v2/pokemon/?offset=151&limit=151"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_dropped() {
        let api = PokeApi::new("http://localhost:8080/api/v2/").unwrap();
        assert_eq!(
            api.list_url(0, 20),
            "http://localhost:8080/api/v2/pokemon/?offset=0&limit=20"
        );
    }

    #[tokio::test]
    async fn list_returns_page_references() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/"))
            .and(query_param("offset", "151"))
            .and(query_param("limit", "151"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"count": 1302, "results": [{"name": "chikorita", "url": "https://pokeapi.co/api/v2/pokemon/152/"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let refs = api_for(&server).await.list(151, 151).await.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "chikorita");
    }

    #[tokio::test]
    async fn error_status_becomes_api_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = api_for(&server).await.list(0, 151).await.unwrap_err();
        match err {
            DexError::Api(msg) => {
                assert_eq!(msg, "PokeAPI 503 Service Unavailable: upstream down")
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_becomes_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/1/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{\"id\": \"not a number\"", "application/json"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/pokemon/1/", server.uri());
        let err = api_for(&server).await.detail(&url).await.unwrap_err();
        assert!(matches!(err, DexError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn detail_maps_record_to_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/25/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "id": 25,
                    "name": "pikachu",
                    "types": [{"slot": 1, "type": {"name": "electric", "url": "x"}}],
                    "sprites": {"front_default": "https://img/25.png", "back_default": null}
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/pokemon/25/", server.uri());
        let entry = api_for(&server).await.detail(&url).await.unwrap();
        assert_eq!(entry.id, 25);
        assert_eq!(entry.name, "pikachu");
        assert_eq!(entry.categories, vec![crate::types::Category::Electric]);
        assert_eq!(entry.imagery.primary(), Some("https://img/25.png"));
    }
}
