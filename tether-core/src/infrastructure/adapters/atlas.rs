// tether-core/src/infrastructure/adapters/atlas.rs
//
// CatalogGateway over the Atlas v2 REST API, as exposed by Microsoft Purview.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::lineage::{CatalogTypeDefinition, LineageProcessRecord};
use crate::domain::payload::{BulkEntitiesPayload, TypeDefsPayload};
use crate::error::TetherError;
use crate::infrastructure::adapters::auth::ServicePrincipalAuth;
use crate::infrastructure::config::{CatalogConfig, ensure_valid};
use crate::infrastructure::error::{CatalogError, InfrastructureError};
use crate::ports::catalog::{CatalogGateway, CatalogPurge, CatalogSearchHit};

const ATLAS_SEGMENTS: [&str; 4] = ["catalog", "api", "atlas", "v2"];
const SEARCH_SEGMENTS: [&str; 4] = ["catalog", "api", "search", "query"];
const SEARCH_API_VERSION: &str = "2022-03-01-preview";

pub struct AtlasCatalogGateway {
    client: Client,
    base_url: Url,
    auth: ServicePrincipalAuth,
    page_size: usize,
}

impl AtlasCatalogGateway {
    pub fn new(config: &CatalogConfig) -> Result<Self, InfrastructureError> {
        ensure_valid("catalog", config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::ConfigError(format!("HTTP client: {}", e)))?;

        let endpoint = config.endpoint_url();
        let base_url = Url::parse(&endpoint)
            .map_err(|e| InfrastructureError::ConfigError(format!("catalog endpoint '{}': {}", endpoint, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(InfrastructureError::ConfigError(format!(
                "catalog endpoint '{}' is not a base URL",
                endpoint
            )));
        }

        Ok(Self {
            auth: ServicePrincipalAuth::new(client.clone(), config),
            client,
            base_url,
            page_size: config.search_page_size,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus `prefix` and `segments`, each percent-encoded as one
    /// path segment.
    fn url(&self, prefix: &[&str], segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the endpoint can be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(prefix).extend(segments);
        }
        url
    }

    fn atlas_url(&self, segments: &[&str]) -> Url {
        self.url(&ATLAS_SEGMENTS, segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, String> {
        let token = self.auth.bearer().await.map_err(|e| e.to_string())?;
        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| e.to_string())
    }

    async fn upsert_typedefs(
        &self,
        definition: &CatalogTypeDefinition,
    ) -> Result<(), String> {
        let existing = self
            .send(
                self.client
                    .get(self.atlas_url(&["types", "typedef", "name", definition.name.as_str()])),
            )
            .await?;

        let body = TypeDefsPayload {
            entity_defs: vec![definition.clone()],
        };
        let request = match existing.status() {
            s if s.is_success() => {
                debug!(type_name = %definition.name, "Type exists, forcing update");
                self.client.put(self.atlas_url(&["types", "typedefs"]))
            }
            StatusCode::NOT_FOUND => {
                debug!(type_name = %definition.name, "Type missing, creating");
                self.client.post(self.atlas_url(&["types", "typedefs"]))
            }
            other => return Err(error_text(other, existing).await),
        };

        let response = self.send(request.json(&body)).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_text(response.status(), response).await)
        }
    }
}

async fn error_text(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {}: {}", status, body)
}

#[async_trait]
impl CatalogGateway for AtlasCatalogGateway {
    #[instrument(skip(self))]
    async fn exists(&self, qualified_name: &str, type_name: &str) -> Result<bool, TetherError> {
        let lookup_error = |reason: String| CatalogError::TransientLookup {
            qualified_name: qualified_name.to_string(),
            type_name: type_name.to_string(),
            reason,
        };

        let request = self
            .client
            .get(self.atlas_url(&["entity", "uniqueAttribute", "type", type_name]))
            .query(&[("attr:qualifiedName", qualified_name), ("minExtInfo", "true")]);
        let response = self.send(request).await.map_err(lookup_error)?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(lookup_error(error_text(other, response).await).into()),
        }
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upload_batch(&self, records: &[LineageProcessRecord]) -> Result<(), TetherError> {
        if records.is_empty() {
            info!("Empty batch, nothing sent to the catalog");
            return Ok(());
        }

        let attempted = records.len();
        let body = BulkEntitiesPayload::from_records(records);
        let response = self
            .send(self.client.post(self.atlas_url(&["entity", "bulk"])).json(&body))
            .await
            .map_err(|reason| CatalogError::Upload { attempted, reason })?;

        let status = response.status();
        if !status.is_success() {
            let reason = error_text(status, response).await;
            return Err(CatalogError::Upload { attempted, reason }.into());
        }

        info!(attempted, "Lineage batch accepted by the catalog");
        Ok(())
    }

    #[instrument(skip(self, definition), fields(type_name = %definition.name))]
    async fn register_type(&self, definition: &CatalogTypeDefinition) -> Result<(), TetherError> {
        self.upsert_typedefs(definition).await.map_err(|reason| {
            CatalogError::TypeRegistration {
                type_name: definition.name.clone(),
                reason,
            }
        })?;
        info!("Catalog type registered");
        Ok(())
    }
}

// --- SEARCH / DELETE ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchValue {
    id: String,
    #[serde(default)]
    qualified_name: String,
    #[serde(default)]
    entity_type: String,
}

#[async_trait]
impl CatalogPurge for AtlasCatalogGateway {
    async fn search_entities(&self, keyword: &str) -> Result<Vec<CatalogSearchHit>, TetherError> {
        let search_error = |reason: String| CatalogError::Search {
            keyword: keyword.to_string(),
            reason,
        };

        let mut hits = Vec::new();
        let mut offset = 0usize;
        loop {
            let request = self
                .client
                .post(self.url(&SEARCH_SEGMENTS, &[]))
                .query(&[("api-version", SEARCH_API_VERSION)])
                .json(&serde_json::json!({
                    "keywords": keyword,
                    "limit": self.page_size,
                    "offset": offset,
                }));
            let response = self.send(request).await.map_err(search_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(search_error(error_text(status, response).await).into());
            }

            let page: SearchResponse = response
                .json()
                .await
                .map_err(|e| search_error(e.to_string()))?;
            let fetched = page.value.len();
            hits.extend(page.value.into_iter().map(|v| CatalogSearchHit {
                id: v.id,
                qualified_name: v.qualified_name,
                entity_type: v.entity_type,
            }));

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        Ok(hits)
    }

    async fn delete_entity(&self, guid: &str) -> Result<(), TetherError> {
        let delete_error = |reason: String| CatalogError::Delete {
            guid: guid.to_string(),
            reason,
        };
        let response = self
            .send(self.client.delete(self.atlas_url(&["entity", "guid", guid])))
            .await
            .map_err(delete_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(delete_error(error_text(status, response).await).into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entity::{EntityModel, ObjectKind};
    use anyhow::Result;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri, header};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    const TOKEN: &str = r#"{"access_token":"tok","expires_in":3600}"#;

    type Handler = Arc<dyn Fn(&str, &str) -> (u16, String) + Send + Sync>;

    /// Catalog API scripted by (method, path). The token endpoint is served
    /// separately; every request is recorded as `METHOD /path?query`.
    #[derive(Clone)]
    struct Script {
        handler: Handler,
        reject_tokens: bool,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl Script {
        fn record(&self, method: &Method, uri: &Uri) -> String {
            let path = uri
                .path_and_query()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string());
            self.requests
                .lock()
                .unwrap()
                .push(format!("{} {}", method, path));
            path
        }
    }

    async fn issue_token(State(script): State<Script>, method: Method, uri: Uri) -> impl IntoResponse {
        script.record(&method, &uri);
        if script.reject_tokens {
            (StatusCode::UNAUTHORIZED, r#"{"error":"invalid_client"}"#.to_string())
        } else {
            (StatusCode::OK, TOKEN.to_string())
        }
    }

    async fn scripted(State(script): State<Script>, method: Method, uri: Uri) -> impl IntoResponse {
        let path = script.record(&method, &uri);
        let (status, body) = (script.handler)(method.as_str(), &path);
        (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
    }

    struct FakeCatalog {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeCatalog {
        async fn start(handler: Handler) -> Result<Self> {
            Self::serve(handler, false).await
        }

        async fn rejecting_tokens() -> Result<Self> {
            Self::serve(Arc::new(|_: &str, _: &str| (200, "{}".into())), true).await
        }

        async fn serve(handler: Handler, reject_tokens: bool) -> Result<Self> {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let script = Script {
                handler,
                reject_tokens,
                requests: requests.clone(),
            };
            let app = Router::new()
                .route("/{tenant}/oauth2/v2.0/token", post(issue_token))
                .fallback(scripted)
                .with_state(script);

            let listener = TcpListener::bind("127.0.0.1:0").await?;
            let base_url = format!("http://{}", listener.local_addr()?);
            tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });

            Ok(Self { base_url, requests })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn gateway(&self) -> AtlasCatalogGateway {
            AtlasCatalogGateway::new(&CatalogConfig {
                account: String::new(),
                endpoint: Some(self.base_url.clone()),
                tenant_id: "tenant".into(),
                client_id: "client".into(),
                client_secret: "secret".into(),
                authority: self.base_url.clone(),
                timeout_secs: 5,
                search_page_size: 2,
                ..Default::default()
            })
            .expect("valid config")
        }
    }

    fn record() -> LineageProcessRecord {
        let e = |n: &str| EntityModel::new(Some("DB".into()), Some("S".into()), n, ObjectKind::Table, "h");
        LineageProcessRecord::new(e("A"), e("B"))
    }

    #[tokio::test]
    async fn test_exists_maps_status_codes() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, p: &str| {
            if p.contains("catalog_table") {
                (200, "{}".into())
            } else if p.contains("catalog_view") {
                (404, "{}".into())
            } else {
                (500, "boom".into())
            }
        }))
        .await?;
        let gateway = fake.gateway();

        assert!(gateway.exists("qn", "catalog_table").await?);
        assert!(!gateway.exists("qn", "catalog_view").await?);

        let err = gateway.exists("qn", "catalog_stage").await.unwrap_err();
        assert!(matches!(
            err.as_catalog(),
            Some(CatalogError::TransientLookup { .. })
        ));

        // Token fetched once and reused.
        let token_calls = fake
            .requests()
            .iter()
            .filter(|r| r.contains("/oauth2/"))
            .count();
        assert_eq!(token_calls, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_auth_failure_is_transient_lookup() -> Result<()> {
        let fake = FakeCatalog::rejecting_tokens().await?;
        let err = fake.gateway().exists("qn", "catalog_table").await.unwrap_err();
        assert!(matches!(
            err.as_catalog(),
            Some(CatalogError::TransientLookup { .. })
        ));
        assert!(!fake.requests().iter().any(|r| r.contains("/entity/")));
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_lookup_is_not_missing() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, _: &str| (401, "{}".into()))).await?;
        let err = fake.gateway().exists("qn", "catalog_table").await.unwrap_err();
        assert!(matches!(
            err.as_catalog(),
            Some(CatalogError::TransientLookup { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_posts_one_bulk_request() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, _: &str| (200, "{}".into()))).await?;
        let gateway = fake.gateway();

        gateway.upload_batch(&[record(), record()]).await?;
        gateway.upload_batch(&[]).await?;

        let bulk: Vec<_> = fake
            .requests()
            .into_iter()
            .filter(|r| r.contains("/entity/bulk"))
            .collect();
        assert_eq!(bulk, vec!["POST /catalog/api/atlas/v2/entity/bulk".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_failure_carries_attempted_count() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, _: &str| (503, "busy".into()))).await?;
        let err = fake
            .gateway()
            .upload_batch(&[record(), record(), record()])
            .await
            .unwrap_err();
        match err.as_catalog() {
            Some(CatalogError::Upload { attempted, reason }) => {
                assert_eq!(*attempted, 3);
                assert!(reason.contains("503"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_register_type_creates_then_updates() -> Result<()> {
        let known = Arc::new(Mutex::new(false));
        let state = known.clone();
        let fake = FakeCatalog::start(Arc::new(move |m: &str, p: &str| {
            let mut exists = state.lock().unwrap();
            match (m, p.contains("/typedef/name/")) {
                ("GET", true) if *exists => (200, "{}".into()),
                ("GET", true) => (404, "{}".into()),
                _ => {
                    *exists = true;
                    (200, "{}".into())
                }
            }
        }))
        .await?;
        let gateway = fake.gateway();
        let def = CatalogTypeDefinition::stage_load();

        gateway.register_type(&def).await?;
        gateway.register_type(&def).await?;

        let writes: Vec<_> = fake
            .requests()
            .into_iter()
            .filter(|r| r.ends_with("/types/typedefs"))
            .collect();
        assert_eq!(
            writes,
            vec![
                "POST /catalog/api/atlas/v2/types/typedefs".to_string(),
                "PUT /catalog/api/atlas/v2/types/typedefs".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_pages_until_short_page() -> Result<()> {
        let pages = Arc::new(Mutex::new(0usize));
        let counter = pages.clone();
        let fake = FakeCatalog::start(Arc::new(move |_: &str, _: &str| {
            let mut served = counter.lock().unwrap();
            *served += 1;
            if *served == 1 {
                (
                    200,
                    r#"{"value":[{"id":"g1","qualifiedName":"q1","entityType":"t"},{"id":"g2","qualifiedName":"q2","entityType":"t"}]}"#.into(),
                )
            } else {
                (200, r#"{"value":[{"id":"g3"}]}"#.into())
            }
        }))
        .await?;

        let hits = fake.gateway().search_entities("acme").await?;
        assert_eq!(
            hits.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
            vec!["g1", "g2", "g3"]
        );
        assert_eq!(hits[0].qualified_name, "q1");
        assert_eq!(*pages.lock().unwrap(), 2);
        assert!(
            fake.requests()
                .iter()
                .any(|r| r.contains("api-version=2022-03-01-preview"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entity_by_guid() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, _: &str| (200, "{}".into()))).await?;
        fake.gateway().delete_entity("abc-123").await?;
        assert!(
            fake.requests()
                .contains(&"DELETE /catalog/api/atlas/v2/entity/guid/abc-123".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_path_segments_are_percent_encoded() -> Result<()> {
        let fake = FakeCatalog::start(Arc::new(|_: &str, _: &str| (404, "{}".into()))).await?;
        let gateway = fake.gateway();

        assert!(!gateway.exists("qn", "odd/type name").await?);
        let _ = gateway.delete_entity("a/b c").await;

        let requests = fake.requests();
        assert!(
            requests.iter().any(|r| r.starts_with(
                "GET /catalog/api/atlas/v2/entity/uniqueAttribute/type/odd%2Ftype%20name?"
            )),
            "{requests:?}"
        );
        assert!(
            requests.contains(&"DELETE /catalog/api/atlas/v2/entity/guid/a%2Fb%20c".to_string()),
            "{requests:?}"
        );
        Ok(())
    }
}
