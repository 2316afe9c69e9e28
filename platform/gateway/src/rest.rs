//! PostgREST client for the hosted table service.
//!
//! | Operation | Method | Path + params |
//! |-----------|--------|---------------|
//! | list      | GET    | `/rest/v1/{table}?select=..&col=eq.v&order=col.desc` |
//! | get       | GET    | `/rest/v1/{table}?select=*&id=eq.{id}` |
//! | create    | POST   | `/rest/v1/{table}` with `[record]` |
//! | update    | PATCH  | `/rest/v1/{table}?id=eq.{id}` |
//! | delete    | DELETE | `/rest/v1/{table}?id=eq.{id}` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    Gateway,
    error::{GatewayError, GatewayResult},
    query::Query,
    settings::{ConfigError, GatewaySettings},
};

const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    settings: GatewaySettings,
}

impl RestGateway {
    pub fn new(settings: GatewaySettings) -> GatewayResult<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&settings.api_key).map_err(|_| ConfigError::InvalidKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|_| ConfigError::InvalidKey)?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|source| GatewayError::Http {
                endpoint: "client_init".into(),
                source,
            })?;
        Ok(Self { http, settings })
    }

    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> GatewayResult<reqwest::Response> {
        let resp = request.send().await.map_err(|source| GatewayError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Backend {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }
        Ok(resp)
    }

    async fn rows(endpoint: &str, resp: reqwest::Response) -> GatewayResult<Vec<Value>> {
        let body = resp.text().await.map_err(|source| GatewayError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&body).map_err(|err| GatewayError::decode(endpoint, err))? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            row @ Value::Object(_) => Ok(vec![row]),
            other => Err(GatewayError::decode(
                endpoint,
                format!("expected rows, got {other}"),
            )),
        }
    }

    fn id_filter(id: Uuid) -> (&'static str, String) {
        ("id", format!("eq.{id}"))
    }
}

#[async_trait]
impl Gateway for RestGateway {
    #[instrument(name = "gateway.list", skip_all, fields(table = table))]
    async fn list(&self, table: &str, query: &Query) -> GatewayResult<Vec<Value>> {
        let endpoint = format!("GET {table}");
        let request = self
            .http
            .get(self.settings.table_url(table))
            .query(&query.to_params());
        let resp = self.send(&endpoint, request).await?;
        let rows = Self::rows(&endpoint, resp).await?;
        debug!(rows = rows.len(), "gateway rows fetched");
        Ok(rows)
    }

    #[instrument(name = "gateway.get", skip_all, fields(table = table, id = %id))]
    async fn get(&self, table: &str, id: Uuid) -> GatewayResult<Option<Value>> {
        let endpoint = format!("GET {table}/{id}");
        let request = self
            .http
            .get(self.settings.table_url(table))
            .query(&[("select", "*".to_string())])
            .query(&[Self::id_filter(id)]);
        let resp = self.send(&endpoint, request).await?;
        Ok(Self::rows(&endpoint, resp).await?.into_iter().next())
    }

    #[instrument(name = "gateway.create", skip_all, fields(table = table))]
    async fn create(&self, table: &str, record: Value) -> GatewayResult<Value> {
        let endpoint = format!("POST {table}");
        let request = self
            .http
            .post(self.settings.table_url(table))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&Value::Array(vec![record]));
        let resp = self.send(&endpoint, request).await?;
        Self::rows(&endpoint, resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::decode(&endpoint, "insert returned no rows"))
    }

    #[instrument(name = "gateway.update", skip_all, fields(table = table, id = %id))]
    async fn update(&self, table: &str, id: Uuid, patch: Value) -> GatewayResult<Value> {
        let endpoint = format!("PATCH {table}/{id}");
        let request = self
            .http
            .patch(self.settings.table_url(table))
            .query(&[Self::id_filter(id)])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch);
        let resp = self.send(&endpoint, request).await?;
        Self::rows(&endpoint, resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id,
            })
    }

    #[instrument(name = "gateway.delete", skip_all, fields(table = table, id = %id))]
    async fn delete(&self, table: &str, id: Uuid) -> GatewayResult<()> {
        let endpoint = format!("DELETE {table}/{id}");
        let request = self
            .http
            .delete(self.settings.table_url(table))
            .query(&[Self::id_filter(id)]);
        self.send(&endpoint, request).await?;
        Ok(())
    }
}
