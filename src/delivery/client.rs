use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::DeliveryConfig;
use crate::delivery::error::DeliveryError;

const GQL_TOKEN_HEADER: &str = "X-GQL-Token";

/// Thin GraphQL transport for the content-delivery endpoint.
///
/// Each call is a single POST carrying a `{query, variables}` payload. The
/// response envelope is parsed here, but the `data` payload stays opaque —
/// the client does not know the schema. No retries, no caching.
pub struct DeliveryClient {
    http: reqwest::Client,
    api_url: String,
    auth_token: String,
}

impl DeliveryClient {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Execute one GraphQL query and return the envelope's `data` payload.
    pub async fn fetch_graphql(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, DeliveryError> {
        debug!(endpoint = %self.api_url, "posting GraphQL query");

        let response = self
            .http
            .post(&self.api_url)
            .header(GQL_TOKEN_HEADER, &self.auth_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: GraphQlEnvelope = response.json().await?;
        unwrap_envelope(envelope)
    }
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

/// A non-empty `errors` array always wins over `data`.
fn unwrap_envelope(envelope: GraphQlEnvelope) -> Result<Value, DeliveryError> {
    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            error!(?errors, "delivery API reported query errors");
            return Err(DeliveryError::RemoteQuery { errors });
        }
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}
