//! HTTP client for the model-serving endpoint

use super::traits::{QueryOutcome, RoleMessage, ServingBackend};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Name of the served entity that marks an endpoint as feedback-capable.
const FEEDBACK_ENTITY: &str = "feedback";

/// Client for the serving REST API.
///
/// Talks to two surfaces of the serving host:
/// - `POST {base_url}/serving-endpoints/{name}/invocations` for queries and
///   feedback submission
/// - `GET {base_url}/api/2.0/serving-endpoints/{name}` for endpoint metadata
pub struct ServingClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ServingClient {
    /// Create a new client. `token` is sent as a bearer credential when
    /// non-empty; local mock servers accept unauthenticated requests.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create serving HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            },
        })
    }

    fn invocations_url(&self, endpoint: &str) -> String {
        format!("{}/serving-endpoints/{}/invocations", self.base_url, endpoint)
    }

    fn metadata_url(&self, endpoint: &str) -> String {
        format!("{}/api/2.0/serving-endpoints/{}", self.base_url, endpoint)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// POST a JSON body and return the parsed JSON response, converting
    /// non-2xx statuses into errors carrying the status and a body excerpt.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .authorize(self.http.post(url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!(
                "Serving endpoint returned {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Invalid JSON from {}", url))
    }
}

#[async_trait]
impl ServingBackend for ServingClient {
    async fn query(
        &self,
        endpoint: &str,
        messages: &[RoleMessage],
        max_tokens: u32,
        return_trace: bool,
    ) -> Result<QueryOutcome> {
        let mut body = json!({
            "messages": messages,
            "max_tokens": max_tokens,
        });
        if return_trace {
            body["databricks_options"] = json!({ "return_trace": true });
        }

        let response = self.post_json(&self.invocations_url(endpoint), &body).await?;
        Ok(parse_query_response(&response))
    }

    async fn supports_feedback(&self, endpoint: &str) -> Result<bool> {
        let url = self.metadata_url(endpoint);
        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Endpoint metadata lookup returned {}", status);
        }

        let metadata: Value = response
            .json()
            .await
            .with_context(|| format!("Invalid JSON from {}", url))?;

        Ok(has_feedback_entity(&metadata))
    }

    async fn submit_feedback(&self, endpoint: &str, request_id: &str, rating: i32) -> Result<()> {
        let body = json!({
            "dataframe_records": [{
                "request_id": request_id,
                "source": "serving-gateway",
                "rating": rating,
            }]
        });

        self.post_json(&self.invocations_url(endpoint), &body).await?;
        Ok(())
    }
}

/// Extract the reply messages and request id from an invocations response.
///
/// Two shapes are accepted: agent endpoints return a top-level `messages`
/// array, chat-completions endpoints return `choices[].message`. The request
/// id lives in `databricks_output.databricks_request_id` for traced agent
/// responses, with the top-level `id` field as fallback.
fn parse_query_response(body: &Value) -> QueryOutcome {
    let mut messages = Vec::new();

    if let Some(list) = body.get("messages").and_then(Value::as_array) {
        messages.extend(list.iter().filter_map(value_to_message));
    } else if let Some(choices) = body.get("choices").and_then(Value::as_array) {
        messages.extend(
            choices
                .iter()
                .filter_map(|choice| choice.get("message"))
                .filter_map(value_to_message),
        );
    }

    let request_id = body
        .pointer("/databricks_output/databricks_request_id")
        .or_else(|| body.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string);

    QueryOutcome {
        messages,
        request_id,
    }
}

fn value_to_message(value: &Value) -> Option<RoleMessage> {
    let role = value.get("role")?.as_str()?.to_string();
    let content = value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(RoleMessage { role, content })
}

/// True iff the endpoint metadata lists a served entity named "feedback".
fn has_feedback_entity(metadata: &Value) -> bool {
    metadata
        .pointer("/config/served_entities")
        .and_then(Value::as_array)
        .map(|entities| {
            entities
                .iter()
                .any(|e| e.get("name").and_then(Value::as_str) == Some(FEEDBACK_ENTITY))
        })
        .unwrap_or(false)
}
