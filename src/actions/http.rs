use async_trait::async_trait;
use serde_json::Value;
use crate::actions::{build_payload, Submitter};
use crate::dsl::WorkflowGraph;
use crate::error::{Result, SweepError};
use reqwest::Client;

/// Posts graphs to the remote generation service. No timeout, no retry.
#[derive(Debug)]
pub struct HttpSubmitter {
    client: Client,
    url: String,
}

impl HttpSubmitter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Use a custom `reqwest::Client` (proxies, TLS, timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, prompt: &WorkflowGraph) -> Result<Value> {
        let payload = build_payload(prompt)?;

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SweepError::Network {
                context: format!("Cannot reach generation service at {}", self.url),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SweepError::Http {
                status: status.as_u16(),
                body,
            });
        }

        // Some deployments answer with an empty body
        let text = response.text().await.map_err(|e| SweepError::Network {
            context: "Failed to read generation service response".into(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let data: Value = serde_json::from_str(&text)?;

        if let Some(errors) = data.get("node_errors").and_then(|e| e.as_object()) {
            if !errors.is_empty() {
                return Err(SweepError::NodeErrors(
                    serde_json::to_string(errors).unwrap_or_default(),
                ));
            }
        }

        Ok(data)
    }
}
