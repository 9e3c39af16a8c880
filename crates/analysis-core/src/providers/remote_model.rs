//! Hosted model app reached through a two-phase call/poll protocol
//!
//! 1. `POST {base}/gradio_api/call/{api}` with `{"data": [clause]}` returns
//!    `{"event_id": "..."}`
//! 2. `GET {base}/gradio_api/call/{api}/{event_id}` returns an event-stream
//!    body whose `data:` line carries a JSON array; its first element is the
//!    analysis payload (a JSON object, or a string holding JSON or prose)

use super::{truncate, AnalysisProvider, ProviderResult};
use crate::config::RemoteModelConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CallResponse {
    event_id: String,
}

pub struct RemoteModelService {
    client: Client,
    config: RemoteModelConfig,
}

impl RemoteModelService {
    pub fn new(client: Client, config: RemoteModelConfig) -> Self {
        Self { client, config }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn submit(&self, clause_text: &str) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(self.config.call_url())
            .json(&json!({ "data": [clause_text] }));

        let response = check_status(self.authorize(request).send().await?).await?;
        let call: CallResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("call response: {}", e)))?;

        Ok(call.event_id)
    }

    async fn fetch(&self, event_id: &str) -> Result<String, ProviderError> {
        let request = self.client.get(self.config.result_url(event_id));
        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.text().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::from_status(status.as_u16(), truncate(&body, 500)))
}

/// Pull the payload out of an event-stream body
pub fn parse_event_stream(body: &str) -> Result<Value, ProviderError> {
    let mut event = "";

    for line in body.lines() {
        let line = line.trim_end();
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
            continue;
        }

        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        match event {
            "error" => {
                return Err(ProviderError::Remote(if data.is_empty() || data == "null" {
                    "model returned an error event".to_string()
                } else {
                    truncate(data, 500)
                }))
            }
            "heartbeat" | "generating" => continue,
            _ => {}
        }

        let parsed: Value = serde_json::from_str(data)
            .map_err(|e| ProviderError::Malformed(format!("event data is not JSON: {}", e)))?;

        match parsed {
            Value::Array(mut items) if !items.is_empty() => return Ok(items.swap_remove(0)),
            Value::Null => continue,
            _ => {
                return Err(ProviderError::Malformed(
                    "event data is not a non-empty array".to_string(),
                ))
            }
        }
    }

    Err(ProviderError::Malformed("no data event in response".to_string()))
}

#[async_trait]
impl AnalysisProvider for RemoteModelService {
    fn name(&self) -> &'static str {
        "remote_model"
    }

    async fn analyze(&self, clause_text: &str) -> ProviderResult {
        let event_id = match self.submit(clause_text).await {
            Ok(id) => id,
            Err(err) => return err.into(),
        };
        debug!(event_id = %event_id, "Remote model call accepted");

        let body = match self.fetch(&event_id).await {
            Ok(body) => body,
            Err(err) => return err.into(),
        };

        match parse_event_stream(&body) {
            Ok(payload) => ProviderResult::from_payload(&payload),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_complete_event() {
        let body = "event: complete\ndata: [\"{\\\"risks\\\": []}\"]\n\n";
        let payload = parse_event_stream(body).unwrap();
        assert_eq!(payload, Value::String("{\"risks\": []}".to_string()));
    }

    #[test]
    fn test_skips_heartbeats() {
        let body = "event: heartbeat\ndata: null\n\nevent: complete\ndata: [{\"risks\": [\"x\"]}]\n\n";
        let payload = parse_event_stream(body).unwrap();
        assert_eq!(payload["risks"][0], "x");
    }

    #[test]
    fn test_error_event() {
        let err = parse_event_stream("event: error\ndata: null\n\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let err = parse_event_stream("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let err = parse_event_stream("event: complete\ndata: {\"a\": 1}\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
