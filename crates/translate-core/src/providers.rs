//! Translation providers
//!
//! The primary provider runs opus-mt models on a model inference API and only
//! covers the pairs those models exist for. The secondary provider is a
//! general-purpose translation REST API that covers every [`Language`].

use crate::error::TranslateError;
use crate::language::Language;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, from: Language, to: Language) -> bool;

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError>;
}

fn body_excerpt(body: &str) -> String {
    body.chars().take(300).collect()
}

/// opus-mt models behind a model inference API
pub struct OpusMtProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpusMtOutput {
    translation_text: String,
}

impl OpusMtProvider {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn model_id(from: Language, to: Language) -> String {
        format!("Helsinki-NLP/opus-mt-{}-{}", from.code(), to.code())
    }
}

#[async_trait]
impl TranslationProvider for OpusMtProvider {
    fn name(&self) -> &'static str {
        "opus_mt"
    }

    fn supports(&self, from: Language, to: Language) -> bool {
        // No Portuguese model pairs are published
        from != to && from != Language::Pt && to != Language::Pt
    }

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError> {
        if !self.supports(from, to) {
            return Err(TranslateError::UnsupportedPair {
                provider: self.name(),
                from,
                to,
            });
        }

        let url = format!("{}/{}", self.base_url, Self::model_id(from, to));
        let mut request = self.client.post(url).json(&json!({ "inputs": text }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let value: Value = response.json().await?;
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(TranslateError::Remote(error.to_string()));
        }

        let outputs: Vec<OpusMtOutput> = serde_json::from_value(value)
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.translation_text)
            .ok_or_else(|| TranslateError::Malformed("no translation returned".to_string()))
    }
}

/// General-purpose `GET /get?q=...&langpair=xx|yy` translation API
pub struct GeneralApiProvider {
    client: Client,
    base_url: String,
}

impl GeneralApiProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Extract the translated text from a general API response body
pub fn parse_general_response(value: &Value) -> Result<String, TranslateError> {
    // responseStatus arrives as a number or a numeric string
    let status = match &value["responseStatus"] {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };

    if let Some(status) = status.filter(|s| *s != 200) {
        let details = value["responseDetails"]
            .as_str()
            .unwrap_or("translation refused")
            .to_string();
        return Err(TranslateError::Remote(format!("{}: {}", status, details)));
    }

    value["responseData"]["translatedText"]
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TranslateError::Malformed("missing responseData.translatedText".to_string()))
}

#[async_trait]
impl TranslationProvider for GeneralApiProvider {
    fn name(&self) -> &'static str {
        "general_api"
    }

    fn supports(&self, from: Language, to: Language) -> bool {
        from != to
    }

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError> {
        let langpair = format!("{}|{}", from.code(), to.code());
        let response = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let value: Value = response.json().await?;
        parse_general_response(&value)
    }
}
