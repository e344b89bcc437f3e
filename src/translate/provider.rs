//! Translation Providers
//!
//! Defines the provider trait and HTTP implementations for the public
//! translation services the fallback chain walks through.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::types::ProviderError;

/// Single-chunk translation provider
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Provider name for logs and outcomes
    fn name(&self) -> &str;

    /// Translate one chunk. `source` is an ISO code or `"auto"`.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError>;
}

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    MyMemory,
    Libre,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "google" => Some(Self::Google),
            "mymemory" => Some(Self::MyMemory),
            "libre" | "libretranslate" => Some(Self::Libre),
            _ => None,
        }
    }
}

/// Settings shared by the HTTP providers
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Providers in fallback order
    pub order: Vec<ProviderKind>,
    pub google_url: String,
    pub mymemory_url: String,
    /// Contact email raises MyMemory's anonymous quota
    pub mymemory_email: Option<String>,
    pub libre_url: String,
    pub libre_api_key: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            order: vec![ProviderKind::Google, ProviderKind::MyMemory, ProviderKind::Libre],
            google_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            mymemory_url: "https://api.mymemory.translated.net/get".to_string(),
            mymemory_email: None,
            libre_url: "https://libretranslate.de/translate".to_string(),
            libre_api_key: None,
            timeout_secs: 20,
        }
    }
}

/// Build the shared HTTP client with request and connect timeouts
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .build()
        .map_err(|e| ProviderError::Unavailable(format!("Failed to create HTTP client: {}", e)))
}

/// Instantiate providers in the configured order
pub fn build_providers(settings: &ProviderSettings) -> Result<Vec<Arc<dyn TranslationProvider>>, ProviderError> {
    let client = build_http_client(settings.timeout_secs)?;
    let providers = settings
        .order
        .iter()
        .map(|kind| -> Arc<dyn TranslationProvider> {
            match kind {
                ProviderKind::Google => Arc::new(GoogleProvider::new(client.clone(), &settings.google_url)),
                ProviderKind::MyMemory => Arc::new(MyMemoryProvider::new(
                    client.clone(),
                    &settings.mymemory_url,
                    settings.mymemory_email.clone(),
                )),
                ProviderKind::Libre => Arc::new(LibreTranslateProvider::new(
                    client.clone(),
                    &settings.libre_url,
                    settings.libre_api_key.clone(),
                )),
            }
        })
        .collect();
    Ok(providers)
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Rejected {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    })
}

// ============================================================================
// Google (public web endpoint)
// ============================================================================

pub struct GoogleProvider {
    client: reqwest::Client,
    url: String,
}

impl GoogleProvider {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t"), ("q", text)])
            .send()
            .await?;
        let body: serde_json::Value = ensure_success(response).await?.json().await?;
        parse_google_response(&body)
    }
}

/// The response is a nested array; `[0]` holds `[translated, original, ...]`
/// segments in order.
fn parse_google_response(body: &serde_json::Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::InvalidResponse("missing translation segments".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

// ============================================================================
// MyMemory
// ============================================================================

pub struct MyMemoryProvider {
    client: reqwest::Client,
    url: String,
    email: Option<String>,
}

impl MyMemoryProvider {
    pub fn new(client: reqwest::Client, url: &str, email: Option<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: MyMemoryData,
    /// Sent as a number or a string depending on the error path
    response_status: serde_json::Value,
    #[serde(default)]
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    #[serde(default)]
    translated_text: Option<String>,
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        // MyMemory has no "auto"; it spells detection "autodetect"
        let source = if source == "auto" { "autodetect" } else { source };
        let langpair = format!("{}|{}", source, target);

        let mut request = self
            .client
            .get(&self.url)
            .query(&[("q", text), ("langpair", langpair.as_str())]);
        if let Some(email) = &self.email {
            request = request.query(&[("de", email.as_str())]);
        }

        let response = ensure_success(request.send().await?).await?;
        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_mymemory_response(body)
    }
}

fn parse_mymemory_response(body: MyMemoryResponse) -> Result<String, ProviderError> {
    let status = match &body.response_status {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    };
    if status != 200 {
        let message = body
            .response_details
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ProviderError::Rejected {
            status: u16::try_from(status).unwrap_or(0),
            message,
        });
    }

    match body.response_data.translated_text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyResponse),
    }
}

// ============================================================================
// LibreTranslate
// ============================================================================

pub struct LibreTranslateProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl LibreTranslateProvider {
    pub fn new(client: reqwest::Client, url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "libre"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let mut request = serde_json::json!({
            "q": text,
            "source": source,
            "target": target,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            request["api_key"] = serde_json::Value::String(key.clone());
        }

        let response = ensure_success(self.client.post(&self.url).json(&request).send().await?).await?;
        let body: LibreResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(ProviderError::Rejected {
                status: 200,
                message: error,
            });
        }
        match body.translated_text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::EmptyResponse),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("Google"), Some(ProviderKind::Google));
        assert_eq!(ProviderKind::parse(" mymemory "), Some(ProviderKind::MyMemory));
        assert_eq!(ProviderKind::parse("libretranslate"), Some(ProviderKind::Libre));
        assert_eq!(ProviderKind::parse("deepl"), None);
    }

    #[test]
    fn test_parse_google_response_concatenates_segments() {
        let body = serde_json::json!([
            [["नमस्ते। ", "Hello. ", null, null, 10], ["दुनिया", "World", null, null, 10]],
            null,
            "en"
        ]);
        assert_eq!(parse_google_response(&body).unwrap(), "नमस्ते। दुनिया");
    }

    #[test]
    fn test_parse_google_response_errors() {
        assert!(matches!(
            parse_google_response(&serde_json::json!({"error": "x"})),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_google_response(&serde_json::json!([[]])),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_mymemory_success() {
        let body: MyMemoryResponse = serde_json::from_value(serde_json::json!({
            "responseData": {"translatedText": "வணக்கம்", "match": 1},
            "responseStatus": 200,
            "responseDetails": ""
        }))
        .unwrap();
        assert_eq!(parse_mymemory_response(body).unwrap(), "வணக்கம்");
    }

    #[test]
    fn test_parse_mymemory_quota_error() {
        let body: MyMemoryResponse = serde_json::from_value(serde_json::json!({
            "responseData": {"translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS"},
            "responseStatus": "429",
            "responseDetails": "quota exceeded"
        }))
        .unwrap();
        match parse_mymemory_response(body) {
            Err(ProviderError::Rejected { status, message }) => {
                assert_eq!(status, 429);
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_build_providers_respects_order() {
        let settings = ProviderSettings {
            order: vec![ProviderKind::Libre, ProviderKind::Google],
            ..Default::default()
        };
        let providers = build_providers(&settings).unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["libre", "google"]);
    }
}
