//! Route modules for the docbabel server

pub mod health;
pub mod ocr;
pub mod translate;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config().server.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/ocr", ocr::router())
        .nest("/api/v1/translate", translate::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::detect::testing::FixedDetector;
    use crate::detect::{LinguaDetector, SourceDetector};
    use crate::ocr::{MockEngine, OcrSelector, OcrSelectorConfig};
    use crate::pdf::PdftoppmRasterizer;
    use crate::translate::{
        ChainConfig, ProviderError, ScriptedProvider, TranslationOrchestrator, TranslationProvider,
    };

    fn app(engine: MockEngine, provider: ScriptedProvider) -> Router {
        app_with(engine, Arc::new(provider), Arc::new(LinguaDetector::new()))
    }

    fn app_with(engine: MockEngine, provider: Arc<ScriptedProvider>, detector: Arc<dyn SourceDetector>) -> Router {
        let ocr = OcrSelector::new(
            Arc::new(engine),
            Arc::new(PdftoppmRasterizer::new("/nonexistent/pdftoppm")),
            OcrSelectorConfig::default(),
        );
        let providers: Vec<Arc<dyn TranslationProvider>> = vec![provider];
        let translator = TranslationOrchestrator::new(providers, ChainConfig::default());
        router(AppState::from_parts(Config::default(), ocr, translator, detector))
    }

    /// Provider that only succeeds when told the source language
    fn needs_source(name: &str) -> ScriptedProvider {
        ScriptedProvider::new(name, |text, source, _| {
            if source == "auto" {
                Err(ProviderError::Unavailable("auto detection unsupported".to_string()))
            } else {
                Ok(format!("[{}] {}", source, text))
            }
        })
    }

    fn png() -> Vec<u8> {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([255])));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_bytes(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_ocr_image_upload() {
        let app = app(
            MockEngine::new([("eng", "Hello scanned world")]),
            ScriptedProvider::uppercase("google"),
        );
        let (status, body) = send(app, post_bytes("/api/v1/ocr", png())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Hello scanned world");
        assert_eq!(body["chars"], 19);
        assert_eq!(body["pages"], 1);
        assert_eq!(body["selections"][0]["hypothesis"], "eng");
        assert_eq!(body["selections"][0]["script"], "latin");
    }

    #[tokio::test]
    async fn test_ocr_reports_detected_language() {
        let app = app(
            MockEngine::new([("tam", "தமிழ் ஒரு பழமையான மொழி")]),
            ScriptedProvider::uppercase("google"),
        );
        let (status, body) = send(app, post_bytes("/api/v1/ocr", png())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selections"][0]["script"], "tamil");
        assert_eq!(body["detected_language"], "ta");
    }

    #[tokio::test]
    async fn test_ocr_nothing_recognized() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let (status, body) = send(app, post_bytes("/api/v1/ocr", png())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "nothing_recognized");
    }

    #[tokio::test]
    async fn test_ocr_rejects_empty_and_unknown_bodies() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let (status, _) = send(app.clone(), post_bytes("/api/v1/ocr", Vec::new())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(app, post_bytes("/api/v1/ocr", b"not a document".to_vec())).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "unsupported_document");
    }

    #[tokio::test]
    async fn test_ocr_pdf_without_rasterizer_binary() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let (status, body) = send(app, post_bytes("/api/v1/ocr", b"%PDF-1.7\n".to_vec())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "unreadable_pdf");
    }

    #[tokio::test]
    async fn test_translate_success() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "hello world", "target_lang": "hi"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translated_text"], "HELLO WORLD");
        assert_eq!(body["provider"], "google");
        assert_eq!(body["stage"], "primary");
        assert_eq!(body["attempts"], 1);
        assert_eq!(body["noop"], false);
    }

    #[tokio::test]
    async fn test_translate_detects_source_for_explicit_stage() {
        let provider = Arc::new(needs_source("google"));
        let app = app_with(MockEngine::default(), provider.clone(), Arc::new(LinguaDetector::new()));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "தமிழ் ஒரு பழமையான மொழி", "target_lang": "en"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "explicit-source");
        assert_eq!(body["source_lang"], "ta");
        assert_eq!(body["translated_text"], "[ta] தமிழ் ஒரு பழமையான மொழி");

        let sources: Vec<String> = provider.calls().into_iter().map(|(_, source, _)| source).collect();
        assert_eq!(sources, vec!["auto", "auto", "ta"]);
    }

    #[tokio::test]
    async fn test_translate_caller_source_overrides_detection() {
        let provider = Arc::new(needs_source("google"));
        let app = app_with(MockEngine::default(), provider.clone(), Arc::new(FixedDetector(Some("hi"))));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "hola mundo", "target_lang": "en", "source_lang": "ES"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_lang"], "es");
        assert_eq!(body["translated_text"], "[es] hola mundo");
    }

    #[tokio::test]
    async fn test_translate_undetermined_source_skips_explicit_stage() {
        let provider = Arc::new(needs_source("google"));
        let app = app_with(MockEngine::default(), provider.clone(), Arc::new(FixedDetector(None)));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "hola mundo", "target_lang": "en", "source_lang": "auto"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "translation_failed");
        assert!(provider.calls().iter().all(|(_, source, _)| source == "auto"));
    }

    #[tokio::test]
    async fn test_translate_exhaustion_is_bad_gateway() {
        let app = app(MockEngine::default(), ScriptedProvider::failing("google"));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "hello", "target_lang": "ta", "source_lang": "en"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "translation_failed");
    }

    #[tokio::test]
    async fn test_translate_validation_errors() {
        let app = app(MockEngine::default(), ScriptedProvider::uppercase("google"));
        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "hello", "target_lang": "english"}),
        );
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_translation_request");

        let request = post_json(
            "/api/v1/translate",
            serde_json::json!({"text": "x".repeat(12001), "target_lang": "hi"}),
        );
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
