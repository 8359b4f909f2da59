pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, LogFormat, LoggingConfig, OcrConfig, ServerConfig, SessionConfig};
    use crate::models::Language;
    use crate::ocr::{DecodedImage, EngineError, OcrEngine, OcrProvider};

    const BOUNDARY: &str = "transcriptor-test-boundary";

    struct EchoEngine {
        output: String,
        calls: Mutex<Vec<String>>,
    }

    impl OcrEngine for EchoEngine {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn recognize(&self, _image: &DecodedImage, language_code: &str) -> Result<String, EngineError> {
            self.calls.lock().unwrap().push(language_code.to_string());
            Ok(self.output.clone())
        }
    }

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
                max_upload_bytes: 1024 * 1024,
            },
            ocr: OcrConfig {
                data_path: None,
                default_language: Language::Spanish,
            },
            session: SessionConfig::default(),
            logging: LoggingConfig {
                format: LogFormat::Text,
            },
        }
    }

    fn test_state(output: &str) -> (AppState, Arc<EchoEngine>) {
        let engine = Arc::new(EchoEngine {
            output: output.to_string(),
            calls: Mutex::new(Vec::new()),
        });
        let ocr = OcrProvider::with_engine(engine.clone());
        (AppState::new(test_config(), ocr), engine)
    }

    fn png() -> Vec<u8> {
        let mut out = Vec::new();
        image::DynamicImage::new_rgb8(16, 16)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn multipart(filename: &str, bytes: &[u8], language: Option<&str>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(language) = language {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\n{language}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/ocr")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ocr_status() {
        let (state, _) = test_state("x");
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["ocr"]["engine"], "echo");
        assert_eq!(json["data"]["ocr"]["languages"], serde_json::json!(["spa", "eng"]));
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn health_is_degraded_without_engine() {
        let state = AppState::new(test_config(), OcrProvider::unavailable("missing"));
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "degraded");
        assert_eq!(json["data"]["ocr"]["reason"], "missing");
    }

    #[tokio::test]
    async fn languages_lists_spanish_then_english() {
        let (state, _) = test_state("x");
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/languages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        let languages = json["data"]["languages"].as_array().unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[0]["name"], "Spanish");
        assert_eq!(languages[0]["code"], "spa");
        assert_eq!(languages[1]["code"], "eng");
        assert_eq!(json["data"]["default"], "spa");
    }

    #[tokio::test]
    async fn ocr_returns_text_and_download_name() {
        let (state, engine) = test_state("Hola mundo\n");
        let response = create_router(state)
            .oneshot(multipart("carta.png", &png(), Some("eng")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["text"], "Hola mundo\n");
        assert_eq!(json["data"]["empty"], false);
        assert_eq!(json["data"]["language"], "eng");
        assert_eq!(json["data"]["downloadFilename"], "texto_extraido_carta.png.txt");
        assert_eq!(engine.calls.lock().unwrap().as_slice(), ["eng"]);
    }

    #[tokio::test]
    async fn ocr_defaults_to_configured_language() {
        let (state, engine) = test_state("texto");
        let response = create_router(state)
            .oneshot(multipart("a.png", &png(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(engine.calls.lock().unwrap().as_slice(), ["spa"]);
    }

    #[tokio::test]
    async fn ocr_reports_empty_result() {
        let (state, _) = test_state("  \n\t ");
        let response = create_router(state)
            .oneshot(multipart("blank.png", &png(), None))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["empty"], true);
        assert_eq!(json["data"]["text"], "");
    }

    #[tokio::test]
    async fn ocr_rejects_non_image() {
        let (state, engine) = test_state("x");
        let response = create_router(state)
            .oneshot(multipart("notes.png", b"plain text", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unsupported_image");
        assert!(json.get("data").is_none());
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ocr_rejects_unknown_language() {
        let (state, _) = test_state("x");
        let response = create_router(state)
            .oneshot(multipart("a.png", &png(), Some("fra")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn ocr_rejects_oversized_upload() {
        let (state, engine) = test_state("x");
        let huge = vec![0u8; 2 * 1024 * 1024];
        let response = create_router(state)
            .oneshot(multipart("huge.png", &huge, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "payload_too_large");
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ocr_without_engine_is_unavailable() {
        let state = AppState::new(test_config(), OcrProvider::unavailable("missing"));
        let response = create_router(state)
            .oneshot(multipart("a.png", &png(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "engine_unavailable");
    }

    #[tokio::test]
    async fn openapi_json_is_valid() {
        let (state, _) = test_state("x");
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(
            version.starts_with('3'),
            "OpenAPI version should start with 3, got: {version}"
        );
        assert!(json["paths"].get("/api/v1/ocr").is_some());
    }
}
