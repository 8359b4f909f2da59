#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt;

use transcriptor::api::{create_router, AppState, SESSION_COOKIE};
use transcriptor::config::{Config, LogFormat, LoggingConfig, OcrConfig, ServerConfig, SessionConfig};
use transcriptor::models::Language;
use transcriptor::ocr::{DecodedImage, EngineError, OcrEngine, OcrProvider};

pub const BOUNDARY: &str = "transcriptor-boundary";

/// Engine that returns a fixed output and records every language it was asked for.
pub struct StubEngine {
    output: Result<String, EngineError>,
    calls: Mutex<Vec<String>>,
}

impl StubEngine {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            output: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: EngineError) -> Arc<Self> {
        Arc::new(Self {
            output: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl OcrEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn recognize(&self, _image: &DecodedImage, language_code: &str) -> Result<String, EngineError> {
        self.calls.lock().unwrap().push(language_code.to_string());
        self.output.clone()
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 2 * 1024 * 1024,
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

pub fn app_with(engine: Arc<StubEngine>) -> Router {
    app_with_config(engine, test_config())
}

pub fn app_with_config(engine: Arc<StubEngine>, config: Config) -> Router {
    create_router(AppState::new(config, OcrProvider::with_engine(engine)))
}

pub fn image_bytes(format: image::ImageFormat) -> Vec<u8> {
    let mut out = Vec::new();
    image::DynamicImage::new_rgb8(24, 12)
        .write_to(&mut Cursor::new(&mut out), format)
        .unwrap();
    out
}

pub fn png() -> Vec<u8> {
    image_bytes(image::ImageFormat::Png)
}

/// A browser-like client holding the session cookie between requests.
pub struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> Response<Body> {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, format!("{SESSION_COOKIE}={cookie}")),
            None => builder,
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(value) = response.headers().get(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap();
            if let Some(id) = pair.strip_prefix(&format!("{SESSION_COOKIE}=")) {
                self.cookie = Some(id.to_string());
            }
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri), Body::empty()).await
    }

    pub async fn page(&mut self) -> String {
        let response = self.get("/").await;
        body_text(response).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{k}={}", form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    pub async fn upload(&mut self, filename: &str, bytes: &[u8], language: Option<&str>) -> Response<Body> {
        let body = multipart_body(filename, bytes, language);
        self.send(upload_request(), Body::from(body)).await
    }

    /// Same as [`Client::upload`] but declares the body size up front.
    pub async fn upload_with_length(&mut self, filename: &str, bytes: &[u8]) -> Response<Body> {
        let body = multipart_body(filename, bytes, None);
        let builder = upload_request().header(header::CONTENT_LENGTH, body.len());
        self.send(builder, Body::from(body)).await
    }
}

fn upload_request() -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
}

pub fn multipart_body(filename: &str, bytes: &[u8], language: Option<&str>) -> Vec<u8> {
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
    body
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
