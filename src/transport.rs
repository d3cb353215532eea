//! HTTP transport to the processing service.
//!
//! Converts an assembled [`ProcessRequest`] into a multipart POST. Native
//! builds use reqwest's blocking client; the browser build goes through
//! reqwest's fetch backend and is awaited on the page's event loop.

use imgproc_core::{FieldValue, ProcessRequest};
use thiserror::Error;

use crate::config::AppConfig;

/// Errors from talking to the processing service.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response text, trimmed
        body: String,
    },

    /// No answer within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol failure
    #[error("network error: {0}")]
    Network(String),

    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Check the response status, keeping the body of failed responses.
fn check_status(status: reqwest::StatusCode, body: String) -> Result<String, TransportError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

/// Client for the processing service.
#[derive(Debug, Clone)]
pub struct HttpClient {
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::blocking::Client,
    #[cfg(target_arch = "wasm32")]
    client: reqwest::Client,
    #[cfg(target_arch = "wasm32")]
    timeout: std::time::Duration,
    base_url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpClient {
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// POST the request and return the response body.
    pub fn send(&self, request: &ProcessRequest) -> Result<String, TransportError> {
        use reqwest::blocking::multipart::{Form, Part};

        let mut form = Form::new();
        for field in &request.fields {
            form = match &field.value {
                FieldValue::Text(text) => form.text(field.name, text.clone()),
                FieldValue::File(file) => form.part(
                    field.name,
                    Part::bytes(file.bytes.to_vec())
                        .file_name(file.name.clone())
                        .mime_str(&file.mime)?,
                ),
            };
        }

        let url = request.url(&self.base_url);
        let start = web_time::Instant::now();
        log::info!("🌐 POST {} ({} bytes of images)", url, request.upload_size());

        let response = self.client.post(&url).multipart(form).send()?;
        let status = response.status();
        let body = response.text()?;

        log::info!(
            "🌐 {} answered {} in {:.1}ms",
            request.endpoint,
            status,
            start.elapsed().as_secs_f64() * 1000.0
        );
        check_status(status, body)
    }
}

#[cfg(target_arch = "wasm32")]
impl HttpClient {
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: reqwest::Client::new(),
            timeout: config.request_timeout(),
            base_url: config.base_url.clone(),
        })
    }

    /// POST the request and return the response body.
    pub async fn send(&self, request: &ProcessRequest) -> Result<String, TransportError> {
        use reqwest::multipart::{Form, Part};

        let mut form = Form::new();
        for field in &request.fields {
            form = match &field.value {
                FieldValue::Text(text) => form.text(field.name, text.clone()),
                FieldValue::File(file) => form.part(
                    field.name,
                    Part::bytes(file.bytes.to_vec())
                        .file_name(file.name.clone())
                        .mime_str(&file.mime)?,
                ),
            };
        }

        let url = request.url(&self.base_url);
        let start = web_time::Instant::now();
        log::info!("🌐 POST {} ({} bytes of images)", url, request.upload_size());

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        log::info!(
            "🌐 {} answered {} in {:.1}ms",
            request.endpoint,
            status,
            start.elapsed().as_secs_f64() * 1000.0
        );
        check_status(status, body)
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::test_server::*;
    use super::*;
    use imgproc_core::{Algorithm, ImageFile, RequestBuilder};
    use std::time::Duration;

    fn config_for(base_url: &str) -> AppConfig {
        AppConfig {
            base_url: base_url.to_string(),
            ..AppConfig::new()
        }
    }

    fn sample_image(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", b"PNGDATA".to_vec())
    }

    #[test]
    fn test_posts_multipart_to_endpoint() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "/9j/abc".to_string());
        let client = HttpClient::new(&config_for(&base_url)).unwrap();

        let request = RequestBuilder::new(Algorithm::ConvSobelX, sample_image("lena.png"))
            .build();
        let body = client.send(&request).unwrap();
        assert_eq!(body, "/9j/abc");

        let raw = server.join().unwrap();
        assert!(raw.starts_with(b"POST /imageProcessing/process/convolution HTTP/1.1"));
        assert!(contains(&raw, "multipart/form-data; boundary="));
        assert!(contains(&raw, "name=\"image\"; filename=\"lena.png\""));
        assert!(contains(&raw, "Content-Type: image/png"));
        assert!(contains(&raw, "PNGDATA"));
        assert!(contains(&raw, "name=\"algorithm\""));
        assert!(contains(&raw, "Convolution - Sobel X"));
        assert!(!contains(&raw, "secondImage"));
    }

    #[test]
    fn test_second_image_part() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "/9j/".to_string());
        let client = HttpClient::new(&config_for(&base_url)).unwrap();

        let request = RequestBuilder::new(Algorithm::Addition, sample_image("a.png"))
            .second_image(sample_image("b.png"))
            .build();
        client.send(&request).unwrap();

        let raw = server.join().unwrap();
        assert!(raw.starts_with(b"POST /imageProcessing/process/arithmeticOperations"));
        assert!(contains(&raw, "name=\"secondImage\"; filename=\"b.png\""));
    }

    #[test]
    fn test_error_status_keeps_body() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 400 Bad Request",
            "Invalid scaling factor\n".to_string(),
        );
        let client = HttpClient::new(&config_for(&base_url)).unwrap();

        let request = RequestBuilder::new(Algorithm::Rescaling, sample_image("a.png"))
            .build();
        let err = client.send(&request).unwrap_err();
        server.join().unwrap();

        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Invalid scaling factor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout() {
        let base_url = serve_silently(Duration::from_secs(3));
        let mut config = config_for(&base_url);
        config.request_timeout_secs = 1;
        let client = HttpClient::new(&config).unwrap();

        let request = RequestBuilder::new(Algorithm::Negative, sample_image("a.png"))
            .build();
        assert!(matches!(client.send(&request), Err(TransportError::Timeout)));
    }

    #[test]
    fn test_connection_refused() {
        let base_url = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };
        let client = HttpClient::new(&config_for(&base_url)).unwrap();

        let request = RequestBuilder::new(Algorithm::Negative, sample_image("a.png"))
            .build();
        assert!(matches!(
            client.send(&request),
            Err(TransportError::Network(_))
        ));
    }
}
