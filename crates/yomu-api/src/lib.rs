#[macro_use]
extern crate log;

mod admin;
mod auth;
mod chapter;
mod comment;
mod follow;
mod history;
mod manga;
mod notification;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unauthorized, please login again")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found")]
    NotFound,
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn mime(&self) -> String {
        self.mime.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .to_string()
        })
    }

    fn into_part(self) -> Result<reqwest::multipart::Part> {
        let mime = self.mime();
        Ok(reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&mime)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Thin wrapper over the backend REST API.
///
/// Every call carries the bearer token when one is set. The client is cheap to
/// clone, all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.is_empty());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|token| !token.is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header("X-Yomu-Client", yomu_lib::LIB_VERSION);
        if let Some(token) = self.token.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let body = self.execute(req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        let _ = self.execute(req).await?;
        Ok(())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<String> {
        let res = req.send().await?;
        let status = res.status();
        debug!("{} {}", res.url(), status);

        let body = res.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        warn!("request failed with {}: {}", status, body);
        Err(status_error(status, &body))
    }
}

fn status_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound,
        status => Error::Status {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_error_reads_backend_message() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"title must not be blank"}"#,
        );
        assert_eq!(err.to_string(), "400: title must not be blank");

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "500: Internal Server Error");

        assert!(status_error(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, r#"{"error":"admin only"}"#),
            Error::Forbidden(message) if message == "admin only"
        ));
    }

    #[test]
    fn test_upload_mime_guess() {
        assert_eq!(Upload::new("001.png", vec![]).mime(), "image/png");
        assert_eq!(Upload::new("cover.jpg", vec![]).mime(), "image/jpeg");
        assert_eq!(
            Upload::new("notes", vec![]).mime(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = Client::new("http://localhost:8080/api/").with_token(Some(String::new()));
        assert_eq!(client.url("/manga"), "http://localhost:8080/api/manga");
        assert!(client.token().is_none());
    }
}
