//! Main client implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::api::{AttachmentsApi, ChatsApi, GroupsApi, MentionsApi, UsersApi};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::query::is_dot_segment;

/// Content type sent with JSON bodies.
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Statuses that count as success for every verb.
const SUCCESS_STATUSES: [u16; 4] = [200, 201, 204, 304];

/// Messenger API client.
///
/// Cheap to clone; clones share the HTTP connection pool and configuration.
///
/// # Example
///
/// ```no_run
/// use messenger_client::{ChatRef, MessengerClient, SendMessage};
///
/// # async fn example() -> messenger_client::Result<()> {
/// let client = MessengerClient::builder()
///     .token("secret")
///     .build()?;
///
/// let message = SendMessage::new(ChatRef::group("g-1"), "Hello!");
/// client.chats().send_message(&message).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MessengerClient {
    inner: Arc<ClientInner>,
    /// Token used instead of the configured one.
    token_override: Option<String>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client for API calls. Never follows redirects.
    pub(crate) http: reqwest::Client,
    /// HTTP client for signed-URL downloads.
    pub(crate) download_http: reqwest::Client,
    /// API root, e.g. `https://api.alterdesk.com/v1/`.
    pub(crate) base_url: Url,
    pub(crate) config: ClientConfig,
}

/// Outcome of an accepted API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `None` when the body was empty.
    pub body: Option<serde_json::Value>,
    /// Cookies from a `302` GET response, formatted for a `Cookie` header.
    pub cookie: Option<String>,
}

impl ApiResponse {
    /// Take the body, failing if it was empty.
    pub fn into_body(self) -> Result<serde_json::Value> {
        self.body.ok_or(Error::EmptyBody)
    }

    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_body()?)?)
    }
}

impl MessengerClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client configured from `MESSENGER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env().build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Clone of this client that authenticates with `token` instead.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token_override: Some(token.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the group chats API.
    pub fn groups(&self) -> GroupsApi {
        GroupsApi::new(self.clone())
    }

    /// Access the chats (conversations and messages) API.
    pub fn chats(&self) -> ChatsApi {
        ChatsApi::new(self.clone())
    }

    /// Access the attachments and PDF export API.
    pub fn attachments(&self) -> AttachmentsApi {
        AttachmentsApi::new(self.clone())
    }

    /// Access mention resolution.
    pub fn mentions(&self) -> MentionsApi {
        MentionsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve the bearer token for the next request.
    pub(crate) fn token(&self) -> Result<&str> {
        self.token_override
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.inner.config.token.as_deref().filter(|t| !t.is_empty()))
            .ok_or(Error::MissingToken)
    }

    /// Build a URL for an API path.
    ///
    /// Dot segments are rejected: joining would resolve them and the request
    /// would go to a different resource.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        let route = path.split(['?', '#']).next().unwrap_or_default();
        if route.split('/').any(is_dot_segment) {
            tracing::error!(path, "Refusing path with dot segment");
            return Err(Error::InvalidPath(path.to_string()));
        }
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send_json(Method::GET, path, None).await
    }

    /// Make a GET request and deserialize the body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json()
    }

    /// Make a POST request with a JSON body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send_json(Method::POST, path, Some(body)).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send_json(Method::PUT, path, Some(body)).await
    }

    /// Make a DELETE request with a JSON body.
    pub async fn delete<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send_json(Method::DELETE, path, Some(body)).await
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let token = self.token().inspect_err(|_| {
            tracing::error!(%method, path, "API token not set");
        })?;
        let url = self.url(path)?;

        tracing::debug!(%method, path, body_len = body.as_ref().map(Vec::len), ">>");

        let mut request = self
            .inner
            .http
            .request(method.clone(), url)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::error!(%method, path, error = %e, "<< transport error");
        })?;
        self.handle_response(&method, path, response).await
    }

    /// POST a multipart form with one part per file under `file_field`.
    ///
    /// Every file must exist and be non-empty; otherwise nothing is sent.
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: Option<&serde_json::Map<String, serde_json::Value>>,
        file_field: &str,
        file_paths: &[PathBuf],
    ) -> Result<ApiResponse> {
        let token = self.token().inspect_err(|_| {
            tracing::error!(path, "API token not set");
        })?;

        let mut lengths = Vec::with_capacity(file_paths.len());
        for file_path in file_paths {
            lengths.push(check_upload_file(file_path).await?);
        }

        let url = self.url(path)?;
        tracing::debug!(path, files = ?file_paths, ">> multipart");

        let mut form = Form::new();
        if let Some(fields) = fields {
            for (name, value) in fields {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(name.clone(), text);
            }
        }
        for (file_path, length) in file_paths.iter().zip(lengths) {
            let file = tokio::fs::File::open(file_path)
                .await
                .map_err(|e| Error::file(file_path, e.to_string()))?;
            let mut part = Part::stream_with_length(file, length);
            if let Some(name) = file_path.file_name() {
                part = part.file_name(name.to_string_lossy().into_owned());
            }
            form = form.part(file_field.to_string(), part);
        }

        let response = self
            .inner
            .http
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| {
                tracing::error!(path, error = %e, "<< multipart transport error");
            })?;
        self.handle_response(&Method::POST, path, response).await
    }

    /// Download `url` into a fresh directory under the configured download dir.
    ///
    /// Returns the path of the written file. On any failure the directory is
    /// removed again.
    pub async fn download(
        &self,
        url: &str,
        name: &str,
        mime: &str,
        cookie: Option<&str>,
    ) -> Result<PathBuf> {
        let token = self.token().inspect_err(|_| {
            tracing::error!(url, "API token not set");
        })?;
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| Error::file(name, "invalid file name"))?;
        let url = self.inner.base_url.join(url)?;

        let dir = self
            .inner
            .config
            .download_dir
            .join(uuid::Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir).await.inspect_err(|e| {
            tracing::error!(dir = %dir.display(), error = %e, "Unable to create download folder");
        })?;
        let path = dir.join(file_name);

        tracing::debug!(%url, name, mime, has_cookie = cookie.is_some(), ">> download");

        match self.fetch_to_file(url.clone(), &path, token, mime, cookie).await {
            Ok(bytes) => {
                tracing::debug!(%url, path = %path.display(), bytes, "<< download complete");
                Ok(path)
            }
            Err(e) => {
                tracing::error!(%url, error = %e, "<< download failed");
                if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await {
                    tracing::warn!(dir = %dir.display(), error = %cleanup, "Unable to remove download folder");
                }
                Err(e)
            }
        }
    }

    async fn fetch_to_file(
        &self,
        url: Url,
        path: &Path,
        token: &str,
        mime: &str,
        cookie: Option<&str>,
    ) -> Result<u64> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(mime)
                .map_err(|_| Error::Config(format!("invalid mime type: {}", mime)))?,
        );
        if let Some(cookie) = cookie {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie)
                    .map_err(|_| Error::Config("invalid cookie value".to_string()))?,
            );
        }

        let mut response = self
            .inner
            .download_http
            .get(url)
            .bearer_auth(token)
            .headers(headers)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    /// Map a response onto the accepted-status contract.
    async fn handle_response(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let redirected = *method == Method::GET && status == 302;
        let cookie = if redirected {
            cookie_header(response.headers())
        } else {
            None
        };
        let text = response.text().await?;

        if !SUCCESS_STATUSES.contains(&status) && !redirected {
            tracing::error!(%method, path, status, body = %text, "<<");
            return Err(Error::Status { status, body: text });
        }

        tracing::debug!(%method, path, status, body = %text, "<<");
        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).inspect_err(|e| {
                tracing::error!(%method, path, error = %e, "<< unparseable body");
            })?)
        };

        Ok(ApiResponse {
            status,
            body,
            cookie,
        })
    }
}

/// Collapse `Set-Cookie` headers into a `Cookie` request value.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

/// Check that `path` is a non-empty regular file and return its size.
async fn check_upload_file(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path).await.map_err(|_| {
        tracing::error!(path = %path.display(), "File does not exist");
        Error::file(path, "file does not exist")
    })?;
    if !metadata.is_file() {
        tracing::error!(path = %path.display(), "Not a regular file");
        return Err(Error::file(path, "not a regular file"));
    }
    if metadata.len() == 0 {
        tracing::error!(path = %path.display(), "File is empty");
        return Err(Error::file(path, "file is empty"));
    }
    Ok(metadata.len())
}

/// Builder for creating a [`MessengerClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with built-in defaults and no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded from the environment.
    pub fn from_env() -> Self {
        Self::new().config(ClientConfig::from_env())
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the URL scheme.
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.config.protocol = protocol.into();
        self
    }

    /// Set the API host.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = domain.into();
        self
    }

    /// Set the API version segment.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the TCP port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the parent directory for downloads.
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = dir.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// A missing token is logged but not fatal; each call then fails with
    /// [`Error::MissingToken`] unless the client is re-scoped with
    /// [`MessengerClient::with_token`].
    pub fn build(self) -> Result<MessengerClient> {
        let base_url = self.config.base_url()?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("messenger-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .user_agent(user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let download_http = reqwest::Client::builder().user_agent(user_agent).build()?;

        tracing::debug!(%base_url, has_token = self.config.has_token(), "Configured client");
        if !self.config.has_token() {
            tracing::warn!("No API token is set");
        }

        Ok(MessengerClient {
            inner: Arc::new(ClientInner {
                http,
                download_http,
                base_url,
                config: self.config,
            }),
            token_override: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.alterdesk.com/v1/");
        assert!(matches!(client.token(), Err(Error::MissingToken)));
    }

    #[test]
    fn test_builder_overrides() {
        let client = ClientBuilder::new()
            .protocol("http")
            .domain("localhost")
            .port(8080)
            .version("v2")
            .token("abc")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8080/v2/");
        assert_eq!(client.token().unwrap(), "abc");
    }

    #[test]
    fn test_builder_rejects_bad_domain() {
        let result = ClientBuilder::new().domain("bad host").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_token_override() {
        let client = ClientBuilder::new().token("default").build().unwrap();
        let scoped = client.with_token("other");
        assert_eq!(scoped.token().unwrap(), "other");
        assert_eq!(client.token().unwrap(), "default");

        let empty = client.with_token("");
        assert_eq!(empty.token().unwrap(), "default");
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new().build().unwrap();

        let url = client.url("groupchats/g1/members").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.alterdesk.com/v1/groupchats/g1/members"
        );

        let url = client.url("/users/u1").unwrap();
        assert_eq!(url.as_str(), "https://api.alterdesk.com/v1/users/u1");
    }

    #[test]
    fn test_url_rejects_dot_segments() {
        let client = ClientBuilder::new().build().unwrap();

        for path in ["users/..", "groupchats/.", "aux/users/%2E%2E/providers", "../v2/users"] {
            let err = client.url(path).unwrap_err();
            assert!(matches!(err, Error::InvalidPath(_)), "{path}");
            assert!(err.is_local());
        }

        // Dots inside a segment or the query are fine
        assert!(client.url("users/a.b").is_ok());
        assert!(client.url("conversations/c1/pdf?x=..").is_ok());
    }

    #[test]
    fn test_url_keeps_encoded_query() {
        let client = ClientBuilder::new().build().unwrap();
        let url = client
            .url("conversations/c1/pdf?start_date=2024-01-01T00%3A00%3A00Z%2B00%3A00&headers=false")
            .unwrap();
        assert_eq!(
            url.query(),
            Some("start_date=2024-01-01T00%3A00%3A00Z%2B00%3A00&headers=false")
        );
    }

    #[test]
    fn test_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("session=abc; Path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("cdn=xyz"));
        assert_eq!(cookie_header(&headers).as_deref(), Some("session=abc; cdn=xyz"));
        assert_eq!(cookie_header(&HeaderMap::new()), None);
    }

    #[test]
    fn test_api_response_json() {
        let response = ApiResponse {
            status: 204,
            body: None,
            cookie: None,
        };
        assert!(matches!(response.into_body(), Err(Error::EmptyBody)));
    }
}
