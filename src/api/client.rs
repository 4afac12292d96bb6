use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::query::{QueryParams, build_query};
use crate::config::ApiConfig;
use crate::error::{Result, TicketDeskError};
use crate::i18n::{Locale, MessageKey};
use crate::storage::TokenStorage;

/// Path prefix of every REST endpoint
pub const API_PREFIX: &str = "/api/v1/";

/// Outcome of a single API call
///
/// Non-success statuses do not turn into errors here; callers decide which
/// statuses are failures (some list endpoints treat 404 as "no results").
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: StatusCode,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Converts a failed response into an error carrying the server's message
    pub fn into_result(self, locale: Locale) -> Result<Option<T>> {
        if self.success {
            return Ok(self.data);
        }
        let message = self
            .error
            .unwrap_or_else(|| locale.text(MessageKey::RequestFailed).to_string());
        Err(TicketDeskError::http(self.status, message))
    }

    /// Like [`Self::into_result`] but requires a body
    pub fn into_data(self, locale: Locale) -> Result<T> {
        let status = self.status;
        self.into_result(locale)?.ok_or_else(|| {
            TicketDeskError::custom(format!("Empty response body (HTTP {status})"))
        })
    }
}

/// HTTP client for the ticket-desk REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Option<Arc<dyn TokenStorage>>,
    locale: Locale,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens.as_ref().map(|_| "Arc<dyn TokenStorage>"))
            .field("locale", &self.locale)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, locale: Locale) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(250)))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            base_url,
            http,
            tokens: None,
            locale,
        })
    }

    /// Attach token storage; requests then carry a bearer token when one is stored
    #[must_use]
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenStorage>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn tokens(&self) -> Option<&Arc<dyn TokenStorage>> {
        self.tokens.as_ref()
    }

    /// Absolute URL for an API path such as `tickets/` or `/tickets/1`
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{API_PREFIX}{}",
            self.base_url,
            path.trim().trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path);
        tracing::debug!("{} {}", method, url);
        let mut builder = self
            .http
            .request(method, url)
            .header("x-request-id", format!("req_{}", Uuid::new_v4().simple()));

        if let Some(tokens) = &self.tokens {
            if let Some(token) = tokens.access_token()? {
                builder = builder.bearer_auth(token);
            }
        }
        Ok(builder)
    }

    /// Send a request and split the response into the [`ApiResponse`] envelope
    pub async fn call<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        parse_response(status, &bytes, self.locale)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.call(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<ApiResponse<T>> {
        let path = if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", build_query(query))
        };
        self.call(self.request(Method::GET, &path)?).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(self.request(Method::PATCH, path)?.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.call(self.request(Method::DELETE, path)?).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<ApiResponse<T>> {
        self.call(self.request(Method::POST, path)?.multipart(form))
            .await
    }
}

/// Split a raw HTTP response into the envelope
///
/// Success bodies are decoded into `T` (an empty body yields `None`).
/// Failure bodies are searched for a server-provided message.
pub fn parse_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
    locale: Locale,
) -> Result<ApiResponse<T>> {
    if status.is_success() {
        if is_rejected_envelope(body) {
            let error = server_message(body);
            tracing::debug!("Request rejected with {}: {:?}", status, error);
            return Ok(ApiResponse {
                success: false,
                status,
                data: None,
                error,
            });
        }
        let data = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(body)?)
        };
        return Ok(ApiResponse {
            success: true,
            status,
            data,
            error: None,
        });
    }

    let error = server_message(body).or_else(|| {
        (status == StatusCode::UNAUTHORIZED)
            .then(|| locale.text(MessageKey::Unauthorized).to_string())
    });
    tracing::debug!("Request failed with {}: {:?}", status, error);
    Ok(ApiResponse {
        success: false,
        status,
        data: None,
        error,
    })
}

/// A 2xx body of the form `{"success": false, "error": ...}`
fn is_rejected_envelope(body: &[u8]) -> bool {
    #[derive(serde::Deserialize)]
    struct Envelope {
        success: Option<bool>,
    }

    if body.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{') {
        return false;
    }
    serde_json::from_slice::<Envelope>(body)
        .is_ok_and(|envelope| envelope.success == Some(false))
}

/// Extracts `error`, `message` or `detail` from a JSON error body
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(TicketDeskError::Config("api.base_url is empty".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(TicketDeskError::Config(format!(
            "api.base_url must start with http:// or https://: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}
