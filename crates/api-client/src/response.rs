//! Response classification
//!
//! [`classify`] turns an [`HttpResponse`] into an [`Outcome`]:
//!
//! | Status | Outcome | Log |
//! |--------|---------|-----|
//! | expected | `Success(transform(body))` | none |
//! | 400, 401, 403, 404, 429, 500 | `Failed` with a [`FailureCategory`] | `error`, body at `debug` |
//! | anything else | `Failed` without category | `warn`, body at `debug` |
//!
//! Remote failures are data, not errors. The only `Err` coming out of here
//! is a success body the transform cannot read.

use crate::error::{ApiError, ApiResult};
use crate::http::HttpResponse;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, warn};

/// Known failure statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    TooManyRequests,
    /// 500
    ServerError,
}

impl FailureCategory {
    /// Category for `status`, if it is one of the known failure codes
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            429 => Some(Self::TooManyRequests),
            500 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Message logged for this category
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request - probably a validation error",
            Self::Unauthorized => "Unauthorised - check your API key",
            Self::Forbidden => "Permission denied",
            Self::NotFound => "Not found",
            Self::TooManyRequests => "Too many requests made",
            Self::ServerError => "Server error",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A response whose status was not the expected one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedResponse {
    /// HTTP status code
    pub status: u16,
    /// Category for well-known failure codes
    pub category: Option<FailureCategory>,
    /// The raw response, kept for inspection
    pub response: HttpResponse,
}

impl FailedResponse {
    /// Body parsed as JSON, when it is JSON
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        self.response.json().ok()
    }

    /// Body as text
    #[must_use]
    pub fn text(&self) -> String {
        self.response.text()
    }
}

/// Result of one exchange with the API
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Expected status; the transformed payload
    Success(T),
    /// Any other status
    Failed(FailedResponse),
}

impl<T> Outcome<T> {
    /// Check for success
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the success payload
    #[must_use]
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Take the success payload
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Borrow the failed response
    #[must_use]
    pub fn failure(&self) -> Option<&FailedResponse> {
        match self {
            Self::Success(_) => None,
            Self::Failed(failed) => Some(failed),
        }
    }

    /// Map the success payload
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failed(failed) => Outcome::Failed(failed),
        }
    }
}

/// Maps a successful response to the caller-facing payload
pub trait SuccessTransform {
    /// Payload produced on success
    type Output;

    /// Read the payload out of a response that had the expected status
    fn transform(&self, response: HttpResponse) -> ApiResult<Self::Output>;
}

/// Full JSON body of a successful response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonPayload {
    /// Decoded body
    pub response: Value,
}

/// Search response plus the first matching compound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPayload {
    /// Id of the first match
    pub compound_id: String,
    /// Decoded body
    pub response: Value,
}

/// Binary file returned by an export endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// `Content-Type` header, if sent
    pub content_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// Returns `{ response }`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOnSuccess;

impl SuccessTransform for DefaultOnSuccess {
    type Output = JsonPayload;

    fn transform(&self, response: HttpResponse) -> ApiResult<JsonPayload> {
        Ok(JsonPayload {
            response: response.json()?,
        })
    }
}

/// Returns `{ compound_id, response }` from the first search result
///
/// The id is read from `results[0].compound.idx` (Ultimate searches) or
/// `results[0].mcule_id` (standard exact search). An empty or unexpected
/// result list is a [`ApiError::MalformedPayload`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResultOnSuccess;

impl SuccessTransform for SearchResultOnSuccess {
    type Output = SearchPayload;

    fn transform(&self, response: HttpResponse) -> ApiResult<SearchPayload> {
        let response: Value = response.json()?;
        let first = response
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::malformed("search response has no `results` list"))?
            .first()
            .ok_or_else(|| ApiError::malformed("search returned no results"))?;

        let compound_id = first
            .pointer("/compound/idx")
            .or_else(|| first.get("mcule_id"))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::malformed("first search result has no compound id"))?
            .to_string();

        Ok(SearchPayload {
            compound_id,
            response,
        })
    }
}

/// Returns the raw body and its content type
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOnSuccess;

impl SuccessTransform for FileOnSuccess {
    type Output = FilePayload;

    fn transform(&self, response: HttpResponse) -> ApiResult<FilePayload> {
        Ok(FilePayload {
            content_type: response.header("content-type").map(str::to_string),
            bytes: response.body,
        })
    }
}

/// Classify `response` against `expected_status`
pub fn classify<T: SuccessTransform>(
    response: HttpResponse,
    expected_status: u16,
    transform: &T,
) -> ApiResult<Outcome<T::Output>> {
    let status = response.status;

    if status == expected_status {
        return transform.transform(response).map(Outcome::Success);
    }

    let category = FailureCategory::from_status(status);
    match category {
        Some(category) => error!(status, category = %category, "{}", category.description()),
        None => warn!(status, expected = expected_status, "Unexpected response status"),
    }
    debug!(status, body = %response.text(), "Response body");

    Ok(Outcome::Failed(FailedResponse {
        status,
        category,
        response,
    }))
}
