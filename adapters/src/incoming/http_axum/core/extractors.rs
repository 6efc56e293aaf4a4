use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, request::Parts},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::incoming::http_axum::error_mapper::HttpError;
use cake_api_application::error::AppError;
use domain::auth::{Executor, Role};

pub const EXECUTOR_EMAIL_HEADER: &str = "X-Executor-Email";
pub const EXECUTOR_ROLE_HEADER: &str = "X-Executor-Role";

/// Executor identity forwarded by the upstream authentication gateway.
#[derive(Debug, Clone)]
pub struct AuthenticatedExecutor(pub Executor);

impl AuthenticatedExecutor {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, HttpError> {
        let email = header_str(headers, EXECUTOR_EMAIL_HEADER)?;
        let role = header_str(headers, EXECUTOR_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|e| {
                debug!("Rejected executor role header: {}", e);
                HttpError(AppError::Unauthorized)
            })?;

        Ok(Self(Executor::new(email, role)))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, HttpError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(HttpError(AppError::Unauthorized))
}

impl<S> FromRequestParts<S> for AuthenticatedExecutor
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// JSON request body decoded regardless of the declared content type. Any
/// failure to read or decode is reported as a validation error.
#[derive(Debug, Clone)]
pub struct JsonParams<T>(pub T);

impl<T, S> FromRequest<S> for JsonParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| {
                debug!("Failed to read request body: {}", e);
                could_not_read_params()
            })?;

        let value = serde_json::from_slice(&body).map_err(|e| {
            debug!("Failed to decode request body: {}", e);
            could_not_read_params()
        })?;

        Ok(Self(value))
    }
}

/// Query string decoded into `T`, with decode failures reported like body
/// failures.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!("Failed to decode query string: {}", e);
                could_not_read_params()
            })?;

        Ok(Self(value))
    }
}

fn could_not_read_params() -> HttpError {
    HttpError(AppError::ValidationError {
        message: "could not read params".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct EmailQuery {
        email: String,
    }

    async fn query_params(uri: &str) -> Result<QueryParams<EmailQuery>, HttpError> {
        let (mut parts, ()) = HttpRequest::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<EmailQuery>::from_request_parts(&mut parts, &()).await
    }

    fn headers(email: Option<&'static str>, role: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(email) = email {
            headers.insert(EXECUTOR_EMAIL_HEADER, HeaderValue::from_static(email));
        }
        if let Some(role) = role {
            headers.insert(EXECUTOR_ROLE_HEADER, HeaderValue::from_static(role));
        }
        headers
    }

    #[test]
    fn reads_executor_from_headers() {
        let executor =
            AuthenticatedExecutor::from_headers(&headers(Some("root@x.com"), Some("superadmin")))
                .ok()
                .map(|e| e.0);

        assert_eq!(executor, Some(Executor::new("root@x.com", Role::SuperAdmin)));
    }

    #[test]
    fn missing_email_is_unauthorized() {
        let result = AuthenticatedExecutor::from_headers(&headers(None, Some("admin")));
        assert!(matches!(result, Err(HttpError(AppError::Unauthorized))));
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let result = AuthenticatedExecutor::from_headers(&headers(Some("a@x.com"), Some("owner")));
        assert!(matches!(result, Err(HttpError(AppError::Unauthorized))));
    }

    #[tokio::test]
    async fn decodes_query_params() {
        let params = query_params("/admin/inspect?email=a@x.com").await.ok().map(|q| q.0.email);
        assert_eq!(params.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn duplicate_query_field_is_a_validation_error() {
        let result = query_params("/admin/inspect?email=a@x.com&email=b@x.com").await;

        let Err(HttpError(error)) = result else {
            panic!("duplicate query field must be rejected");
        };
        assert!(matches!(
            error,
            AppError::ValidationError { ref message } if message == "could not read params"
        ));
    }
}
