use std::future::Future;

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::errors::{ConverterError, ConverterResult};

/// What the downstream peer answered.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ProxyResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status.as_u16() >= 400
    }
}

/// Sends one request to the downstream peer.
///
/// `body` is `None` for a null body, `Value::String` for raw JSON text, or an
/// already structured value.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn proxy(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse>;
}

pub struct NoopTransport;

#[async_trait]
impl ProxyTransport for NoopTransport {
    async fn proxy(
        &self,
        _url: &str,
        _method: &Method,
        _body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        Err(ConverterError::NotImplemented)
    }
}

/// Wraps an async closure `(url, method, body) -> ProxyResponse`.
pub struct FnTransport<F> {
    inner: F,
}

impl<F> FnTransport<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F, Fut> ProxyTransport for FnTransport<F>
where
    F: Fn(String, Method, Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = ConverterResult<ProxyResponse>> + Send + 'static,
{
    async fn proxy(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        (self.inner)(url.to_string(), method.clone(), body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn noop_transport_is_not_implemented() {
        let err = NoopTransport
            .proxy("/status", &Method::GET, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_implemented");
    }

    #[tokio::test]
    async fn closure_receives_the_request() {
        let transport = FnTransport::new(|url: String, method: Method, body: Option<Value>| async move {
            Ok::<_, ConverterError>(ProxyResponse::new(
                StatusCode::OK,
                json!({ "url": url, "method": method.as_str(), "body": body }),
            ))
        });
        let response = transport
            .proxy("/session/1/url", &Method::POST, Some(json!({ "url": "about:blank" })))
            .await
            .unwrap();
        assert_eq!(response.body["url"], "/session/1/url");
        assert_eq!(response.body["method"], "POST");
        assert_eq!(response.body["body"]["url"], "about:blank");
        assert!(!response.is_failure());
    }

    #[test]
    fn failure_threshold_is_400() {
        assert!(!ProxyResponse::new(StatusCode::PERMANENT_REDIRECT, Value::Null).is_failure());
        assert!(ProxyResponse::new(StatusCode::BAD_REQUEST, Value::Null).is_failure());
        assert!(ProxyResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Value::Null).is_failure());
    }
}
