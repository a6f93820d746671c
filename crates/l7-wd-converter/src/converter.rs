use std::sync::Arc;

use axum::http::Method;
use serde_json::Value;
use tracing::{debug, warn, Instrument};

use crate::dialect::{Dialect, DialectState};
use crate::errors::ConverterResult;
use crate::policy::ConverterPolicy;
use crate::remap;
use crate::rules;
use crate::timeouts::{self, TimeoutPlan};
use crate::trace::ConverterTracer;
use crate::transport::{ProxyResponse, ProxyTransport};

pub const TIMEOUTS: &str = "timeouts";
pub const SET_WINDOW: &str = "setWindow";
pub const SET_VALUE: &str = "setValue";

/// Reshapes requests for a downstream peer whose dialect may differ from the
/// caller's, then hands them to the injected transport.
///
/// One converter serves one downstream session.
pub struct ProtocolConverter {
    transport: Arc<dyn ProxyTransport>,
    dialect: DialectState,
    policy: ConverterPolicy,
    tracer: ConverterTracer,
}

impl ProtocolConverter {
    pub fn new(transport: Arc<dyn ProxyTransport>) -> Self {
        let policy = ConverterPolicy::default();
        Self {
            transport,
            dialect: DialectState::new(policy.dialect),
            policy,
            tracer: ConverterTracer,
        }
    }

    pub fn with_policy(mut self, policy: ConverterPolicy) -> Self {
        self.dialect.set(policy.dialect);
        self.policy = policy;
        self
    }

    pub fn with_tracer(mut self, tracer: ConverterTracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect.get()
    }

    pub fn set_dialect(&self, dialect: Dialect) {
        self.dialect.set(dialect);
    }

    fn active_dialect(&self) -> Dialect {
        if self.policy.enabled {
            self.dialect.get()
        } else {
            Dialect::Unset
        }
    }

    /// Forwards `command` to the downstream peer, rewriting URL or body when
    /// the active dialect needs a different shape.
    ///
    /// Transport errors are returned as-is.
    pub async fn dispatch(
        &self,
        command: &str,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        let dialect = self.active_dialect();
        let span = self.tracer.span(command, dialect);
        async move {
            if !dialect.is_set() {
                return self.forward(url, method, body).await;
            }
            match command {
                TIMEOUTS => self.proxy_set_timeouts(url, method, body).await,
                SET_WINDOW => self.proxy_set_window(url, method, body).await,
                SET_VALUE => self.proxy_set_value(url, method, body).await,
                _ => self.proxy_rewritten(command, url, method, body, dialect).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn forward(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        self.transport.proxy(url, method, body).await
    }

    async fn proxy_rewritten(
        &self,
        command: &str,
        url: &str,
        method: &Method,
        body: Option<Value>,
        dialect: Dialect,
    ) -> ConverterResult<ProxyResponse> {
        if let Some(rule) = rules::lookup(command) {
            match rule.rewrite(url, dialect) {
                Some(rewritten) => {
                    debug!(from = url, to = %rewritten, "rewrote url for downstream dialect");
                    return self.transport.proxy(&rewritten, method, body).await;
                }
                None => debug!(url, "url already fits downstream dialect"),
            }
        }
        self.forward(url, method, body).await
    }

    /// Sends a timeout update, split per kind for legacy peers.
    ///
    /// Sub-calls run strictly in order. A legacy peer rejecting one kind stops
    /// the sequence; kinds applied before it stay applied.
    async fn proxy_set_timeouts(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        let parsed = match &body {
            Some(Value::String(raw)) => {
                serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
            Some(value) => value.clone(),
            None => Value::Null,
        };
        let requests = match timeouts::plan(&parsed, self.active_dialect()) {
            TimeoutPlan::Forward => return self.forward(url, method, body).await,
            TimeoutPlan::Sequence(requests) => requests,
        };
        let Some((last, leading)) = requests.split_last() else {
            debug!("no numeric timeouts in body; forwarding as received");
            return self.forward(url, method, body).await;
        };

        debug!(count = requests.len(), "sending timeout update");
        for request in leading {
            let response = self
                .transport
                .proxy(url, method, Some(request.clone()))
                .await?;
            if self.active_dialect() != Dialect::Legacy {
                return Ok(response);
            }
            if response.is_failure() {
                warn!(
                    status = %response.status,
                    request = %request,
                    "timeout update rejected; skipping remaining kinds"
                );
                return Ok(response);
            }
        }
        self.transport.proxy(url, method, Some(last.clone())).await
    }

    async fn proxy_set_window(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        match remap::window_target(body.as_ref(), self.active_dialect()) {
            Some(remapped) => {
                debug!(body = %remapped, "remapped window target");
                self.transport.proxy(url, method, Some(remapped)).await
            }
            None => self.forward(url, method, body).await,
        }
    }

    async fn proxy_set_value(
        &self,
        url: &str,
        method: &Method,
        body: Option<Value>,
    ) -> ConverterResult<ProxyResponse> {
        match remap::element_value(body.as_ref()) {
            Some(completed) => {
                debug!("completed element value body");
                self.transport.proxy(url, method, Some(completed)).await
            }
            None => self.forward(url, method, body).await,
        }
    }
}
