use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use http::header::HeaderMap;
use log::{debug, info};
use reqwest::{Request, Response};
use tower::{Layer, Service};

/// Logs method, URL, status and latency of every request.
///
/// In verbose mode request headers are logged too, with credentials
/// replaced by `[REDACTED]`.
#[derive(Clone)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

const SENSITIVE_FIELDS: &[&str] = &["access_token", "token", "authorization", "appsecret_proof"];

impl<S> LoggingMiddlewareService<S> {
    fn is_sensitive(name: &str) -> bool {
        SENSITIVE_FIELDS.iter().any(|s| name.eq_ignore_ascii_case(s))
    }

    fn redact_url(url: &str) -> String {
        let Some((base, query)) = url.split_once('?') else {
            return url.to_string();
        };
        let redacted_query = query
            .split('&')
            .map(|param| match param.split_once('=') {
                Some((key, _)) if Self::is_sensitive(key) => format!("{}=[REDACTED]", key),
                _ => param.to_string(),
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base, redacted_query)
    }

    fn redact_headers(headers: &HeaderMap) -> String {
        headers
            .iter()
            .map(|(name, value)| {
                if Self::is_sensitive(name.as_str()) || value.is_sensitive() {
                    format!("{}: [REDACTED]", name)
                } else {
                    format!("{}: {}", name, value.to_str().unwrap_or("<binary>"))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn log_request(method: &str, url: &str, headers: &HeaderMap, verbose: bool) {
        let safe_url = Self::redact_url(url);
        if verbose {
            debug!(
                "[WhatsApp] >>> {} {} [{}]",
                method,
                safe_url,
                Self::redact_headers(headers)
            );
        } else {
            info!("[WhatsApp] {} {}", method, safe_url);
        }
    }

    fn log_response(status: reqwest::StatusCode, duration: std::time::Duration, verbose: bool) {
        if verbose {
            debug!(
                "[WhatsApp] <<< {} - {} ({:?})",
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                duration
            );
        } else {
            info!("[WhatsApp] {} ({:?})", status.as_u16(), duration);
        }
    }
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().as_str().to_string();
        let url = req.url().to_string();
        let verbose = self.verbose;
        Self::log_request(&method, &url, req.headers(), verbose);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let start = Instant::now();
            let response = inner.call(req).await?;
            let duration = start.elapsed();

            Self::log_response(response.status(), duration, verbose);

            Ok(response)
        })
    }
}
