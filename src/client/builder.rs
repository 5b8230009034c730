use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::layer::util::Identity;
use tower::{Layer, Service};

use crate::api::WhatsAppContext;
use crate::config::WhatsAppConfig;
use crate::error::WhatsAppError;
use crate::types::{AccessToken, PhoneNumberId, BASE_URL, DEFAULT_API_VERSION};

use super::http_client::{
    MiddlewareExecutor, MiddlewareFuture, WhatsAppHttpClient, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use super::WhatsApp;

#[must_use]
#[derive(Default)]
pub struct WhatsAppBuilder<M = Identity> {
    phone_number_id: Option<PhoneNumberId>,
    access_token: Option<AccessToken>,
    business_account_id: Option<String>,
    version: Option<String>,
    base_url: Option<String>,
    template_ids: HashMap<String, String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for WhatsAppBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppBuilder")
            .field("phone_number_id", &self.phone_number_id)
            .field("business_account_id", &self.business_account_id)
            .field("version", &self.version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> WhatsAppBuilder<M> {
    pub fn phone_number_id(mut self, id: PhoneNumberId) -> Self {
        self.phone_number_id = Some(id);
        self
    }

    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn business_account_id(mut self, id: impl Into<String>) -> Self {
        self.business_account_id = Some(id.into());
        self
    }

    /// Graph API version; an empty string selects the default (`v19.0`).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Graph API host without version segment.
    ///
    /// Default: `<https://graph.facebook.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn template_id(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.template_ids.insert(name.into(), template.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Copy every field of `config` into the builder.
    ///
    /// # Errors
    /// Returns `WhatsAppError::Config` if the phone-number id or access
    /// token is invalid
    pub fn config(mut self, config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let version = config.api_version().to_string();
        self.phone_number_id =
            Some(PhoneNumberId::new(config.phone_number_id).map_err(WhatsAppError::Config)?);
        self.access_token =
            Some(AccessToken::new(config.access_token).map_err(WhatsAppError::Config)?);
        if !config.business_account_id.is_empty() {
            self.business_account_id = Some(config.business_account_id);
        }
        self.version = Some(version);
        self.template_ids.extend(config.template_ids);
        Ok(self)
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> WhatsAppBuilder<M2>
    where
        M2: Layer<WhatsAppHttpClient> + Clone + Send + Sync + 'static,
    {
        WhatsAppBuilder {
            phone_number_id: self.phone_number_id,
            access_token: self.access_token,
            business_account_id: self.business_account_id,
            version: self.version,
            base_url: self.base_url,
            template_ids: self.template_ids,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<WhatsApp, WhatsAppError>
    where
        M: Layer<WhatsAppHttpClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let phone_number_id = self
            .phone_number_id
            .ok_or_else(|| WhatsAppError::Config("phone_number_id is required".to_string()))?;
        let access_token = self
            .access_token
            .ok_or_else(|| WhatsAppError::Config("access_token is required".to_string()))?;

        let host = self.base_url.unwrap_or_else(|| BASE_URL.to_string());
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(WhatsAppError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                host
            )));
        }

        let version = match self.version {
            Some(version) if !version.is_empty() => version,
            _ => DEFAULT_API_VERSION.to_string(),
        };
        let base_url = format!("{}/{}", host.trim_end_matches('/'), version);
        debug!("[WhatsApp] base url formed: {}", base_url);

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let mut client = WhatsAppHttpClient::builder()
            .access_token(access_token)
            .base_url(base_url)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let context = Arc::new(WhatsAppContext::new(Arc::new(client), phone_number_id));

        Ok(WhatsApp::new(
            context,
            version,
            self.business_account_id,
            self.template_ids,
        ))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| -> MiddlewareFuture {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}
