//! Reqwest-backed API gateway.
//!
//! This adapter owns transport details only: URL construction below the
//! configured base address, bearer credential attachment, trace ids, the
//! request timeout, and mapping transport errors. Every HTTP response,
//! including error statuses, is handed back untouched.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use tracing::{Instrument, debug, field, info_span};
use uuid::Uuid;

use crate::domain::ports::{
    ApiGateway, ApiMethod, ApiRequest, ApiResponse, CredentialStore, GatewayError,
};

/// Header carrying the per-request trace id.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// [`ApiGateway`] sending requests with reqwest.
pub struct ReqwestGateway {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl ReqwestGateway {
    /// Build a gateway for `base_url` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Base address every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ApiGateway for ReqwestGateway {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let trace_id = Uuid::new_v4();
        let span = info_span!(
            "api_request",
            method = %request.method,
            path = %request.path,
            %trace_id,
            status = field::Empty,
        );
        async {
            let url = build_url(&self.base_url, &request)?;
            let credential = self
                .credentials
                .read()
                .map_err(|error| GatewayError::credentials(error.to_string()))?;

            let mut builder = self
                .client
                .request(map_method(request.method), url)
                .header(reqwest::header::ACCEPT, "application/json")
                .header(TRACE_ID_HEADER, trace_id.to_string());
            if let Some(credential) = &credential {
                builder = builder.bearer_auth(credential.token.expose());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(map_transport_error)?;
            let status = response.status().as_u16();
            tracing::Span::current().record("status", status);
            let body = response.bytes().await.map_err(map_transport_error)?;
            debug!(status, bytes = body.len(), "response received");
            Ok::<_, GatewayError>(ApiResponse::new(status, body.to_vec()))
        }
        .instrument(span)
        .await
    }
}

fn map_method(method: ApiMethod) -> Method {
    match method {
        ApiMethod::Get => Method::GET,
        ApiMethod::Post => Method::POST,
        ApiMethod::Put => Method::PUT,
        ApiMethod::Delete => Method::DELETE,
    }
}

fn build_url(base: &Url, request: &ApiRequest) -> Result<Url, GatewayError> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            GatewayError::invalid_request(format!("base address {base} cannot carry a path"))
        })?;
        segments
            .pop_if_empty()
            .extend(request.path.segments().iter().map(String::as_str));
    }
    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&request.query);
    }
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}
