//! Request/response exchange shared by resource and auth clients.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Failure;
use crate::domain::ports::{ApiGateway, ApiRequest, SessionExpiry};

use super::classify::{classify_gateway_error, classify_response};
use super::envelope::SuccessEnvelope;

/// Sends one request and returns the success envelope or a classified
/// failure. When an expiry receiver is present, `Auth` failures end the
/// session they were issued under before they are returned.
#[derive(Clone)]
pub(crate) struct Exchange {
    gateway: Arc<dyn ApiGateway>,
    expiry: Option<Arc<dyn SessionExpiry>>,
}

impl Exchange {
    pub(crate) fn new(gateway: Arc<dyn ApiGateway>, expiry: Option<Arc<dyn SessionExpiry>>) -> Self {
        Self { gateway, expiry }
    }

    pub(crate) async fn send(
        &self,
        request: ApiRequest,
        conflict_field: &str,
    ) -> Result<SuccessEnvelope, Failure> {
        let method = request.method;
        let path = request.path.to_string();
        let issued = self.expiry.as_ref().map(|expiry| expiry.generation());
        let response = self.gateway.send(request).await.map_err(|error| {
            debug!(%method, %path, %error, "request produced no response");
            classify_gateway_error(&error)
        })?;

        if response.is_success() {
            return SuccessEnvelope::decode(&response.body);
        }

        let failure = classify_response(&response, conflict_field);
        debug!(%method, %path, status = response.status, ?failure, "request failed");
        if failure.is_auth() {
            if let (Some(expiry), Some(issued)) = (&self.expiry, issued) {
                warn!(%method, %path, %issued, "credential rejected; ending session");
                expiry.expire(issued);
            }
        }
        Err(failure)
    }
}

/// Encode a request body.
pub(crate) fn encode_body<T: Serialize + ?Sized>(body: &T) -> Result<Value, Failure> {
    serde_json::to_value(body)
        .map_err(|error| Failure::transport(format!("request body could not be encoded: {error}")))
}
