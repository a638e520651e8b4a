//! Login and registration endpoints.
//!
//! These calls run without a session, so a `401` here is a rejected login
//! rather than an expired credential and never reaches [`SessionExpiry`].
//!
//! [`SessionExpiry`]: crate::domain::ports::SessionExpiry

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{ApiGateway, ApiPath, ApiRequest};
use crate::domain::{EMAIL_FIELD, Failure, LoginCredentials, LoginSuccess, RegistrationRequest};

use super::exchange::Exchange;
use super::resources::Mutated;

/// Client for `POST /api/login` and `POST /api/register`.
#[derive(Clone)]
pub struct AuthApi {
    exchange: Exchange,
}

impl AuthApi {
    /// Build the client.
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            exchange: Exchange::new(gateway, None),
        }
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSuccess, Failure> {
        let request = ApiRequest::post(ApiPath::new(["api", "login"]), credentials.to_wire());
        let success: LoginSuccess = self.exchange.send(request, EMAIL_FIELD).await?.data_as()?;
        if success.token.is_blank() {
            return Err(Failure::unexpected_shape("login response carried an empty token"));
        }
        info!(
            user_id = %success.user.id,
            token = %success.token.fingerprint(),
            "login accepted"
        );
        Ok(success)
    }

    /// Create an account. The new user still has to log in.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Mutated<()>, Failure> {
        let request = ApiRequest::post(ApiPath::new(["api", "register"]), request.to_wire());
        let envelope = self.exchange.send(request, EMAIL_FIELD).await?;
        Ok(Mutated {
            data: (),
            message: envelope.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceId;
    use crate::domain::ports::{ApiResponse, MockApiGateway};
    use rstest::rstest;
    use serde_json::json;

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "secret").expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn login_decodes_token_and_profile() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.path.to_string() == "/api/login"
                    && request.body
                        == Some(json!({ "email": "ada@example.com", "password": "secret" }))
            })
            .returning(|_| {
                Ok(ApiResponse::json(
                    200,
                    &json!({
                        "data": {
                            "token": "tok-1",
                            "user": { "id": 1, "name": "Ada", "email": "ada@example.com" }
                        }
                    }),
                ))
            });
        let api = AuthApi::new(Arc::new(gateway));

        let success = api.login(&credentials()).await.expect("login succeeds");

        assert_eq!(success.token.expose(), "tok-1");
        assert_eq!(success.user.id, ResourceId::Numeric(1));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_login_is_an_auth_failure() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(ApiResponse::json(
                401,
                &json!({ "message": "Invalid credentials" }),
            ))
        });
        let api = AuthApi::new(Arc::new(gateway));

        let failure = api.login(&credentials()).await.expect_err("401");

        assert_eq!(
            failure,
            Failure::Auth {
                message: "Invalid credentials".to_owned(),
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn blank_token_is_an_unexpected_shape() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(ApiResponse::json(
                200,
                &json!({ "data": { "token": "", "user": { "id": 1, "name": "A", "email": "a@b.c" } } }),
            ))
        });
        let api = AuthApi::new(Arc::new(gateway));

        let failure = api.login(&credentials()).await.expect_err("blank token");

        assert!(failure.is_generic());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_registration_is_attributed_to_email() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(ApiResponse::json(
                409,
                &json!({ "message": "Email already exists" }),
            ))
        });
        let api = AuthApi::new(Arc::new(gateway));
        let request = RegistrationRequest::try_from_parts("Ada", "ada@example.com", "secret")
            .expect("valid registration");

        let failure = api.register(&request).await.expect_err("conflict");

        assert_eq!(
            failure.field_errors().and_then(|fields| fields.first(EMAIL_FIELD)),
            Some("Email already exists")
        );
    }
}
