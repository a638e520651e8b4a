//! Driven ports the domain depends on, and the request types crossing them.

mod macros;
pub(crate) use macros::define_port_error;

mod api_gateway;
mod credential_store;
mod navigator;
mod session_expiry;

#[cfg(test)]
pub use api_gateway::MockApiGateway;
pub use api_gateway::{ApiGateway, ApiMethod, ApiPath, ApiRequest, ApiResponse, GatewayError};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError, TOKEN_KEY, USER_KEY};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use session_expiry::MockSessionExpiry;
pub use session_expiry::{SessionExpiry, SessionGeneration};
