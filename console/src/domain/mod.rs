//! Domain types, services, and ports.
//!
//! Purpose: hold everything the console decides on its own, independent of
//! how requests are transported or credentials are stored. Adapters in
//! `inbound` and `outbound` depend on this module, never the reverse.
//!
//! Public surface:
//! - Auth primitives (`LoginCredentials`, `AuthToken`, `Credential`, ...).
//! - Resource records (`User`, `Role`) and their payloads.
//! - `Failure` and `FieldErrorSet`, the normalised failure taxonomy.
//! - `QueryCache`, `ResourceClient`, and `AuthApi` (the query layer).
//! - `SessionController` and `SessionState`.
//! - `routing::guard` and the console paths.

mod auth;
pub mod cache;
mod error;
mod field_errors;
pub mod ports;
pub mod query;
mod resource;
mod role;
pub mod routing;
mod session;
mod user;

pub use self::auth::{
    AuthToken, Credential, CredentialsValidationError, EMAIL_FIELD, LoginCredentials,
    LoginSuccess, NAME_FIELD, PASSWORD_FIELD, RegistrationRequest, UserProfile,
};
pub use self::cache::QueryCache;
pub use self::error::{FALLBACK_MESSAGE, Failure, VALIDATION_TITLE};
pub use self::field_errors::FieldErrorSet;
pub use self::query::{AuthApi, Mutated, QueryOutcome, ResourceClient};
pub use self::resource::{Resource, ResourceId, ResourceKind};
pub use self::role::{Role, RolePayload};
pub use self::session::{SessionController, SessionError, SessionState};
pub use self::user::{User, UserPayload};
