//! Cached CRUD access to one resource type.
//!
//! Reads go through the [`QueryCache`]: a fresh entry is returned without a
//! request, anything else is refetched and stored against the cache version
//! captured before the request went out. Mutations never touch the cache
//! optimistically. Once the backend confirms success, every list and item of
//! the resource type is invalidated so the next read refetches.

use std::marker::PhantomData;
use std::sync::Arc;

use pagination::{ListQuery, Page};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::cache::{CacheKey, CachePrefix, QueryCache};
use crate::domain::ports::{ApiGateway, ApiPath, ApiRequest, SessionExpiry};
use crate::domain::{Failure, Resource, ResourceId};

use super::envelope::SuccessEnvelope;
use super::exchange::{Exchange, encode_body};

/// Result of a read that only runs when its input is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// The input was absent; nothing was requested.
    Disabled,
    /// The query ran and produced a value.
    Ready(T),
}

impl<T> QueryOutcome<T> {
    /// Value when the query ran.
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Disabled => None,
            Self::Ready(value) => Some(value),
        }
    }
}

/// Successful mutation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutated<T> {
    /// Record returned by the backend, when it sent one back.
    pub data: T,
    /// Optional confirmation message from the backend.
    pub message: Option<String>,
}

/// CRUD client for resource type `R`.
pub struct ResourceClient<R> {
    exchange: Exchange,
    cache: Arc<QueryCache>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            exchange: self.exchange.clone(),
            cache: Arc::clone(&self.cache),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Build a client that reports rejected credentials to `expiry`.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        cache: Arc<QueryCache>,
        expiry: Arc<dyn SessionExpiry>,
    ) -> Self {
        Self {
            exchange: Exchange::new(gateway, Some(expiry)),
            cache,
            _resource: PhantomData,
        }
    }

    fn collection() -> ApiPath {
        ApiPath::new(R::KIND.collection_segments().iter().copied())
    }

    fn member(id: &ResourceId) -> ApiPath {
        Self::collection().join(id.to_string())
    }

    fn require_id(id: &ResourceId) -> Result<(), Failure> {
        if id.is_blank() {
            return Err(Failure::NotFound {
                message: format!("{} id is missing", R::KIND),
            });
        }
        Ok(())
    }

    async fn send(&self, request: ApiRequest) -> Result<SuccessEnvelope, Failure> {
        self.exchange.send(request, R::CONFLICT_FIELD).await
    }

    async fn fetch<T>(&self, key: CacheKey, request: ApiRequest) -> Result<T, Failure>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        if let Some(hit) = self.cache.get::<T>(&key).fresh() {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }
        debug!(key = %key, "cache miss");
        let issued = self.cache.version();
        let value: T = self.send(request).await?.data_as()?;
        self.cache.put(key, value.clone(), issued);
        Ok(value)
    }

    async fn mutate(&self, request: ApiRequest) -> Result<SuccessEnvelope, Failure> {
        let envelope = self.send(request).await?;
        self.cache.invalidate(&CachePrefix::resource(R::KIND));
        Ok(envelope)
    }

    /// Record echoed by a confirmed write.
    ///
    /// The write already happened, so a missing or unreadable record is not a
    /// failure.
    fn saved(envelope: SuccessEnvelope) -> Mutated<Option<R>> {
        let data = if envelope.data.is_null() {
            None
        } else {
            envelope
                .data_as()
                .inspect_err(|failure| warn!(kind = %R::KIND, %failure, "saved record unreadable"))
                .ok()
        };
        Mutated {
            data,
            message: envelope.message,
        }
    }

    /// One page of records matching `query`, in server order.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, Failure> {
        let request = ApiRequest::get(Self::collection()).with_query(query.query_pairs());
        self.fetch(CacheKey::list(R::KIND, query), request).await
    }

    /// Fetch one record. Does nothing when `id` is absent or blank.
    pub async fn get_by_id(&self, id: Option<&ResourceId>) -> Result<QueryOutcome<R>, Failure> {
        let Some(id) = ResourceId::present(id) else {
            return Ok(QueryOutcome::Disabled);
        };
        let request = ApiRequest::get(Self::member(id));
        self.fetch(CacheKey::item(R::KIND, id), request)
            .await
            .map(QueryOutcome::Ready)
    }

    /// Create a record.
    pub async fn create(&self, payload: &R::Payload) -> Result<Mutated<Option<R>>, Failure> {
        let request = ApiRequest::post(Self::collection(), encode_body(payload)?);
        self.mutate(request).await.map(Self::saved)
    }

    /// Replace the record `id`.
    pub async fn update(
        &self,
        id: &ResourceId,
        payload: &R::Payload,
    ) -> Result<Mutated<Option<R>>, Failure> {
        Self::require_id(id)?;
        let request = ApiRequest::put(Self::member(id), encode_body(payload)?);
        self.mutate(request).await.map(Self::saved)
    }

    /// Delete the record `id`.
    pub async fn delete(&self, id: &ResourceId) -> Result<Mutated<()>, Failure> {
        Self::require_id(id)?;
        let envelope = self.mutate(ApiRequest::delete(Self::member(id))).await?;
        Ok(Mutated {
            data: (),
            message: envelope.message,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Cache and invalidation behaviour against a mocked gateway.
    use super::*;
    use crate::domain::ports::{
        ApiMethod, ApiResponse, GatewayError, MockApiGateway, MockSessionExpiry, SessionGeneration,
    };
    use crate::domain::{ResourceKind, Role, User, UserPayload};
    use chrono::TimeDelta;
    use mockable::DefaultClock;
    use pagination::PageNumber;
    use rstest::rstest;
    use serde_json::json;

    fn cache() -> Arc<QueryCache> {
        Arc::new(QueryCache::new(
            Arc::new(DefaultClock),
            TimeDelta::seconds(300),
        ))
    }

    fn quiet_expiry() -> Arc<MockSessionExpiry> {
        let mut expiry = MockSessionExpiry::new();
        expiry
            .expect_generation()
            .return_const(SessionGeneration::default());
        expiry.expect_expire().never();
        Arc::new(expiry)
    }

    fn users(gateway: MockApiGateway, cache: Arc<QueryCache>) -> ResourceClient<User> {
        ResourceClient::new(Arc::new(gateway), cache, quiet_expiry())
    }

    fn user_body(id: u64, name: &str) -> serde_json::Value {
        json!({ "id": id, "name": name, "email": format!("{}@example.com", name.to_lowercase()) })
    }

    #[rstest]
    #[tokio::test]
    async fn list_sends_search_and_page_and_caches_the_result() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| {
                request.method == ApiMethod::Get
                    && request.path.to_string() == "/api/users"
                    && request.query
                        == vec![
                            ("search".to_owned(), "ada".to_owned()),
                            ("page".to_owned(), "2".to_owned()),
                        ]
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(
                    200,
                    &json!({ "data": [user_body(2, "Bob"), user_body(1, "Ada")] }),
                ))
            });
        let client = users(gateway, cache());
        let query = ListQuery::new("ada", PageNumber::new(2).expect("page"));

        let first = client.list(&query).await.expect("list succeeds");
        let second = client.list(&query).await.expect("cached list");

        let names: Vec<_> = first.items().iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Ada"]);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(ResourceId::Numeric(0)))]
    #[case(Some(ResourceId::Opaque("  ".to_owned())))]
    #[tokio::test]
    async fn get_by_id_without_an_id_is_disabled(#[case] id: Option<ResourceId>) {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let client = users(gateway, cache());

        let outcome = client.get_by_id(id.as_ref()).await.expect("disabled read");

        assert_eq!(outcome, QueryOutcome::Disabled);
    }

    #[rstest]
    #[tokio::test]
    async fn create_invalidates_cached_lists() {
        let mut gateway = MockApiGateway::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Get)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::json(200, &json!({ "data": [] }))));
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Post)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(ApiResponse::json(
                    201,
                    &json!({ "data": user_body(5, "Eve"), "message": "User created" }),
                ))
            });
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Get)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::json(200, &json!({ "data": [user_body(5, "Eve")] }))));
        let client = users(gateway, cache());
        let query = ListQuery::default();

        assert!(client.list(&query).await.expect("first list").is_empty());
        let created = client
            .create(&UserPayload::new("Eve", "eve@example.com").with_password("secret"))
            .await
            .expect("create succeeds");
        let refreshed = client.list(&query).await.expect("refetched list");

        assert_eq!(created.message.as_deref(), Some("User created"));
        assert_eq!(refreshed.len(), 1);
    }

    #[rstest]
    #[case(json!({ "message": "User updated" }))]
    #[case(json!({ "data": null, "message": "User updated" }))]
    #[case(json!({ "data": { "unexpected": true }, "message": "User updated" }))]
    #[tokio::test]
    async fn confirmed_updates_without_a_record_still_succeed(#[case] body: serde_json::Value) {
        let shared = cache();
        let mut gateway = MockApiGateway::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Get)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::json(200, &json!({ "data": user_body(1, "Ada") }))));
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Put)
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(ApiResponse::json(200, &body)));
        let client = users(gateway, Arc::clone(&shared));
        let id = ResourceId::Numeric(1);

        client.get_by_id(Some(&id)).await.expect("initial read");
        let updated = client
            .update(&id, &UserPayload::new("Augusta", "ada@example.com"))
            .await
            .expect("confirmed write");

        assert_eq!(updated.data, None);
        assert_eq!(updated.message.as_deref(), Some("User updated"));
        assert!(
            shared
                .get::<User>(&CacheKey::item(ResourceKind::Users, &id))
                .fresh()
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn get_by_id_after_update_refetches() {
        let mut gateway = MockApiGateway::new();
        let mut seq = mockall::Sequence::new();
        for name in ["Ada", "Augusta", "Augusta"] {
            let body = user_body(1, name);
            gateway
                .expect_send()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(ApiResponse::json(200, &json!({ "data": body.clone() }))));
        }
        let client = users(gateway, cache());
        let id = ResourceId::Numeric(1);

        let before = client.get_by_id(Some(&id)).await.expect("initial read");
        client
            .update(&id, &UserPayload::new("Augusta", "ada@example.com"))
            .await
            .expect("update succeeds");
        let after = client.get_by_id(Some(&id)).await.expect("refetched read");

        assert_eq!(before.ready().map(|user| user.name), Some("Ada".to_owned()));
        assert_eq!(after.ready().map(|user| user.name), Some("Augusta".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_mutation_leaves_the_cache_untouched() {
        let shared = cache();
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Get)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(200, &json!({ "data": [] }))));
        gateway
            .expect_send()
            .withf(|request| request.method == ApiMethod::Post)
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(
                    409,
                    &json!({ "message": "Email already exists" }),
                ))
            });
        let client = users(gateway, Arc::clone(&shared));

        client.list(&ListQuery::default()).await.expect("list");
        let failure = client
            .create(&UserPayload::new("Ada", "ada@example.com"))
            .await
            .expect_err("conflict");
        client.list(&ListQuery::default()).await.expect("still cached");

        let fields = failure.field_errors().expect("conflict fields");
        assert_eq!(fields.first("email"), Some("Email already exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn role_conflicts_are_attributed_to_the_name_field() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .returning(|_| Ok(ApiResponse::json(409, &json!({ "message": "Role exists" }))));
        let client: ResourceClient<Role> =
            ResourceClient::new(Arc::new(gateway), cache(), quiet_expiry());
        let payload = crate::domain::RolePayload {
            name: "admin".to_owned(),
            display_name: "Administrator".to_owned(),
            description: None,
            status: true,
        };

        let failure = client.create(&payload).await.expect_err("conflict");

        assert_eq!(
            failure.field_errors().and_then(|fields| fields.first("name")),
            Some("Role exists")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unauthorised_reads_expire_the_session_they_were_issued_under() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .returning(|_| Ok(ApiResponse::json(401, &json!({ "message": "Unauthenticated." }))));
        let issued = SessionGeneration::default().next();
        let mut expiry = MockSessionExpiry::new();
        expiry.expect_generation().times(1).return_const(issued);
        expiry
            .expect_expire()
            .withf(move |generation| *generation == issued)
            .times(1)
            .return_const(());
        let client: ResourceClient<User> =
            ResourceClient::new(Arc::new(gateway), cache(), Arc::new(expiry));

        let failure = client.list(&ListQuery::default()).await.expect_err("401");

        assert!(failure.is_auth());
    }

    #[rstest]
    #[tokio::test]
    async fn transport_errors_are_generic_failures() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_send()
            .returning(|_| Err(GatewayError::transport("connection refused")));
        let client = users(gateway, cache());

        let failure = client
            .delete(&ResourceId::Numeric(3))
            .await
            .expect_err("no response");

        assert!(failure.is_generic());
        assert!(failure.field_errors().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_with_a_blank_id_is_rejected_locally() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_send().never();
        let client = users(gateway, cache());

        let failure = client
            .delete(&ResourceId::Opaque(String::new()))
            .await
            .expect_err("blank id");

        assert!(matches!(failure, Failure::NotFound { .. }));
    }
}
