//! In-process stand-in for the admin backend.
//!
//! Serves the REST surface the console talks to over a real socket, backed by
//! in-memory users and roles. Tests hold the shared [`StubState`] to seed
//! records, revoke the issued token, and count requests.

use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde::Deserialize;
use serde_json::{Value, json};

/// Token issued by a successful login.
pub const ISSUED_TOKEN: &str = "stub-token";
/// Password accepted for every seeded account.
pub const PASSWORD: &str = "secret";
/// Email of the seeded administrator.
pub const ADMIN_EMAIL: &str = "ada@example.com";

/// User record held by the stub.
#[derive(Debug, Clone)]
pub struct StubUser {
    /// Id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role id.
    pub role_id: Option<u64>,
}

impl StubUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "role_id": self.role_id,
            "status": "active",
        })
    }
}

/// Mutable backend state.
#[derive(Debug)]
pub struct StubState {
    /// Stored users in id order.
    pub users: Vec<StubUser>,
    /// Whether the issued token is still accepted.
    pub token_valid: bool,
    /// Number of `GET /api/users` requests served.
    pub user_list_requests: usize,
    /// Trace ids seen on incoming requests.
    pub trace_ids: Vec<String>,
    next_id: u64,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            users: vec![StubUser {
                id: 1,
                name: "Ada Lovelace".to_owned(),
                email: ADMIN_EMAIL.to_owned(),
                role_id: Some(1),
            }],
            token_valid: true,
            user_list_requests: 0,
            trace_ids: Vec::new(),
            next_id: 2,
        }
    }
}

type Shared = web::Data<Mutex<StubState>>;

/// Running stub backend.
pub struct StubBackend {
    /// Base address, e.g. `http://127.0.0.1:40123`.
    pub base_url: String,
    state: Shared,
    handle: ServerHandle,
}

impl StubBackend {
    /// Bind to an ephemeral port and serve on the current actix runtime.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend address");
        let state: Shared = web::Data::new(Mutex::new(StubState::default()));
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/api/login", web::post().to(login))
                .route("/api/register", web::post().to(register))
                .route("/api/roles", web::get().to(list_roles))
                .route("/api/users", web::get().to(list_users))
                .route("/api/users", web::post().to(create_user))
                .route("/api/users/{id}", web::get().to(get_user))
                .route("/api/users/{id}", web::put().to(update_user))
                .route("/api/users/{id}", web::delete().to(delete_user))
        })
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("listen on stub socket")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Lock the backend state.
    pub fn state(&self) -> MutexGuard<'_, StubState> {
        lock(&self.state)
    }

    /// Stop accepting connections.
    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

fn lock(state: &Mutex<StubState>) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn record_trace(state: &mut StubState, req: &HttpRequest) {
    if let Some(trace) = req
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
    {
        state.trace_ids.push(trace.to_owned());
    }
}

fn authorised(state: &StubState, req: &HttpRequest) -> bool {
    let expected = format!("Bearer {ISSUED_TOKEN}");
    state.token_valid
        && req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(expected.as_str())
}

fn unauthenticated() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "message": "Unauthenticated." }))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(state: Shared, req: HttpRequest, body: web::Json<LoginBody>) -> HttpResponse {
    let mut state = lock(&state);
    record_trace(&mut state, &req);
    let found = state
        .users
        .iter()
        .find(|user| user.email == body.email)
        .filter(|_| body.password == PASSWORD)
        .cloned();
    match found {
        Some(user) => {
            state.token_valid = true;
            HttpResponse::Ok().json(json!({
                "data": { "token": ISSUED_TOKEN, "user": user.to_json() },
                "message": "Logged in",
            }))
        }
        None => HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" })),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
}

async fn register(state: Shared, body: web::Json<RegisterBody>) -> HttpResponse {
    let mut state = lock(&state);
    if state.users.iter().any(|user| user.email == body.email) {
        return HttpResponse::UnprocessableEntity().json(json!({
            "message": "The given data was invalid.",
            "data": { "email": ["The email has already been taken."] },
        }));
    }
    let id = state.next_id;
    state.next_id += 1;
    state.users.push(StubUser {
        id,
        name: body.name.clone(),
        email: body.email.clone(),
        role_id: None,
    });
    HttpResponse::Created().json(json!({ "message": "Registered" }))
}

async fn list_roles(state: Shared, req: HttpRequest) -> HttpResponse {
    let state = lock(&state);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    HttpResponse::Ok().json(json!({ "data": [
        { "roles_id": 1, "name": "admin", "display_name": "Administrator", "status": 1 },
        { "roles_id": 2, "name": "editor", "display_name": "Editor", "status": 0 },
    ] }))
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    search: String,
}

async fn list_users(
    state: Shared,
    req: HttpRequest,
    params: web::Query<ListParams>,
) -> HttpResponse {
    let mut state = lock(&state);
    record_trace(&mut state, &req);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    state.user_list_requests += 1;
    let needle = params.search.to_lowercase();
    let matching: Vec<Value> = state
        .users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
        .map(StubUser::to_json)
        .collect();
    let total = matching.len();
    HttpResponse::Ok().json(json!({ "data": {
        "data": matching,
        "current_page": 1,
        "last_page": 1,
        "per_page": 15,
        "total": total,
    } }))
}

async fn get_user(state: Shared, req: HttpRequest, id: web::Path<u64>) -> HttpResponse {
    let state = lock(&state);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    match state.users.iter().find(|user| user.id == *id) {
        Some(user) => HttpResponse::Ok().json(json!({ "data": user.to_json() })),
        None => HttpResponse::NotFound().json(json!({ "message": "User not found" })),
    }
}

#[derive(Deserialize)]
struct UserBody {
    name: String,
    email: String,
    #[serde(default)]
    role_id: Option<u64>,
}

fn validate(body: &UserBody) -> Option<HttpResponse> {
    let mut fields = serde_json::Map::new();
    if body.name.trim().is_empty() {
        fields.insert("name".to_owned(), json!(["The name field is required."]));
    }
    if !body.email.contains('@') {
        fields.insert("email".to_owned(), json!(["The email must be a valid email address."]));
    }
    (!fields.is_empty()).then(|| {
        HttpResponse::UnprocessableEntity().json(json!({
            "message": "The given data was invalid.",
            "data": fields,
        }))
    })
}

async fn create_user(state: Shared, req: HttpRequest, body: web::Json<UserBody>) -> HttpResponse {
    let mut state = lock(&state);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    if let Some(rejection) = validate(&body) {
        return rejection;
    }
    if state.users.iter().any(|user| user.email == body.email) {
        return HttpResponse::Conflict().json(json!({ "message": "Email already exists" }));
    }
    let user = StubUser {
        id: state.next_id,
        name: body.name.clone(),
        email: body.email.clone(),
        role_id: body.role_id,
    };
    state.next_id += 1;
    state.users.push(user.clone());
    HttpResponse::Created().json(json!({ "data": user.to_json(), "message": "Created" }))
}

async fn update_user(
    state: Shared,
    req: HttpRequest,
    id: web::Path<u64>,
    body: web::Json<UserBody>,
) -> HttpResponse {
    let mut state = lock(&state);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    if let Some(rejection) = validate(&body) {
        return rejection;
    }
    let id = id.into_inner();
    if state
        .users
        .iter()
        .any(|user| user.email == body.email && user.id != id)
    {
        return HttpResponse::Conflict().json(json!({ "message": "Email already exists" }));
    }
    let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
        return HttpResponse::NotFound().json(json!({ "message": "User not found" }));
    };
    user.name.clone_from(&body.name);
    user.email.clone_from(&body.email);
    user.role_id = body.role_id;
    let updated = user.to_json();
    HttpResponse::Ok().json(json!({ "data": updated }))
}

async fn delete_user(state: Shared, req: HttpRequest, id: web::Path<u64>) -> HttpResponse {
    let mut state = lock(&state);
    if !authorised(&state, &req) {
        return unauthenticated();
    }
    let before = state.users.len();
    let id = id.into_inner();
    state.users.retain(|user| user.id != id);
    if state.users.len() == before {
        return HttpResponse::NotFound().json(json!({ "message": "User not found" }));
    }
    HttpResponse::NoContent().finish()
}
