//! End-to-end session and resource scenarios against a stub backend.
//!
//! The console is built from settings exactly as the binary builds it: a
//! file-backed credential store in a temporary directory and the reqwest
//! gateway talking to an in-process actix server.

mod support;

use admin_console::domain::ports::CredentialStore;
use admin_console::domain::routing::{ADMIN_DASHBOARD_PATH, LOGIN_PATH, Screen};
use admin_console::domain::{ResourceId, UserPayload};
use admin_console::inbound::forms::{NoticeVariant, Submission, delete_user};
use admin_console::{Console, ConsoleSettings};
use pagination::ListQuery;
use rstest::{fixture, rstest};
use support::stub_backend::{ADMIN_EMAIL, ISSUED_TOKEN, PASSWORD, StubBackend};
use tempfile::TempDir;

struct World {
    backend: StubBackend,
    storage: TempDir,
}

impl World {
    fn settings(&self) -> ConsoleSettings {
        ConsoleSettings {
            api_base_url: Some(self.backend.base_url.clone()),
            storage_dir: Some(self.storage.path().to_path_buf()),
            request_timeout_secs: Some(5),
            cache_max_age_secs: Some(300),
        }
    }

    fn console(&self) -> Console {
        Console::from_settings(&self.settings()).expect("console builds")
    }
}

#[fixture]
fn world() -> World {
    World {
        backend: StubBackend::start(),
        storage: TempDir::new().expect("temp dir"),
    }
}

async fn logged_in(world: &World) -> Console {
    let console = world.console();
    let form = console.login_form();
    form.edit("email", |fields| fields.email = ADMIN_EMAIL.to_owned());
    form.edit("password", |fields| fields.password = PASSWORD.to_owned());
    assert_eq!(form.submit().await, Submission::Succeeded);
    console
}

#[rstest]
#[actix_rt::test]
async fn login_persists_the_credential_and_opens_the_dashboard(world: World) {
    let console = logged_in(&world).await;

    assert!(console.state().is_authenticated());
    assert_eq!(console.router().history(), [ADMIN_DASHBOARD_PATH]);
    let stored = console
        .store()
        .read()
        .expect("store readable")
        .expect("credential stored");
    assert_eq!(stored.token.expose(), ISSUED_TOKEN);
    assert_eq!(stored.user.email, ADMIN_EMAIL);

    let restarted = world.console();
    assert!(restarted.state().is_authenticated());
    assert_eq!(restarted.open("/login").screen, Screen::Dashboard);

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn wrong_passwords_are_reported_against_the_email(world: World) {
    let console = world.console();
    let form = console.login_form();
    form.edit("email", |fields| fields.email = ADMIN_EMAIL.to_owned());
    form.edit("password", |fields| fields.password = "nope".to_owned());

    let outcome = form.submit().await;

    let view = form.snapshot();
    assert_eq!(outcome, Submission::Failed);
    assert_eq!(view.state.errors().first("email"), Some("Invalid credentials"));
    assert!(!console.state().is_authenticated());
    assert!(console.store().read().expect("store readable").is_none());

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn duplicate_registrations_show_only_the_server_field_errors(world: World) {
    let console = world.console();
    let form = console.register_form();
    form.edit("name", |fields| fields.name = "Ada Again".to_owned());
    form.edit("email", |fields| fields.email = ADMIN_EMAIL.to_owned());
    form.edit("password", |fields| fields.password = PASSWORD.to_owned());

    let outcome = form.submit().await;

    let view = form.snapshot();
    assert_eq!(outcome, Submission::Failed);
    assert_eq!(view.state.errors().fields().collect::<Vec<_>>(), ["email"]);
    assert_eq!(
        view.state.errors().first("email"),
        Some("The email has already been taken.")
    );
    assert!(console.router().history().is_empty());

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn new_accounts_are_sent_to_login(world: World) {
    let console = world.console();
    let form = console.register_form();
    form.edit("name", |fields| fields.name = "Grace Hopper".to_owned());
    form.edit("email", |fields| fields.email = "grace@example.com".to_owned());
    form.edit("password", |fields| fields.password = PASSWORD.to_owned());

    assert_eq!(form.submit().await, Submission::Succeeded);
    assert_eq!(console.router().history(), [LOGIN_PATH]);
    assert_eq!(world.backend.state().users.len(), 2);

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn conflicting_emails_land_on_the_email_field(world: World) {
    let console = logged_in(&world).await;
    let form = console.new_user_form();
    form.edit_field("name", |fields| {
        fields.name = "Impostor".to_owned();
        fields.email = ADMIN_EMAIL.to_owned();
    });

    let outcome = form.submit().await;

    let view = form.snapshot();
    assert_eq!(outcome, Submission::Failed);
    assert_eq!(view.state.errors().first("email"), Some("Email already exists"));
    assert!(view.state.notice().is_none());

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn mutations_invalidate_cached_lists(world: World) {
    let console = logged_in(&world).await;
    let everyone = ListQuery::default();

    let first = console.users().list(&everyone).await.expect("first list");
    let cached = console.users().list(&everyone).await.expect("cached list");
    assert_eq!(world.backend.state().user_list_requests, 1);
    assert_eq!(first, cached);

    console
        .users()
        .create(&UserPayload::new("Grace Hopper", "grace@example.com").with_password("pw"))
        .await
        .expect("user created");
    let refreshed = console.users().list(&everyone).await.expect("refetched list");

    assert_eq!(world.backend.state().user_list_requests, 2);
    assert_eq!(refreshed.len(), 2);

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn reads_after_an_update_see_the_new_fields(world: World) {
    let console = logged_in(&world).await;
    let id = ResourceId::Numeric(1);

    let before = console
        .users()
        .get_by_id(Some(&id))
        .await
        .expect("initial read")
        .ready()
        .expect("enabled");
    console
        .users()
        .update(&id, &UserPayload::new("Augusta Ada King", ADMIN_EMAIL))
        .await
        .expect("update accepted");
    let after = console
        .users()
        .get_by_id(Some(&id))
        .await
        .expect("refetched read")
        .ready()
        .expect("enabled");

    assert_eq!(before.name, "Ada Lovelace");
    assert_eq!(after.name, "Augusta Ada King");

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn invalid_fields_are_returned_verbatim(world: World) {
    let console = logged_in(&world).await;
    let form = console.new_user_form();
    form.edit_field("email", |fields| fields.email = "not-an-email".to_owned());

    let outcome = form.submit().await;

    let view = form.snapshot();
    assert_eq!(outcome, Submission::Failed);
    assert_eq!(view.state.errors().fields().collect::<Vec<_>>(), ["email", "name"]);
    let notice = view.state.notice().expect("validation notice");
    assert_eq!(notice.title, "The given data was invalid.");

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn deleting_a_user_reports_success(world: World) {
    let console = logged_in(&world).await;

    let notice = delete_user(console.users(), &ResourceId::Numeric(1)).await;

    assert_eq!(notice.description, "User deleted successfully");
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert!(world.backend.state().users.is_empty());

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn logout_clears_credentials_and_cached_data(world: World) {
    let console = logged_in(&world).await;
    console
        .users()
        .list(&ListQuery::default())
        .await
        .expect("list");
    assert!(!console.cache().is_empty());

    console.logout().expect("credential removed");

    assert!(!console.state().is_authenticated());
    assert!(console.store().read().expect("store readable").is_none());
    assert!(console.cache().is_empty());
    assert_eq!(
        console.router().current().map(|view| view.screen),
        Some(Screen::Login)
    );
    assert_eq!(console.open("/admin/users").path, LOGIN_PATH);

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn revoked_tokens_end_the_session(world: World) {
    let console = logged_in(&world).await;
    world.backend.state().token_valid = false;

    let failure = console
        .dashboard()
        .await
        .expect_err("token no longer accepted");

    assert!(failure.is_auth());
    assert!(!console.state().is_authenticated());
    assert!(console.store().read().expect("store readable").is_none());
    assert_eq!(
        console.router().current().map(|view| view.path),
        Some(LOGIN_PATH.to_owned())
    );

    world.backend.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn every_request_carries_its_own_trace_id(world: World) {
    let console = logged_in(&world).await;
    console
        .users()
        .list(&ListQuery::default())
        .await
        .expect("list");

    let traces = world.backend.state().trace_ids.clone();
    assert_eq!(traces.len(), 2);
    assert_ne!(traces.first(), traces.get(1));

    world.backend.stop().await;
}
