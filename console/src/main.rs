//! `admin-console` command line front end.
//!
//! Each invocation builds the console from `CONSOLE_*` settings, so the
//! stored credential carries the session from one command to the next.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use admin_console::domain::{ResourceId, Role, User};
use admin_console::inbound::forms::{FormState, FormView, Submission, UserFields, UserForm};
use admin_console::{Console, ConsoleSettings};
use clap::{Args, Parser, Subcommand};
use ortho_config::OrthoConfig;
use color_eyre::eyre::{Result, WrapErr, eyre};
use pagination::{ListQuery, Page, PageNumber};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `admin-console` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "admin-console",
    about = "Drive the admin console session, routes, and resources",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange credentials for a stored session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Resolve a path through the route guard.
    Open {
        /// Path such as `/admin/users`.
        path: String,
    },
    /// Show user and role totals.
    Dashboard,
    /// Manage users.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Inspect roles.
    #[command(subcommand)]
    Roles(RolesCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// List one page of users.
    List {
        /// Free-text filter.
        #[arg(long, default_value = "")]
        search: String,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one user.
    Get {
        /// User id.
        id: String,
    },
    /// Create a user.
    Create(UserArgs),
    /// Update a user; omitted fields keep their current values.
    Update {
        /// User id.
        id: String,
        #[command(flatten)]
        fields: UserArgs,
    },
    /// Delete a user.
    Delete {
        /// User id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum RolesCommand {
    /// List every role.
    List,
}

#[derive(Debug, Args)]
struct UserArgs {
    /// Display name.
    #[arg(long)]
    name: Option<String>,
    /// Email address.
    #[arg(long)]
    email: Option<String>,
    /// Login handle.
    #[arg(long)]
    username: Option<String>,
    /// Role id.
    #[arg(long)]
    role_id: Option<u64>,
    /// Account status such as `active`.
    #[arg(long)]
    status: Option<String>,
    /// New password, also sent as its confirmation.
    #[arg(long)]
    password: Option<String>,
}

impl UserArgs {
    fn apply(self, fields: &mut UserFields) {
        let Self {
            name,
            email,
            username,
            role_id,
            status,
            password,
        } = self;
        if let Some(name) = name {
            fields.name = name;
        }
        if let Some(email) = email {
            fields.email = email;
        }
        if let Some(username) = username {
            fields.username = username;
        }
        if role_id.is_some() {
            fields.role_id = role_id;
        }
        if let Some(status) = status {
            fields.status = status;
        }
        if let Some(password) = password {
            fields.password_confirmation.clone_from(&password);
            fields.password = password;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ConsoleSettings::load_from_iter([OsString::from("admin-console")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    let console = Console::from_settings(&settings).wrap_err("failed to build console")?;
    run(&console, cli.command).await
}

async fn run(console: &Console, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let form = console.login_form();
            form.edit("email", |fields| fields.email = email);
            form.edit("password", |fields| fields.password = password);
            let outcome = form.submit().await;
            report(&form.snapshot(), outcome)?;
            if let Some(user) = console.current_user() {
                println!("logged in as {} <{}>", user.name, user.email);
            }
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let form = console.register_form();
            form.edit("name", |fields| fields.name = name);
            form.edit("email", |fields| fields.email = email);
            form.edit("password", |fields| fields.password = password);
            let outcome = form.submit().await;
            report(&form.snapshot(), outcome)
        }
        Command::Logout => {
            console.logout().wrap_err("stored credential was not removed")?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            match console.current_user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.initials()),
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Open { path } => {
            let view = console.open(&path);
            println!("{} -> {}", view.path, view.screen.title());
            Ok(())
        }
        Command::Dashboard => {
            let summary = console.dashboard().await?;
            println!("users: {}", summary.user_total());
            println!("roles: {}", summary.role_total());
            Ok(())
        }
        Command::Users(command) => run_users(console, command).await,
        Command::Roles(RolesCommand::List) => {
            let roles = console.roles().list(&ListQuery::default()).await?;
            print_roles(&roles);
            Ok(())
        }
    }
}

async fn run_users(console: &Console, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { search, page } => {
            let page = PageNumber::new(page).map_err(|error| eyre!("{error}"))?;
            let users = console.users().list(&ListQuery::new(search, page)).await?;
            print_users(&users);
            Ok(())
        }
        UsersCommand::Get { id } => {
            let id = ResourceId::parse(id);
            let user = console
                .users()
                .get_by_id(Some(&id))
                .await?
                .ready()
                .ok_or_else(|| eyre!("user id is missing"))?;
            print_user(&user);
            Ok(())
        }
        UsersCommand::Create(fields) => {
            let form = console.new_user_form();
            form.edit_field("name", |current| fields.apply(current));
            let outcome = form.submit().await;
            report(&form.snapshot(), outcome)
        }
        UsersCommand::Update { id, fields } => {
            let id = ResourceId::parse(id);
            let form = UserForm::load(console.users().clone(), Some(&id))
                .await?
                .ready()
                .ok_or_else(|| eyre!("user id is missing"))?;
            form.edit_field("name", |current| fields.apply(current));
            let outcome = form.submit().await;
            report(&form.snapshot(), outcome)
        }
        UsersCommand::Delete { id } => {
            let notice =
                admin_console::inbound::forms::delete_user(console.users(), &ResourceId::parse(id))
                    .await;
            println!("{}: {}", notice.title, notice.description);
            Ok(())
        }
    }
}

fn report<F>(view: &FormView<F>, outcome: Submission) -> Result<()> {
    print_state(&view.state);
    match outcome {
        Submission::Succeeded => Ok(()),
        Submission::Failed | Submission::Detached => Err(eyre!("request was not accepted")),
    }
}

fn print_state(state: &FormState) {
    if let Some(notice) = state.notice() {
        println!("{}: {}", notice.title, notice.description);
    }
    for (field, messages) in state.errors().iter() {
        println!("  {field}: {}", messages.join(", "));
    }
}

fn print_users(page: &Page<User>) {
    for user in page.items() {
        print_user(user);
    }
    if let Some(meta) = page.meta() {
        println!(
            "page {} of {} ({} users)",
            meta.current_page, meta.last_page, meta.total
        );
    }
}

fn print_user(user: &User) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        user.id,
        user.name,
        user.email,
        user.role.as_deref().unwrap_or("-"),
        user.status.as_deref().unwrap_or("-"),
    );
}

fn print_roles(page: &Page<Role>) {
    for role in page.items() {
        println!(
            "{}\t{}\t{}\t{}",
            role.id,
            role.name,
            role.display_name,
            role.status_label()
        );
    }
}
