//! Console paths and the screens they resolve to.

use std::fmt;

use crate::domain::ResourceId;

/// Public landing page.
pub const HOME_PATH: &str = "/";
/// Login form.
pub const LOGIN_PATH: &str = "/login";
/// Registration form.
pub const REGISTER_PATH: &str = "/register";
/// Password reset form.
pub const RESET_PASSWORD_PATH: &str = "/reset-password";
/// Admin area root; never rendered itself.
pub const ADMIN_PATH: &str = "/admin";
/// Admin landing screen.
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
/// User management list.
pub const ADMIN_USERS_PATH: &str = "/admin/users";
/// Role list.
pub const ADMIN_ROLES_PATH: &str = "/admin/roles";
/// Posts section.
pub const ADMIN_POSTS_PATH: &str = "/admin/posts";
/// Settings section.
pub const ADMIN_SETTINGS_PATH: &str = "/admin/settings";

const AUTH_ONLY_PATHS: [&str; 3] = [LOGIN_PATH, REGISTER_PATH, RESET_PASSWORD_PATH];

/// Screens the console can render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    /// `/`
    Home,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/reset-password`
    ResetPassword,
    /// `/admin/dashboard`
    Dashboard,
    /// `/admin/users`
    Users,
    /// `/admin/users/create`
    UserCreate,
    /// `/admin/users/:id/edit`
    UserEdit(ResourceId),
    /// `/admin/roles`
    Roles,
    /// `/admin/posts`
    Posts,
    /// `/admin/settings`
    Settings,
    /// Any path without a screen.
    NotFound,
}

impl Screen {
    /// Resolve a normalised path. `/admin` itself has no screen.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        match path {
            HOME_PATH => Self::Home,
            LOGIN_PATH => Self::Login,
            REGISTER_PATH => Self::Register,
            RESET_PASSWORD_PATH => Self::ResetPassword,
            ADMIN_DASHBOARD_PATH => Self::Dashboard,
            ADMIN_USERS_PATH => Self::Users,
            ADMIN_ROLES_PATH => Self::Roles,
            ADMIN_POSTS_PATH => Self::Posts,
            ADMIN_SETTINGS_PATH => Self::Settings,
            other => Self::resolve_user_path(other).unwrap_or(Self::NotFound),
        }
    }

    fn resolve_user_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(ADMIN_USERS_PATH)?.strip_prefix('/')?;
        if rest == "create" {
            return Some(Self::UserCreate);
        }
        let id = rest.strip_suffix("/edit")?;
        if id.contains('/') {
            return None;
        }
        let id = ResourceId::parse(id);
        (!id.is_blank()).then_some(Self::UserEdit(id))
    }

    /// Whether the screen sits behind the admin layout.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Users
                | Self::UserCreate
                | Self::UserEdit(_)
                | Self::Roles
                | Self::Posts
                | Self::Settings
        )
    }

    /// Heading shown for the screen.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::ResetPassword => "Reset Password",
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::UserCreate => "Create User",
            Self::UserEdit(_) => "Edit User",
            Self::Roles => "Roles",
            Self::Posts => "Posts",
            Self::Settings => "Settings",
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Strip query and fragment, ensure a leading slash, and drop trailing
/// slashes.
#[must_use]
pub fn normalise(path: &str) -> String {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = bare.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return HOME_PATH.to_owned();
    }
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Whether `path` (normalised) is `/admin` or below it.
#[must_use]
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PATH
        || path
            .strip_prefix(ADMIN_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether `path` (normalised) is only meaningful without a session.
#[must_use]
pub fn is_auth_only_path(path: &str) -> bool {
    AUTH_ONLY_PATHS.contains(&path)
}
