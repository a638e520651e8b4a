//! Path resolution and the route guard.

mod guard;
mod route;

pub use guard::{Navigation, guard};
pub use route::{
    ADMIN_DASHBOARD_PATH, ADMIN_PATH, ADMIN_POSTS_PATH, ADMIN_ROLES_PATH, ADMIN_SETTINGS_PATH,
    ADMIN_USERS_PATH, HOME_PATH, LOGIN_PATH, REGISTER_PATH, RESET_PASSWORD_PATH, Screen,
    is_admin_path, is_auth_only_path, normalise,
};
