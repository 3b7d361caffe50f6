//! Viewer/admin roles for the menu session.

use tracing::{info, warn};

use crate::config::AdminSettings;

/// Highest menu option a viewer may pick.
const VIEWER_MAX_OPTION: u32 = 4;
/// Highest menu option an admin may pick.
const ADMIN_MAX_OPTION: u32 = 13;

/// What the current session is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    /// Read-only access: listings and search.
    #[default]
    Viewer,
    /// Full access, including edits, reminders and snapshots.
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Highest menu option available to this role.
    pub fn max_option(self) -> u32 {
        match self {
            Role::Viewer => VIEWER_MAX_OPTION,
            Role::Admin => ADMIN_MAX_OPTION,
        }
    }
}

impl AdminSettings {
    /// Checks entered credentials. Usernames match exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Role {
        if self.usernames.iter().any(|u| u == username) && self.password == password {
            info!(username, "Admin login");
            Role::Admin
        } else {
            warn!(username, "Rejected admin login");
            Role::Viewer
        }
    }
}
