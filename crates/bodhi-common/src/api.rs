use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ENDPOINT_APP_INFO: &str = "/bodhi/v1/info";
pub const ENDPOINT_USER_INFO: &str = "/bodhi/v1/user";

/// Server-reported lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppStatus {
    Setup,
    ResourceAdmin,
    Ready,
}

impl AppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStatus::Setup => "setup",
            AppStatus::ResourceAdmin => "resource-admin",
            AppStatus::Ready => "ready",
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "setup" => Ok(AppStatus::Setup),
            "resource-admin" => Ok(AppStatus::ResourceAdmin),
            "ready" => Ok(AppStatus::Ready),
            other => Err(format!(
                "unknown app status: '{other}'. Expected one of: setup, resource-admin, ready"
            )),
        }
    }
}

/// User role, ordered from least to most privileged.
///
/// API tokens and exchanged tokens carry `scope_token_*` / `scope_user_*` values instead of a
/// resource role; those map onto the two lowest roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(
        rename = "resource_user",
        alias = "user",
        alias = "scope_token_user",
        alias = "scope_user_user"
    )]
    User,
    #[serde(
        rename = "resource_power_user",
        alias = "power_user",
        alias = "scope_token_power_user",
        alias = "scope_user_power_user"
    )]
    PowerUser,
    #[serde(rename = "resource_manager", alias = "manager")]
    Manager,
    #[serde(rename = "resource_admin", alias = "admin")]
    Admin,
}

impl Role {
    /// Higher roles have access to everything lower roles do.
    pub fn has_access_to(&self, required: &Role) -> bool {
        self >= required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "resource_user",
            Role::PowerUser => "resource_power_user",
            Role::Manager => "resource_manager",
            Role::Admin => "resource_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.strip_prefix("resource_").unwrap_or(name) {
            "user" => Ok(Role::User),
            "power_user" => Ok(Role::PowerUser),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(format!(
                "unknown role: '{name}'. Expected one of: user, power_user, manager, admin"
            )),
        }
    }
}

/// Response of `GET /bodhi/v1/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub version: String,
    pub status: AppStatus,
}

/// Response of `GET /bodhi/v1/user`, discriminated by `auth_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "auth_status", rename_all = "snake_case")]
pub enum UserResponse {
    LoggedOut,
    LoggedIn(UserInfo),
    /// Request authenticated with an API token rather than a browser session.
    ApiToken(TokenInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// `None` when the user has logged in but has not been granted access yet.
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_follows_privilege() {
        assert!(Role::User < Role::PowerUser);
        assert!(Role::PowerUser < Role::Manager);
        assert!(Role::Manager < Role::Admin);
        assert!(Role::Admin.has_access_to(&Role::User));
        assert!(Role::Manager.has_access_to(&Role::Manager));
        assert!(!Role::PowerUser.has_access_to(&Role::Manager));
    }

    #[test]
    fn role_parses_prefixed_and_bare_names() {
        assert_eq!("resource_manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("power_user".parse::<Role>().unwrap(), Role::PowerUser);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn app_status_uses_kebab_case_on_the_wire() {
        let info: AppInfo =
            serde_json::from_str(r#"{"version":"0.1.0","status":"resource-admin"}"#).unwrap();
        assert_eq!(info.status, AppStatus::ResourceAdmin);
        assert_eq!(
            serde_json::to_string(&AppStatus::Ready).unwrap(),
            r#""ready""#
        );
    }

    #[test]
    fn user_response_is_tagged_by_auth_status() {
        let out: UserResponse = serde_json::from_str(r#"{"auth_status":"logged_out"}"#).unwrap();
        assert_eq!(out, UserResponse::LoggedOut);

        let user: UserResponse = serde_json::from_str(
            r#"{"auth_status":"logged_in","user_id":"u1","username":"a@b.c","role":"resource_admin"}"#,
        )
        .unwrap();
        match user {
            UserResponse::LoggedIn(info) => {
                assert_eq!(info.username, "a@b.c");
                assert_eq!(info.role, Some(Role::Admin));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn missing_or_null_role_is_none() {
        for body in [
            r#"{"auth_status":"logged_in","username":"a"}"#,
            r#"{"auth_status":"logged_in","username":"a","role":null}"#,
        ] {
            let parsed: UserResponse = serde_json::from_str(body).unwrap();
            let UserResponse::LoggedIn(info) = parsed else {
                panic!("expected logged_in for {body}");
            };
            assert_eq!(info.role, None);
        }
    }

    #[test]
    fn api_token_session_parses_with_scope_role() {
        let parsed: UserResponse =
            serde_json::from_str(r#"{"auth_status":"api_token","role":"scope_token_user"}"#)
                .unwrap();
        assert_eq!(parsed, UserResponse::ApiToken(TokenInfo { role: Role::User }));

        let parsed: UserResponse = serde_json::from_str(
            r#"{"auth_status":"api_token","role":"scope_token_power_user"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            UserResponse::ApiToken(TokenInfo {
                role: Role::PowerUser
            })
        );
    }

    #[test]
    fn logged_in_accepts_exchanged_scope_roles() {
        let parsed: UserResponse = serde_json::from_str(
            r#"{"auth_status":"logged_in","user_id":"u1","username":"a","role":"scope_user_power_user"}"#,
        )
        .unwrap();
        let UserResponse::LoggedIn(info) = parsed else {
            panic!("expected logged_in");
        };
        assert_eq!(info.role, Some(Role::PowerUser));
        assert!(!Role::PowerUser.has_access_to(&Role::Manager));
    }
}
