//! App initialization guard.
//!
//! On page load the guard reads the app status (and the user session when the page requires
//! authentication) and decides whether the page renders or the user is sent elsewhere.
//! Fetch failures become an inline error state; nothing is retried.
use bodhi_common::api::{AppInfo, AppStatus, Role, UserResponse};
use bodhi_common::client::BodhiClient;
use bodhi_common::flags::SetupFlags;
use bodhi_common::routes::{
    login_with_error, LOGIN_ERROR_INSUFFICIENT_ROLE, ROUTE_DEFAULT, ROUTE_LOGIN,
    ROUTE_REQUEST_ACCESS, ROUTE_RESOURCE_ADMIN, ROUTE_SETUP, ROUTE_SETUP_DOWNLOAD_MODELS,
};
use serde::Serialize;
use tracing::{info, warn};

/// What the guarded page requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardOptions {
    /// The page renders only in this status. `None` always routes by status, which is what the
    /// landing page does.
    pub allowed_status: Option<AppStatus>,
    pub authenticated: bool,
    /// Only checked when `authenticated` is set.
    pub min_role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Redirect {
        route: String,
    },
    Authorized,
}

impl GuardState {
    fn redirect(route: impl Into<String>) -> Self {
        GuardState::Redirect {
            route: route.into(),
        }
    }
}

/// Route for a reported status. `ready` goes to the download-models page until it has been
/// shown once.
pub fn status_route(status: AppStatus, flags: &SetupFlags) -> &'static str {
    match status {
        AppStatus::Setup => ROUTE_SETUP,
        AppStatus::ResourceAdmin => ROUTE_RESOURCE_ADMIN,
        AppStatus::Ready if !flags.models_page_shown => ROUTE_SETUP_DOWNLOAD_MODELS,
        AppStatus::Ready => ROUTE_DEFAULT,
    }
}

/// Redirect required by the app status, if any.
pub fn check_status(info: &AppInfo, options: &GuardOptions, flags: &SetupFlags) -> Option<GuardState> {
    match options.allowed_status {
        Some(allowed) if allowed == info.status => None,
        _ => Some(GuardState::redirect(status_route(info.status, flags))),
    }
}

/// Outcome of the session check for an authenticated page.
///
/// An API-token caller has no user to send to request-access; only its scope is checked.
pub fn check_user(user: &UserResponse, options: &GuardOptions) -> GuardState {
    let role = match user {
        UserResponse::LoggedOut => return GuardState::redirect(ROUTE_LOGIN),
        UserResponse::LoggedIn(info) => match info.role {
            Some(role) => role,
            None => return GuardState::redirect(ROUTE_REQUEST_ACCESS),
        },
        UserResponse::ApiToken(token) => token.role,
    };
    match options.min_role {
        Some(required) if !role.has_access_to(&required) => {
            GuardState::redirect(login_with_error(LOGIN_ERROR_INSUFFICIENT_ROLE))
        }
        _ => GuardState::Authorized,
    }
}

/// Combines both fetch results into the final state, applying the rules in order: status
/// fetch, status redirect, authentication, session fetch, session checks.
pub fn evaluate<E: std::fmt::Display>(
    app_info: Result<&AppInfo, E>,
    user: Option<Result<&UserResponse, E>>,
    options: &GuardOptions,
    flags: &SetupFlags,
) -> GuardState {
    let info = match app_info {
        Ok(info) => info,
        Err(e) => {
            return GuardState::Error {
                message: format!("failed to load app info: {e}"),
            }
        }
    };
    if let Some(redirect) = check_status(info, options, flags) {
        return redirect;
    }
    if !options.authenticated {
        return GuardState::Authorized;
    }
    match user {
        Some(Ok(user)) => check_user(user, options),
        Some(Err(e)) => GuardState::Error {
            message: format!("failed to load user info: {e}"),
        },
        None => GuardState::Error {
            message: "user info was not requested".to_string(),
        },
    }
}

/// Runs the guard for one page load.
pub struct AppInitializer {
    client: BodhiClient,
    options: GuardOptions,
    flags: SetupFlags,
    state: GuardState,
}

impl AppInitializer {
    pub fn new(client: BodhiClient, options: GuardOptions, flags: SetupFlags) -> Self {
        Self {
            client,
            options,
            flags,
            state: GuardState::Loading,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Fetches app info, and the session when required, then settles on a final state.
    ///
    /// The two requests are independent and run concurrently.
    pub async fn run(&mut self) -> &GuardState {
        let (app_info, user) = if self.options.authenticated {
            let (app_info, user) =
                futures::join!(self.client.app_info(), self.client.user_info());
            (app_info, Some(user))
        } else {
            (self.client.app_info().await, None)
        };

        if let Err(e) = &app_info {
            warn!(error = %e, "app info fetch failed");
        }
        if let Some(Err(e)) = &user {
            warn!(error = %e, "user info fetch failed");
        }

        self.state = evaluate(
            app_info.as_ref(),
            user.as_ref().map(|u| u.as_ref()),
            &self.options,
            &self.flags,
        );
        info!(
            allowed_status = ?self.options.allowed_status,
            authenticated = self.options.authenticated,
            state = ?self.state,
            "guard settled"
        );
        &self.state
    }
}
