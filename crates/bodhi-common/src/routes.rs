/// Front-end routes the app guard redirects to.
pub const ROUTE_DEFAULT: &str = "/ui/chat";
pub const ROUTE_SETUP: &str = "/ui/setup";
pub const ROUTE_RESOURCE_ADMIN: &str = "/ui/setup/resource-admin";
pub const ROUTE_SETUP_DOWNLOAD_MODELS: &str = "/ui/setup/download-models";
pub const ROUTE_LOGIN: &str = "/ui/login";
pub const ROUTE_REQUEST_ACCESS: &str = "/ui/request-access";

pub const LOGIN_ERROR_INSUFFICIENT_ROLE: &str = "insufficient-role";

pub fn login_with_error(error: &str) -> String {
    format!("{ROUTE_LOGIN}?error={error}")
}
