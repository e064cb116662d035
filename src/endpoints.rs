//! The endpoint URIs served by the dashboard.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page. Takes an optional `month` query parameter.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The HTML fragment with financial advice, loaded by the dashboard.
pub const DASHBOARD_ADVICE: &str = "/dashboard/advice";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
