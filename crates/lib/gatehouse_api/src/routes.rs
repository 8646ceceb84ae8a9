//! Route paths.

pub const GET_API_HEALTH: &str = "/api/health";
pub const POST_AUTH_LOGIN: &str = "/api/auth/login";
pub const GET_AUTH_ME: &str = "/api/auth/me";
pub const POST_ACCOUNTS: &str = "/api/accounts";
pub const GET_ACCOUNTS_ID: &str = "/api/accounts/{id}";
