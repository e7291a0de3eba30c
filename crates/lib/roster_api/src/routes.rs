//! Route paths.

pub const GET_API_HEALTH: &str = "/api/health";
pub const POST_AUTH_REGISTER: &str = "/auth/register";
pub const POST_AUTH_TOKEN: &str = "/auth/token";
pub const POST_AUTH_TOKEN_REFRESH: &str = "/auth/token/refresh";
pub const POST_AUTH_TOKEN_VERIFY: &str = "/auth/token/verify";
pub const GET_AUTH_ME: &str = "/auth/me";
