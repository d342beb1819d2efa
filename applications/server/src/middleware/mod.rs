/// HTTP middleware
pub mod rate_limit;

pub use rate_limit::{caller_identity, rate_limit_middleware, RateLimiter};
