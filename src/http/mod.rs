//! HTTP Session Manager
//!
//! - `request`: transport-neutral `ApiRequest`/`ApiResponse` values
//! - `transport`: the `EpicTransport` trait and the pooled reqwest client
//! - `rate_limiter`: optional client-side pacing
//! - `session`: login-scoped `EpicSession` with the cached service token

pub mod rate_limiter;
pub mod request;
pub mod session;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use rate_limiter::{RateLimitGuard, RateLimiter};
pub use request::{ApiRequest, ApiResponse, Authorization, Method, RequestBody};
pub use session::{BearerSession, ClientCredentials, EpicSession};
pub use transport::{default_user_agent, EpicTransport, HttpTransport};
