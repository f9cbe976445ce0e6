//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Visitor id on API routes
//! 6. Rate limiting (governor) on mutating API routes

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;
pub mod visitor;

pub use auth::{RequireAuth, VisitorApi};
pub use rate_limit::{api_rate_limiter, mutation_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use session::create_session_layer;
pub use visitor::visitor_id_middleware;
