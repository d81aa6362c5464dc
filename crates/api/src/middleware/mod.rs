//! HTTP middleware for the hotspots API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. CORS
//! 3. Request ID (read or generate `x-request-id`)
//! 4. `TraceLayer` (request span carrying the request ID)
//! 5. Security headers
//!
//! Authentication is not a layer: handlers opt in with the
//! [`RequireUser`] / [`OptionalUser`] extractors.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{OptionalUser, RequireUser};
pub use request_id::{REQUEST_ID_HEADER, RequestId, make_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
