//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded in the span)
//! 5. Security headers
//! 6. Body limit
//!
//! Authentication is not a layer: protected handlers take [`RequireAuth`].

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::RequireAuth;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
