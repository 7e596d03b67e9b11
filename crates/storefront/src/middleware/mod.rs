//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (reuse or mint `x-request-id`)
//! 4. Session lock (one state-changing request per session at a time)
//! 5. Session layer (tower-sessions with a `moka` store)

pub mod request_id;
pub mod session;
pub mod session_lock;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{create_session_layer, create_session_store};
pub use session_lock::{SessionLocks, session_lock_middleware};
