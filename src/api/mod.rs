//! HTTP API.
//!
//! Exposes the leaf gate, the demo disease picker, the vision analysis
//! proxy and the farmer/researcher dashboards as JSON endpoints under
//! `/api/`.
//!
//! The router is composable — `build_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::build_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
