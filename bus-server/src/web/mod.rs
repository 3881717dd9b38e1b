//! HTTP API layer.
//!
//! JSON over HTTP. Authentication lives in a collaborator service; handlers
//! that need an identity trust the opaque `x-user-id` header as-is.

mod dto;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
