//! Verifold web dashboard and JSON API.

pub mod handlers;
pub mod router;
pub mod sse;
pub mod state;
