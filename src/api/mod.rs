//! Request routing and the HTTP transport.
//!
//! [`Dispatcher`] is transport-agnostic: it takes an already decoded
//! [`Request`] and produces a [`Response`]. The [`http`] module adapts it to axum.

mod dispatcher;
pub mod http;
mod routes;

pub use dispatcher::*;
pub use routes::*;
