pub mod api;
pub mod cache;
pub mod client;
pub mod error;
pub mod flags;
pub mod routes;
