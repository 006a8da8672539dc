//! HTTP API handlers for ccrawl-server

pub mod auth;
pub mod health;
pub mod search;

pub use auth::auth_routes;
pub use health::health_routes;
pub use search::search_routes;
