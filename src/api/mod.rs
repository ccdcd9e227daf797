//! API Module
//!
//! HTTP handlers and routing for the user cache.
//!
//! # Endpoints
//! - `PUT /set`, `POST /add` - Store a value
//! - `GET /get/:key`, `GET /exists/:key` - Read a key
//! - `POST /inc/:key`, `POST /dec/:key` - Adjust a numeric entry
//! - `DELETE /del/*search` - Delete by key, wildcard or pattern
//! - `POST /clear` - Remove every entry
//! - `GET /stats`, `GET /meminfo`, `GET /entries` - Cached statistics
//! - `GET /ttl`, `PUT /ttl` - Default TTL
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
