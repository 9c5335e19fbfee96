//! # connect-api
//!
//! HTTP API layer for handcash-connect-demo.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The authorization callback and payment endpoints
//! - A server-rendered demo page
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Demo page |
//! | GET | `/health` | Health check |
//! | GET | `/api/auth/handcash/success` | Authorization callback |
//! | POST | `/api/pay` | Execute the demo payment |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
