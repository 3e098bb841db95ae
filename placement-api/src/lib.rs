//! HTTP service that receives placement transforms from the AR client.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{ApiConfig, build_router, serve};
