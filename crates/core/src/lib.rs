//! Shared foundations for the narrative workspace.
//!
//! `AppError` and `AppResult` for every crate, subscriber setup, and the
//! layered `AppConfig` that carries the chunk budget, overlap and embedding
//! batch size.

pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
