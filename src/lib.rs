pub mod client;
pub mod config;
mod error;
pub mod extract;
pub mod http;
pub mod models;
pub mod payload;
pub mod server;

pub use client::{BAILIAN_BASE_URL, BailianClient, Endpoint};
pub use config::{Env, ServerConfig, resolve_api_key};
pub use error::{ApiErrorBody, BailianError, Result};
pub use payload::{EditRequest, GenerationRequest, build_edit, build_generation};
pub use server::BailianImageServer;
