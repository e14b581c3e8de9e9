//! HTTP surface for the reelsmith pipeline.
//!
//! The router exposes the reel render endpoints, the speech-only pass-through and the
//! directory of finished assets. All synthesis work is delegated to [`reelsmith::Pipeline`].
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod handlers;
pub mod retention;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use retention::AssetSweeper;
pub use routes::create_router;
pub use state::AppState;
