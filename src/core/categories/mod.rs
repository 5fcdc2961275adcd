//! Category management module

pub mod api;

pub use api::{CategoryApiState, category_api_router};
