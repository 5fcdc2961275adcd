//! Task management module

pub mod api;

pub use api::{TaskApiState, task_api_router};
