//! Database repositories
//!
//! Repositories encapsulate data access logic and provide a clean API for
//! business logic to interact with the database.

pub mod category;
pub mod task;
pub mod user;

pub use category::{CategoryRepository, CategoryRepositoryError};
pub use task::{TaskRepository, TaskRepositoryError};
pub use user::{UserRepository, UserRepositoryError};
