//! Taskdeck - Task Management Web API
//!
//! A JSON API for personal task management: users register and log in,
//! organize tasks into categories, and move tasks through their lifecycle.
//! Backed by PostgreSQL, authenticated with bearer tokens.

pub mod core;
