//! Credential resolution and controller settings.

pub mod persistence;
pub mod resolver;
pub mod types;
