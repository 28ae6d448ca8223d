//! A small task list: add, remove, filter and clear short text items,
//! persisted in a key-value store, with a light/dark theme toggle.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod tasks;
pub mod theme;

pub use error::{Error, Result};
