pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod ui;

pub use error::{ChangebotError, Result};
