pub mod aircraft;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod schedule;
pub mod services;

pub use error::{Error, Result};
