pub mod cache;
pub mod citation;
pub mod config;
pub mod discord;
pub mod error;
pub mod logging;
pub mod trace;

pub use error::{FelmError, Result};
