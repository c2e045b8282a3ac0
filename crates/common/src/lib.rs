//! Common utilities and shared types for shutter.
//!
//! This crate provides foundational components used across all shutter crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: short random alphanumeric identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use shutter_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::with_length(config.identifiers.length);
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, IdSource, RandomIdSource};
