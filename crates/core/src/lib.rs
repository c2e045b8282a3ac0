//! Core business logic for shutter.
//!
//! Services enforce the social-graph rules on top of the repositories in `shutter-db`:
//! who may follow or ban whom, who may delete what, and which photos and users a
//! given viewer gets to see.

pub mod services;

pub use services::*;
