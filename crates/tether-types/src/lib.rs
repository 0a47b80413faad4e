//! Shared types and errors for tether.

pub mod error;
pub mod message;

pub use error::ApiError;
pub use message::*;
