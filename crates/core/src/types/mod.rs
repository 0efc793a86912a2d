//! Core types for Almacén.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod status;

pub use id::*;
pub use quantity::Quantity;
pub use status::RequestStatus;
