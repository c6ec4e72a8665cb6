//! Core types for the Seller Panel.
//!
//! This module provides type-safe wrappers for common marketplace concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{PriceError, PriceInCents};
pub use status::*;
