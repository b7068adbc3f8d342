//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{Currency, Money, from_minor_units, to_minor_units};
