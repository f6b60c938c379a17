//! Types, errors and traits shared across the crate

pub mod cancel;
pub mod errors;
pub mod traits;
pub mod types;
