//! Shared helper functionality
pub mod errors;
