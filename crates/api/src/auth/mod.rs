//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation, and mapping of
//!   token claims onto the caller facts used by the access layer.

pub mod jwt;
