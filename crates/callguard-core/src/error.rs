//! Core error types for callguard-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the value model (currently only JSON export).

use thiserror::Error;

/// Core errors produced by the callguard-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The value has no JSON counterpart (blocks, class instances with
    /// callable fields, ...).
    #[error("value of type {type_name} has no JSON representation")]
    NotRepresentable { type_name: String },

    /// NaN and infinities cannot be written as JSON numbers.
    #[error("non-finite float {value} has no JSON representation")]
    NonFiniteFloat { value: f64 },
}
