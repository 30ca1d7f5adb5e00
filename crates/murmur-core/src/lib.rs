#![forbid(unsafe_code)]

//! Shared primitives for Murmur.
//!
//! This crate provides:
//! - [`guard`] functions that validate an argument and hand it back, or fail
//!   with an [`ArgumentError`] naming the argument.

pub mod guard;

pub use guard::{
    ArgumentError, ensure_eq, ensure_ge, ensure_gt, ensure_in_range, ensure_le, ensure_lt,
    ensure_ne, ensure_none_of, ensure_not_blank, ensure_not_empty, ensure_one_of, ensure_present,
};
