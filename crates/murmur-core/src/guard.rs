#![forbid(unsafe_code)]

//! Argument guards.
//!
//! Every guard takes the argument by value together with its name, checks a
//! single predicate, and either returns the argument unchanged or an
//! [`ArgumentError`]. Guards hold no state, so they chain naturally with `?`:
//!
//! ```rust
//! use murmur_core::guard::{ensure_ge, ensure_not_blank};
//!
//! fn open(name: &str, retries: i32) -> Result<(), murmur_core::ArgumentError> {
//!     let name = ensure_not_blank(name, "name")?;
//!     let retries = ensure_ge(retries, "retries", 0)?;
//!     assert!(!name.is_empty() && retries >= 0);
//!     Ok(())
//! }
//!
//! assert!(open("primary", 3).is_ok());
//! assert!(open("   ", 3).is_err());
//! assert!(open("primary", -1).is_err());
//! ```
//!
//! # Failure Modes
//!
//! - Equality and membership guards fail with [`ArgumentError::Invalid`].
//! - Presence and emptiness guards fail with [`ArgumentError::Missing`].
//! - Ordering guards fail with [`ArgumentError::OutOfRange`], which also
//!   records the rejected value.

use std::fmt::Display;

/// Error returned by a failed guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// The argument has a value that is not acceptable.
    #[error("invalid argument `{name}`: {details}")]
    Invalid {
        /// Name of the offending argument.
        name: &'static str,
        /// Human-readable explanation.
        details: String,
    },
    /// The argument is absent or empty.
    #[error("missing argument `{name}`: {details}")]
    Missing {
        /// Name of the offending argument.
        name: &'static str,
        /// Human-readable explanation.
        details: String,
    },
    /// The argument falls outside an accepted range.
    #[error("argument `{name}` out of range ({value}): {details}")]
    OutOfRange {
        /// Name of the offending argument.
        name: &'static str,
        /// The rejected value, rendered with `Display`.
        value: String,
        /// Human-readable explanation.
        details: String,
    },
}

impl ArgumentError {
    /// Name of the argument that failed validation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invalid { name, .. }
            | Self::Missing { name, .. }
            | Self::OutOfRange { name, .. } => *name,
        }
    }

    /// Replace the generated explanation with a caller-supplied one.
    #[must_use]
    pub fn with_details(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Invalid { details, .. }
            | Self::Missing { details, .. }
            | Self::OutOfRange { details, .. } => *details = text.into(),
        }
        self
    }

    fn out_of_range(name: &'static str, value: &impl Display, details: String) -> Self {
        Self::OutOfRange {
            name,
            value: value.to_string(),
            details,
        }
    }
}

/// Require `argument == expected`.
pub fn ensure_eq<T>(argument: T, name: &'static str, expected: &T) -> Result<T, ArgumentError>
where
    T: PartialEq + Display,
{
    if argument != *expected {
        return Err(ArgumentError::Invalid {
            name,
            details: format!("the value of {argument} is not equal to the value of {expected}"),
        });
    }
    Ok(argument)
}

/// Require `argument != rejected`.
pub fn ensure_ne<T>(argument: T, name: &'static str, rejected: &T) -> Result<T, ArgumentError>
where
    T: PartialEq + Display,
{
    if argument == *rejected {
        return Err(ArgumentError::Invalid {
            name,
            details: format!("the value of {argument} is equal to the value of {rejected}"),
        });
    }
    Ok(argument)
}

/// Require `argument` to equal at least one of `allowed`.
///
/// An empty `allowed` list rejects every argument.
pub fn ensure_one_of<T>(argument: T, name: &'static str, allowed: &[T]) -> Result<T, ArgumentError>
where
    T: PartialEq + Display,
{
    if allowed.contains(&argument) {
        return Ok(argument);
    }
    Err(ArgumentError::Invalid {
        name,
        details: format!(
            "the value of {argument} is not equal to one of the expected values in '{}'",
            join(allowed)
        ),
    })
}

/// Require `argument` to differ from every entry of `rejected`.
pub fn ensure_none_of<T>(
    argument: T,
    name: &'static str,
    rejected: &[T],
) -> Result<T, ArgumentError>
where
    T: PartialEq + Display,
{
    if rejected.contains(&argument) {
        return Err(ArgumentError::Invalid {
            name,
            details: format!(
                "the value of {argument} is equal to one of the values in '{}'",
                join(rejected)
            ),
        });
    }
    Ok(argument)
}

/// Require a value to be present, unwrapping it.
pub fn ensure_present<T>(argument: Option<T>, name: &'static str) -> Result<T, ArgumentError> {
    argument.ok_or(ArgumentError::Missing {
        name,
        details: "the argument cannot be absent".to_owned(),
    })
}

/// Require a non-empty string.
pub fn ensure_not_empty<'a>(argument: &'a str, name: &'static str) -> Result<&'a str, ArgumentError> {
    if argument.is_empty() {
        return Err(ArgumentError::Missing {
            name,
            details: "the string argument cannot be empty".to_owned(),
        });
    }
    Ok(argument)
}

/// Require a string with at least one non-whitespace character.
pub fn ensure_not_blank<'a>(argument: &'a str, name: &'static str) -> Result<&'a str, ArgumentError> {
    if argument.trim().is_empty() {
        return Err(ArgumentError::Missing {
            name,
            details: "the string argument cannot be empty or consist only of white-space characters"
                .to_owned(),
        });
    }
    Ok(argument)
}

/// Require `argument > bound`.
pub fn ensure_gt<T>(argument: T, name: &'static str, bound: T) -> Result<T, ArgumentError>
where
    T: PartialOrd + Display,
{
    if argument > bound {
        return Ok(argument);
    }
    Err(ArgumentError::out_of_range(
        name,
        &argument,
        format!("must be greater than {bound}"),
    ))
}

/// Require `argument < bound`.
pub fn ensure_lt<T>(argument: T, name: &'static str, bound: T) -> Result<T, ArgumentError>
where
    T: PartialOrd + Display,
{
    if argument < bound {
        return Ok(argument);
    }
    Err(ArgumentError::out_of_range(
        name,
        &argument,
        format!("must be less than {bound}"),
    ))
}

/// Require `argument >= bound`.
pub fn ensure_ge<T>(argument: T, name: &'static str, bound: T) -> Result<T, ArgumentError>
where
    T: PartialOrd + Display,
{
    if argument >= bound {
        return Ok(argument);
    }
    Err(ArgumentError::out_of_range(
        name,
        &argument,
        format!("must be greater than or equal to {bound}"),
    ))
}

/// Require `argument <= bound`.
pub fn ensure_le<T>(argument: T, name: &'static str, bound: T) -> Result<T, ArgumentError>
where
    T: PartialOrd + Display,
{
    if argument <= bound {
        return Ok(argument);
    }
    Err(ArgumentError::out_of_range(
        name,
        &argument,
        format!("must be less than or equal to {bound}"),
    ))
}

/// Require `lower <= argument <= upper` (inclusive on both ends).
pub fn ensure_in_range<T>(
    argument: T,
    name: &'static str,
    lower: T,
    upper: T,
) -> Result<T, ArgumentError>
where
    T: PartialOrd + Display,
{
    if argument >= lower && argument <= upper {
        return Ok(argument);
    }
    Err(ArgumentError::out_of_range(
        name,
        &argument,
        format!("must be in range {lower} to {upper}"),
    ))
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
