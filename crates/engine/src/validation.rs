//! Input gate for the pages column.
//!
//! Entry through the editing UI is restricted to whole numbers in
//! `[PAGES_MIN, PAGES_MAX]`. The table store does not re-check: programmatic
//! writes (paste, undo, file load) may still put any text in that column.

use std::fmt;

pub use crate::table::PAGES_COLUMN;

pub const PAGES_MIN: u32 = 1;
pub const PAGES_MAX: u32 = 1_000_000_000;

/// Why a pages entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesError {
    /// Input is empty (after trimming whitespace).
    Empty,
    /// Input contains invalid characters or format.
    InvalidFormat,
    /// Input has a fractional part; a whole number is required.
    FractionalNotAllowed,
    /// A whole number outside the allowed bounds.
    OutOfRange,
}

impl fmt::Display for PagesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagesError::Empty => write!(f, "Value is empty"),
            PagesError::InvalidFormat => write!(f, "Value is not a valid number"),
            PagesError::FractionalNotAllowed => write!(f, "Whole number required (no decimals)"),
            PagesError::OutOfRange => {
                write!(f, "Page count must be between {} and {}", PAGES_MIN, PAGES_MAX)
            }
        }
    }
}

impl std::error::Error for PagesError {}

/// Parse user input for the pages column.
///
/// # Rules
/// - Whitespace is trimmed
/// - Leading `+` is allowed
/// - Any decimal point is rejected (including `3.0` and `3.`)
/// - The value must lie in `[PAGES_MIN, PAGES_MAX]`
///
/// # Examples
/// ```
/// use booklist_engine::validation::{validate_pages, PagesError};
///
/// assert_eq!(validate_pages(" 412 "), Ok(412));
/// assert_eq!(validate_pages("+7"), Ok(7));
/// assert_eq!(validate_pages("0"), Err(PagesError::OutOfRange));
/// assert_eq!(validate_pages("3.0"), Err(PagesError::FractionalNotAllowed));
/// ```
pub fn validate_pages(value: &str) -> Result<u32, PagesError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(PagesError::Empty);
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'+' => (false, &trimmed[1..]),
        b'-' => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() {
        return Err(PagesError::InvalidFormat);
    }
    if digits.contains('.') {
        return Err(PagesError::FractionalNotAllowed);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PagesError::InvalidFormat);
    }
    if negative {
        return Err(PagesError::OutOfRange);
    }

    // All digits: a parse failure can only mean overflow.
    let n: u64 = digits.parse().map_err(|_| PagesError::OutOfRange)?;
    if n < PAGES_MIN as u64 || n > PAGES_MAX as u64 {
        return Err(PagesError::OutOfRange);
    }
    Ok(n as u32)
}
