//! CLI Exit Code Registry
//!
//! Every exit code `booklist` can return is defined here. Scripts that wrap
//! the tool rely on them, so codes are never reused for a different meaning.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | Usage error (bad arguments, refusing to overwrite)  |
//! | 3    | File could not be opened, read or written           |
//! | 4    | Script error (unknown command, index out of range)  |
//! | 5    | Validation error (rejected pages value)             |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, existing output without `--force`.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - a book list or script file could not be opened, read or written.
pub const EXIT_IO: u8 = 3;

/// Script error - a script line failed to parse or addressed a missing cell.
pub const EXIT_SCRIPT: u8 = 4;

/// Validation error - a pages entry was not a whole number in range.
pub const EXIT_VALIDATION: u8 = 5;

/// Human-readable name for an exit code (for `--help` and logs).
pub fn exit_code_name(code: u8) -> &'static str {
    match code {
        EXIT_SUCCESS => "success",
        EXIT_ERROR => "error",
        EXIT_USAGE => "usage",
        EXIT_IO => "io",
        EXIT_SCRIPT => "script",
        EXIT_VALIDATION => "validation",
        _ => "unknown",
    }
}
