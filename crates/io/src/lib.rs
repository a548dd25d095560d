// File I/O operations

pub mod error;
pub mod tsv;

pub use error::IoError;
