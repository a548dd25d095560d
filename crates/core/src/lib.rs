// Core types shared by the engine and the front ends

pub mod selection;

pub use selection::{CellRef, Range, Selection};
