//! Position, range and span primitives shared by the hcl-lang crates.
//!
//! This crate is the lowest leaf of the stack: byte
//! spans for use inside a single parsed file, plus line/column
//! positions and filename-qualified ranges for anything that crosses a
//! file boundary (candidates, hover data, diagnostics).

mod span;

pub use span::{LineIndex, Position, Range, Span};
