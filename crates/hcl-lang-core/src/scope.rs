//! The read-only slice of [`PathContext`](crate::path_context::PathContext)
//! handlers need: known reference targets and known functions. Handlers
//! borrow this; they never see the rest of the path context.

use crate::path_context::FunctionSignature;
use crate::target::Target;

#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub targets: &'a [Target],
    pub functions: &'a [&'a FunctionSignature],
}

impl<'a> Scope<'a> {
    pub fn empty() -> Self {
        Self {
            targets: &[],
            functions: &[],
        }
    }
}
