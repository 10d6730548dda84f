//! Reference targets and origins.

use hcl_lang_pos::Range;
use hcl_lang_schema::{Address, Type};

/// An addressable value the document publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub address: Address,
    pub friendly_name: Option<String>,
    pub scope_id: Option<String>,
    pub ty: Option<Type>,
    /// Range of the declaring name (attribute name, block labels, ...).
    pub range: Range,
    /// Range of the value/body this target addresses.
    pub body_range: Range,
    pub nested_targets: Vec<Target>,
}

/// A traversal that is intended to resolve to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub range: Range,
    /// Candidate type constraints this origin could satisfy: the union
    /// of `OneOf` alternatives, or the enclosing `of_type`.
    pub constraints: Vec<Type>,
}

/// Accumulator threaded down during target collection. Carries
/// enough context to let a leaf attribute emit a fully-resolved
/// [`Address`] without re-walking its ancestors.
#[derive(Debug, Clone)]
pub struct TargetContext {
    pub address: Address,
    pub local_address: Address,
    pub friendly_name: Option<String>,
    pub scope_id: Option<String>,
    pub as_expr_type: bool,
    pub as_reference: bool,
}

impl TargetContext {
    pub fn root() -> Self {
        Self {
            address: Address::default(),
            local_address: Address::default(),
            friendly_name: None,
            scope_id: None,
            as_expr_type: false,
            as_reference: true,
        }
    }

    pub fn descend(&self, step: hcl_lang_schema::AddressStep) -> Self {
        let mut next = self.clone();
        next.address = self.address.with_step(step.clone());
        next.local_address = self.local_address.with_step(step);
        next
    }
}

pub fn sort_targets(targets: &mut [Target]) {
    targets.sort_by_key(|t| t.range.start.byte);
}

pub fn sort_origins(origins: &mut [Origin]) {
    origins.sort_by_key(|o| o.range.start.byte);
}
