//! Target addressing: the sequence of steps that makes a value
//! reachable from outside the document that declares it.

/// One step of a [`Address`]. Equality is structural so addresses can
/// be compared for equality during cyclical self-reference filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressStep {
    /// The root segment, usually the block type (`resource`).
    Root { name: String },
    /// A named attribute step.
    Attr { name: String },
    /// An indexed step, e.g. into a list-typed attribute.
    Index { key: String },
    /// A label-derived step, identified by the label's position.
    Label { index: usize },
    /// A fixed literal step contributed by the schema itself (not
    /// derived from the document), e.g. the `self` prefix.
    Static { name: String },
}

/// A fully resolved address: how a target or a self-reference is
/// addressed from elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Address {
    pub steps: Vec<AddressStep>,
}

impl Address {
    pub fn new(steps: Vec<AddressStep>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: AddressStep) {
        self.steps.push(step);
    }

    pub fn with_step(&self, step: AddressStep) -> Address {
        let mut steps = self.steps.clone();
        steps.push(step);
        Address { steps }
    }

    /// Render as a dotted friendly string, e.g. `resource.aws_instance.x.cpu_count`.
    pub fn to_friendly_string(&self) -> String {
        self.steps
            .iter()
            .map(|step| match step {
                AddressStep::Root { name } => name.clone(),
                AddressStep::Attr { name } => name.clone(),
                AddressStep::Static { name } => name.clone(),
                AddressStep::Index { key } => format!("[{key}]"),
                AddressStep::Label { index } => format!("<label{index}>"),
            })
            .collect::<Vec<_>>()
            .join(".")
            .replace(".[", "[")
    }
}

/// Declares how an attribute or block becomes addressable from
/// elsewhere, and/or (for blocks whose body enables self-refs) how its
/// own body may refer back to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSchema {
    /// Static leading steps contributed by the schema (e.g. the block
    /// type name, or literal segments for built-ins).
    pub steps: Vec<AddressStep>,
    /// Expose the target under its typed value, threading the declared
    /// type through the constraint and appending an `Index` step per
    /// addressable element, in addition to the plain reference.
    pub as_expr_type: bool,
    /// Expose the target as an untyped reference (`AsReference`).
    pub as_reference: bool,
    /// When set, the block's body may additionally be reached through
    /// `self.<name>` from within its own body range.
    pub self_ref: bool,
}

impl Default for AddressSchema {
    /// An address that is addressable is, by default, exposed as a
    /// plain untyped reference; typed/indexed exposure is opt-in.
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            as_expr_type: false,
            as_reference: true,
            self_ref: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_string_joins_steps() {
        let addr = Address::new(vec![
            AddressStep::Root {
                name: "resource".into(),
            },
            AddressStep::Static {
                name: "aws_instance".into(),
            },
            AddressStep::Label { index: 1 },
            AddressStep::Attr {
                name: "cpu_count".into(),
            },
        ]);
        assert_eq!(
            addr.to_friendly_string(),
            "resource.aws_instance.<label1>.cpu_count"
        );
    }
}
