//! Body, block and attribute schema descriptors.

use std::collections::BTreeMap;

use crate::address::AddressSchema;
use crate::constraint::Constraint;

/// The expected shape of a body: its attributes, its nested block
/// types, and the body-level extensions (`count`/`for_each`/`dynamic`/
/// self-refs) it opts into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodySchema {
    /// Alphabetical by construction (`BTreeMap`), which both satisfies
    /// the determinism invariant and gives candidate generation
    /// alphabetical order for free.
    pub attributes: BTreeMap<String, AttributeSchema>,
    pub blocks: BTreeMap<String, BlockSchema>,
    /// Fallback schema for attributes not explicitly declared.
    pub any_attribute: Option<Box<AttributeSchema>>,
    pub extensions: Option<Extensions>,
    pub description: Option<String>,
}

impl BodySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attr: AttributeSchema) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: BlockSchema) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions.unwrap_or_default()
    }
}

/// Which body-level extensions a schema opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extensions {
    pub count: bool,
    pub for_each: bool,
    pub dynamic_blocks: bool,
    pub self_refs: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub constraint: Constraint,
    pub is_required: bool,
    pub is_optional: bool,
    pub is_computed: bool,
    pub is_deprecated: bool,
    pub is_write_only: bool,
    pub address: Option<AddressSchema>,
    pub description: Option<String>,
    pub semantic_token_modifiers: Vec<String>,
}

impl AttributeSchema {
    pub fn required(constraint: Constraint) -> Self {
        Self {
            constraint,
            is_required: true,
            is_optional: false,
            is_computed: false,
            is_deprecated: false,
            is_write_only: false,
            address: None,
            description: None,
            semantic_token_modifiers: Vec::new(),
        }
    }

    pub fn optional(constraint: Constraint) -> Self {
        Self {
            constraint,
            is_required: false,
            is_optional: true,
            is_computed: false,
            is_deprecated: false,
            is_write_only: false,
            address: None,
            description: None,
            semantic_token_modifiers: Vec::new(),
        }
    }

    pub fn computed(constraint: Constraint) -> Self {
        Self {
            constraint,
            is_required: false,
            is_optional: true,
            is_computed: true,
            is_deprecated: false,
            is_write_only: false,
            address: None,
            description: None,
            semantic_token_modifiers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.is_deprecated = true;
        self
    }

    pub fn with_address(mut self, address: AddressSchema) -> Self {
        self.address = Some(address);
        self
    }
}

/// One label slot in a block's header.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSchema {
    pub name: String,
    /// Whether this label's value selects a `DependentBody` entry.
    pub is_dep_key: bool,
    /// Whether editors should offer completion candidates for this
    /// label (usually only dep-key labels are).
    pub completable: bool,
}

impl LabelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dep_key: false,
            completable: false,
        }
    }

    pub fn dep_key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dep_key: true,
            completable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockNesting {
    #[default]
    Single,
    List,
    Set,
    Map,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockSchema {
    pub labels: Vec<LabelSchema>,
    pub body: BodySchema,
    /// Keyed by the tuple of label values (in label order) that select
    /// this dependent body, layered onto `body` at merge time.
    pub dependent_body: BTreeMap<Vec<String>, BodySchema>,
    pub nesting: BlockNesting,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub address: Option<AddressSchema>,
    pub is_deprecated: bool,
    pub description: Option<String>,
    pub semantic_token_modifiers: Vec<String>,
}

impl BlockSchema {
    pub fn new(body: BodySchema) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, labels: Vec<LabelSchema>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_dependent_body(
        mut self,
        key: Vec<impl Into<String>>,
        body: BodySchema,
    ) -> Self {
        self.dependent_body
            .insert(key.into_iter().map(Into::into).collect(), body);
        self
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn with_address(mut self, address: AddressSchema) -> Self {
        self.address = Some(address);
        self
    }
}
