//! Constraint/expression dispatch engine for a schema-driven semantic
//! analyzer of a declarative configuration language (blocks, labels,
//! attributes, nested blocks; literals, templates, references,
//! conditionals, function calls, index/traversal, object/tuple/map
//! constructors).
//!
//! This crate implements the five uniform feature operations —
//! completion, hover, semantic tokens, validation, and reference
//! target/origin collection — over every (expression, constraint) pair,
//! dispatched by an explicit match on the constraint's variant (see
//! [`handlers`]). [`path_context::PathContext`] is the public entry
//! point: one instance per analyzed file tree.

pub mod builtins;
pub mod candidate;
pub mod diagnostic;
mod doc;
mod handlers;
pub mod hover;
pub mod path_context;
pub mod prefill;
pub mod request;
mod scope;
pub mod semantic_token;
pub mod target;
mod targets;
mod validate;
mod walker;

pub use candidate::{sort_candidates, Candidate, CandidateKind, TextEdit};
pub use diagnostic::{Diagnostic, Severity};
pub use hover::{HoverData, Markup};
pub use path_context::{FunctionSignature, ParsedFile, PathContext};
pub use request::{CancellationToken, RequestContext};
pub use semantic_token::{sort_tokens, SemanticToken, TokenModifier, TokenType};
pub use target::{sort_origins, sort_targets, Origin, Target, TargetContext};

use std::collections::BTreeMap;

use hcl_lang_pos::Position;
use scope::Scope;

/// A write-only attribute found on a `resource` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOnlyAttribute {
    pub name: String,
    pub owner_resource_label: String,
}

/// A lens offered above a piece of syntax, e.g. "show state" above a
/// `resource` block header. `code_lenses` runs every registered
/// callback and concatenates their output; a callback that finds
/// nothing just contributes no lenses.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeLens {
    pub range: hcl_lang_pos::Range,
    pub title: String,
    pub command: Option<String>,
}

pub type LensFn = fn(&ParsedFile) -> Vec<CodeLens>;

/// Error returned by a public operation: every failure mode
/// is a known, named condition rather than a generic string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    UnknownFile(String),
    NoSchema,
}

impl std::fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFile(name) => write!(f, "file {name:?} is not known to this path"),
            Self::NoSchema => write!(f, "no schema is loaded for this path"),
        }
    }
}

impl std::error::Error for AnalyzerError {}

fn scope_of<'a>(targets: &'a [Target], functions: &'a BTreeMap<String, FunctionSignature>, refs: &'a mut Vec<&'a FunctionSignature>) -> Scope<'a> {
    refs.extend(functions.values());
    Scope {
        targets,
        functions: refs,
    }
}

impl PathContext {
    /// `completion_at(file, pos) -> Candidates`.
    pub fn completion_at(&self, file: &str, pos: Position, ctx: &RequestContext) -> Result<Vec<Candidate>, AnalyzerError> {
        let parsed = self.file(file).ok_or_else(|| AnalyzerError::UnknownFile(file.to_string()))?;
        let schema = self.schema.as_ref().ok_or(AnalyzerError::NoSchema)?;
        let doc = doc::Doc::new(file, &parsed.source, &parsed.line_index);
        let mut refs = Vec::new();
        let scope = scope_of(&self.targets, &self.functions, &mut refs);
        let mut candidates = walker::completion_at_body(doc, &parsed.body, schema, scope, ctx);
        if let Some(max) = ctx.max_candidates {
            candidates.truncate(max);
        }
        sort_candidates(&mut candidates);
        Ok(candidates)
    }

    /// `hover_at(file, pos) -> Option<HoverData>`.
    pub fn hover_at(&self, file: &str, pos: Position) -> Result<Option<HoverData>, AnalyzerError> {
        let parsed = self.file(file).ok_or_else(|| AnalyzerError::UnknownFile(file.to_string()))?;
        let schema = self.schema.as_ref().ok_or(AnalyzerError::NoSchema)?;
        let doc = doc::Doc::new(file, &parsed.source, &parsed.line_index);
        let ctx = RequestContext::at(pos);
        let mut refs = Vec::new();
        let scope = scope_of(&self.targets, &self.functions, &mut refs);
        Ok(walker::hover_at_body(doc, &parsed.body, schema, scope, &ctx))
    }

    /// `semantic_tokens(file) -> [SemanticToken]`, sorted by start byte.
    pub fn semantic_tokens(&self, file: &str) -> Result<Vec<SemanticToken>, AnalyzerError> {
        let parsed = self.file(file).ok_or_else(|| AnalyzerError::UnknownFile(file.to_string()))?;
        let schema = self.schema.as_ref().ok_or(AnalyzerError::NoSchema)?;
        let doc = doc::Doc::new(file, &parsed.source, &parsed.line_index);
        let mut refs = Vec::new();
        let scope = scope_of(&self.targets, &self.functions, &mut refs);
        let mut tokens = walker::semantic_tokens_body(doc, &parsed.body, schema, scope);
        sort_tokens(&mut tokens);
        Ok(tokens)
    }

    /// `validate() -> map<file, [Diagnostic]>` over every file in the path.
    pub fn validate(&self) -> Result<BTreeMap<String, Vec<Diagnostic>>, AnalyzerError> {
        let schema = self.schema.as_ref().ok_or(AnalyzerError::NoSchema)?;
        Ok(self
            .files
            .iter()
            .map(|(name, parsed)| {
                let doc = doc::Doc::new(name, &parsed.source, &parsed.line_index);
                (name.clone(), validate::validate_body(doc, &parsed.body, schema))
            })
            .collect())
    }

    /// Rebuilds the reference target/origin collections from the
    /// current schema and files. Targets/origins are "built once per
    /// schema-load cycle and atomically swapped"; callers invoke
    /// this after constructing the path or after a schema/file reload.
    pub fn reload_references(&mut self) {
        let Some(schema) = self.schema.clone() else {
            return;
        };
        let mut targets = Vec::new();
        let mut origins = Vec::new();
        for (name, parsed) in &self.files {
            let doc = doc::Doc::new(name, &parsed.source, &parsed.line_index);
            targets.extend(targets::collect_targets(doc, &parsed.body, &schema, &TargetContext::root()));
        }
        for (name, parsed) in &self.files {
            let doc = doc::Doc::new(name, &parsed.source, &parsed.line_index);
            let mut refs = Vec::new();
            let scope = scope_of(&targets, &self.functions, &mut refs);
            origins.extend(targets::collect_origins(doc, &parsed.body, &schema, scope));
        }
        sort_targets(&mut targets);
        sort_origins(&mut origins);
        self.targets = targets;
        self.origins = origins;
    }

    /// `collect_reference_targets() -> [Target]`.
    pub fn collect_reference_targets(&self) -> &[Target] {
        &self.targets
    }

    /// `collect_reference_origins() -> [Origin]`.
    pub fn collect_reference_origins(&self) -> &[Origin] {
        &self.origins
    }

    /// `collect_write_only_attributes() -> [{name, owner_resource_label}]`
    /// — scans `resource` blocks only.
    pub fn collect_write_only_attributes(&self) -> Result<Vec<WriteOnlyAttribute>, AnalyzerError> {
        let schema = self.schema.as_ref().ok_or(AnalyzerError::NoSchema)?;
        let Some(resource_schema) = schema.blocks.get("resource") else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for parsed in self.files.values() {
            for block in parsed.body.blocks() {
                if block.block_type != "resource" {
                    continue;
                }
                let Some(owner_label) = block.labels.last().map(|l| l.value.clone()) else {
                    continue;
                };
                let effective = walker::merged_schema(resource_schema, block);
                for (name, attr) in &effective.attributes {
                    if attr.is_write_only {
                        out.push(WriteOnlyAttribute {
                            name: name.clone(),
                            owner_resource_label: owner_label.clone(),
                        });
                    }
                }
            }
        }
        Ok(out)
    }

    /// `code_lenses(file) -> [CodeLens]` — executes every registered
    /// lens callback in declared order; a callback panicking does not
    /// prevent the next from running.
    pub fn code_lenses(&self, file: &str, lenses: &[LensFn]) -> Result<Vec<CodeLens>, AnalyzerError> {
        let parsed = self.file(file).ok_or_else(|| AnalyzerError::UnknownFile(file.to_string()))?;
        Ok(lenses
            .iter()
            .filter_map(|lens| std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| lens(parsed))).ok())
            .flatten()
            .collect())
    }
}
