//! Completion candidates and the text-edit surface they carry
//!.

use hcl_lang_pos::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Attribute,
    Block,
    Label,
    Bool,
    Number,
    String,
    List,
    Set,
    Tuple,
    Map,
    Object,
    Keyword,
    Reference,
    Function,
    Traversal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub range: Range,
    /// Plain replacement text, with no placeholders.
    pub new_text: String,
    /// Placeholder-aware text using `${N}`/`${N:default}` with
    /// sequential `N`; `None` when the candidate has no richer
    /// snippet than `new_text`.
    pub snippet: Option<String>,
}

impl TextEdit {
    pub fn plain(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(range: Range, new_text: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
            snippet: Some(snippet.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CandidateKind,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub text_edit: TextEdit,
    /// Hint to re-invoke completion right after insertion, e.g. `foo = `
    /// where a value is expected next.
    pub trigger_suggest: bool,
    /// Overrides `label` for sort ordering when set.
    pub sort_text: Option<String>,
    /// Name of a resolve-time enrichment hook, if the caller supports
    /// lazy resolution of documentation/detail.
    pub resolve_hook: Option<String>,
}

impl Candidate {
    pub fn new(label: impl Into<String>, kind: CandidateKind, text_edit: TextEdit) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            description: None,
            is_deprecated: false,
            text_edit,
            trigger_suggest: false,
            sort_text: None,
            resolve_hook: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.is_deprecated = true;
        self
    }

    pub fn triggering_suggest(mut self) -> Self {
        self.trigger_suggest = true;
        self
    }

    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    /// The key used by the default sort: `sort_text` when
    /// present, else `label`, both case-insensitively.
    fn sort_key(&self) -> String {
        self.sort_text
            .as_deref()
            .unwrap_or(&self.label)
            .to_lowercase()
    }
}

/// Sort candidates by `sort_text` (falling back to `label`), case
/// insensitively, breaking ties by label so the order is fully
/// deterministic.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.label.cmp(&b.label)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::Position;

    fn candidate(label: &str, sort_text: Option<&str>) -> Candidate {
        let range = Range::empty("f.hcl", Position::new(1, 1, 0));
        let mut c = Candidate::new(label, CandidateKind::Bool, TextEdit::plain(range, label));
        if let Some(s) = sort_text {
            c = c.with_sort_text(s);
        }
        c
    }

    #[test]
    fn sorts_case_insensitively_by_label_when_no_sort_text() {
        let mut cands = vec![candidate("True", None), candidate("false", None)];
        sort_candidates(&mut cands);
        assert_eq!(cands[0].label, "false");
        assert_eq!(cands[1].label, "True");
    }

    #[test]
    fn sort_text_overrides_label() {
        let mut cands = vec![candidate("zzz", Some("a")), candidate("aaa", Some("b"))];
        sort_candidates(&mut cands);
        assert_eq!(cands[0].label, "zzz");
    }
}
