//! Request context: everything a feature
//! operation needs to know about a single call, bundled into one
//! explicit struct rather than threaded through process-wide state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hcl_lang_pos::Position;

/// A cancellation signal shared between the caller and the in-flight
/// operation. Handlers poll it at coarse boundaries (per attribute, per
/// block, per list element) and return whatever partial results they
/// have accumulated rather than blocking.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub pos: Position,
    pub max_candidates: Option<usize>,
    pub prefill_required_fields: bool,
    pub active_self_refs: bool,
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn at(pos: Position) -> Self {
        Self {
            pos,
            max_candidates: None,
            prefill_required_fields: false,
            active_self_refs: true,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_prefill(mut self, prefill: bool) -> Self {
        self.prefill_required_fields = prefill;
        self
    }

    pub fn with_active_self_refs(mut self, active: bool) -> Self {
        self.active_self_refs = active;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
