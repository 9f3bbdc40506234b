use super::{DecisionItem, DecisionStatus};
use crate::model::ResolutionMode;

/// Status counts over a list of decision items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecisionRollup {
    pub total: usize,
    pub pending: usize,
    pub answered: usize,
    pub requires_attention: usize,
}

impl DecisionRollup {
    pub fn from_items(items: &[DecisionItem]) -> Self {
        items.iter().fold(Self::default(), |mut rollup, item| {
            rollup.total += 1;
            match item.status {
                DecisionStatus::Pending => rollup.pending += 1,
                DecisionStatus::Answered => rollup.answered += 1,
                DecisionStatus::RequiresAttention => rollup.requires_attention += 1,
            }
            rollup
        })
    }

    /// Whether a session in `mode` may be finalized with these counts.
    ///
    /// Only an initial plan insists that nothing is left pending.
    pub fn can_finalize(&self, mode: ResolutionMode) -> bool {
        !mode.blocks_on_pending() || self.pending == 0
    }
}

pub fn pending_count(items: &[DecisionItem]) -> usize {
    items.iter().filter(|item| item.is_pending()).count()
}

pub fn answered_count(items: &[DecisionItem]) -> usize {
    items.iter().filter(|item| item.is_answered()).count()
}
