use super::ScoredCandidate;
use crate::constants::PROMOTIONAL_WINDOW;
use crate::intent::Intent;

/// Stable sort by `final_score` descending. Ties keep retrieval order.
pub fn sort_by_final_score(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}

/// Stable re-sort of the leading window by discount rate descending.
///
/// Shorter lists than the window keep their `final_score` order. Candidates
/// past the window keep their order. Idempotent.
pub fn promote_discounts(candidates: &mut [ScoredCandidate]) {
    if candidates.len() < PROMOTIONAL_WINDOW {
        return;
    }
    candidates[..PROMOTIONAL_WINDOW].sort_by(|a, b| b.candidate.discount_rate().cmp(&a.candidate.discount_rate()));
}

/// Applies the ordering `intent` calls for.
pub fn order_for_intent(candidates: &mut [ScoredCandidate], intent: Intent) {
    sort_by_final_score(candidates);
    if intent == Intent::Promotional {
        promote_discounts(candidates);
    }
}
