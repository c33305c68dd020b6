//! Diversity-constrained selection of the final exercise set.
//!
//! A greedy pass over the score-sorted pool prefers candidates that bring a
//! new exercise kind or unseen intended effects; same-cluster candidates are
//! still admitted while the selection is short, provided their score holds
//! up against the top candidate. Shortfalls are backfilled in score order
//! and the result is deduplicated by name. Under-fill is accepted, never an
//! error.

use crate::types::ScoredCandidate;
use std::collections::HashSet;

/// Target plan size for a severity when the caller does not override it
///
/// Severe pain (8+) gets a smaller, safer set.
pub fn target_count(severity: u8) -> usize {
    if severity >= 8 {
        3
    } else {
        4
    }
}

/// Greedily pick a diverse subset of at most `target` candidates
///
/// `filtered` must already be sorted by score descending (the safety filter
/// guarantees this); its head is the reference score for the ratio gate.
pub fn select_diverse<'a>(
    filtered: &[ScoredCandidate<'a>],
    target: usize,
    backfill_ratio: f64,
) -> Vec<ScoredCandidate<'a>> {
    let mut selected: Vec<ScoredCandidate<'a>> = Vec::new();
    let mut selected_idx: HashSet<usize> = HashSet::new();
    let mut kinds_seen = HashSet::new();
    let mut effects_seen: HashSet<&str> = HashSet::new();

    for (idx, item) in filtered.iter().enumerate() {
        if selected.len() >= target {
            break;
        }

        let ex = item.exercise;
        if selected.is_empty() {
            selected.push(*item);
            selected_idx.insert(idx);
            kinds_seen.insert(ex.kind);
            effects_seen.extend(ex.intended_effects.iter().map(String::as_str));
            continue;
        }

        let new_kind = !kinds_seen.contains(&ex.kind);
        let new_effects = ex
            .intended_effects
            .iter()
            .all(|e| !effects_seen.contains(e.as_str()));

        if new_kind || new_effects {
            selected.push(*item);
            selected_idx.insert(idx);
            kinds_seen.insert(ex.kind);
            effects_seen.extend(ex.intended_effects.iter().map(String::as_str));
        } else if item.raw_score >= filtered[0].raw_score * backfill_ratio {
            // same cluster, but the score holds up and we are still short
            selected.push(*item);
            selected_idx.insert(idx);
        }
    }

    // backfill with the next-highest scorers regardless of diversity
    let mut idx = 0;
    while selected.len() < target && idx < filtered.len() {
        if selected_idx.insert(idx) {
            selected.push(filtered[idx]);
        }
        idx += 1;
    }

    // final name dedup, first occurrence wins; may leave the result short
    let mut seen_names = HashSet::new();
    selected.retain(|c| seen_names.insert(c.exercise.name_key()));

    selected
}
