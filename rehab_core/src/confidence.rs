//! Confidence estimation and rationale assembly.
//!
//! Confidence blends the candidate's score, normalized against the filtered
//! pool, with a dataset-coverage factor for the injury area. Rationale is an
//! ordered list of human-readable strings explaining why an exercise was
//! picked (and any caveats).

use crate::knowledge::EffectPreference;
use crate::scoring;
use crate::types::{ExerciseDefinition, PainType, ScoredCandidate};
use crate::Catalog;

/// Round to 3 decimal places for presentation
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Score range of the filtered pool plus catalog coverage for the area
#[derive(Clone, Copy, Debug)]
pub struct PoolStats {
    min_score: f64,
    max_score: f64,
    same_area_count: usize,
}

impl PoolStats {
    /// Derive stats from the filtered (pre-selection) pool
    pub fn from_filtered(filtered: &[ScoredCandidate<'_>], catalog: &Catalog, area: &str) -> Self {
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;
        for candidate in filtered {
            min_score = min_score.min(candidate.raw_score);
            max_score = max_score.max(candidate.raw_score);
        }
        Self {
            min_score,
            max_score,
            same_area_count: catalog.area_count(area),
        }
    }

    /// Normalize a raw score into [0, 1] against the pool range
    ///
    /// A degenerate pool (max == min) normalizes to 1.0 uniformly.
    fn normalize(&self, raw: f64) -> f64 {
        if self.max_score > self.min_score {
            (raw - self.min_score) / (self.max_score - self.min_score)
        } else {
            1.0
        }
    }
}

/// Blend normalized score and dataset coverage into a bounded confidence
///
/// More catalog entries for the area raise the coverage factor, saturating
/// at 20 entries. The result is always within [0, 1].
pub fn confidence(raw_score: f64, stats: &PoolStats) -> f64 {
    let normalized = stats.normalize(raw_score);
    let dataset_factor = (0.5 + stats.same_area_count as f64 / 20.0).min(1.0);
    round3(0.7 * normalized + 0.3 * dataset_factor)
}

/// Assemble the ordered rationale strings for one recommendation
pub fn rationale(
    ex: &ExerciseDefinition,
    injury_area: &str,
    pain_type: PainType,
    prefs: Option<&EffectPreference>,
) -> Vec<String> {
    let mut parts = Vec::new();

    if ex.target_area == injury_area {
        parts.push("Targets reported injury area".to_string());
    }

    let compat = scoring::pain_type_compat(ex, prefs);
    if compat > 0.0 {
        parts.push(format!("Matches pain-type preferences ({pain_type})"));
    } else if compat < 0.0 {
        parts.push(format!("Some effects not ideal for pain-type ({pain_type})"));
    }

    if !ex.progressions.is_empty() {
        parts.push("Has clear progression(s)".to_string());
    }
    if !ex.intended_effects.is_empty() {
        parts.push(format!(
            "Intended effects: {}",
            ex.intended_effects.join(",")
        ));
    }
    if !ex.contraindications.is_empty() {
        parts.push(format!(
            "Contraindications: {}",
            ex.contraindications.join(",")
        ));
    }

    parts
}
