//! Clinical knowledge tables driving the recommendation engine.
//!
//! Everything a clinician might want to retune lives here as data: scoring
//! weights, per-pain-type effect preferences, red-flag contraindication
//! tags, the area-adjacency fallback map, and the selection thresholds.
//! The engine receives a [`ClinicalKnowledge`] by reference and never reads
//! globals, so alternative table sets can be injected per deployment.

use crate::types::PainType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cached default knowledge tables - built once and shared by reference
static DEFAULT_KNOWLEDGE: Lazy<ClinicalKnowledge> = Lazy::new(ClinicalKnowledge::default);

/// Get a reference to the cached default clinical knowledge
pub fn default_knowledge() -> &'static ClinicalKnowledge {
    &DEFAULT_KNOWLEDGE
}

/// Weights combining the sub-scores into a composite score
///
/// `contraindication_penalty` is subtracted; everything else is added.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_target_match")]
    pub target_match: f64,

    #[serde(default = "default_pain_type_compat")]
    pub pain_type_compat: f64,

    #[serde(default = "default_pain_level_suitability")]
    pub pain_level_suitability: f64,

    #[serde(default = "default_contraindication_penalty")]
    pub contraindication_penalty: f64,

    #[serde(default = "default_equipment_match")]
    pub equipment_match: f64,

    #[serde(default = "default_intensity_match")]
    pub intensity_match: f64,

    #[serde(default = "default_progression_bonus")]
    pub progression_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            target_match: default_target_match(),
            pain_type_compat: default_pain_type_compat(),
            pain_level_suitability: default_pain_level_suitability(),
            contraindication_penalty: default_contraindication_penalty(),
            equipment_match: default_equipment_match(),
            intensity_match: default_intensity_match(),
            progression_bonus: default_progression_bonus(),
        }
    }
}

/// Intended-effect tags preferred and avoided for one pain type
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectPreference {
    #[serde(default)]
    pub prefer: Vec<String>,

    #[serde(default)]
    pub avoid: Vec<String>,
}

impl EffectPreference {
    fn new(prefer: &[&str], avoid: &[&str]) -> Self {
        Self {
            prefer: prefer.iter().map(|s| (*s).into()).collect(),
            avoid: avoid.iter().map(|s| (*s).into()).collect(),
        }
    }
}

/// The full tunable knowledge set for scoring and selection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClinicalKnowledge {
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Per-pain-type preferred/avoided intended-effect tags
    #[serde(default = "default_pain_type_effects")]
    pub pain_type_effects: HashMap<PainType, EffectPreference>,

    /// Contraindication tags that are unsafe regardless of profile
    #[serde(default = "default_red_flags")]
    pub red_flags: Vec<String>,

    /// Adjacent body regions consulted when an area has no direct entries
    #[serde(default = "default_related_areas")]
    pub related_areas: HashMap<String, Vec<String>>,

    /// Areas used when the injury area is absent from `related_areas`
    #[serde(default = "default_fallback_areas")]
    pub fallback_areas: Vec<String>,

    /// Candidates scoring at or below this are dropped by the safety filter.
    /// The threshold admits mildly unfavorable items but not strongly
    /// contraindicated ones; no clinical calibration beyond that is implied.
    #[serde(default = "default_safety_score_floor")]
    pub safety_score_floor: f64,

    /// A non-diverse candidate is still admitted while the selection is short
    /// if its score is at least this fraction of the top candidate's score.
    #[serde(default = "default_diversity_backfill_ratio")]
    pub diversity_backfill_ratio: f64,
}

impl Default for ClinicalKnowledge {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            pain_type_effects: default_pain_type_effects(),
            red_flags: default_red_flags(),
            related_areas: default_related_areas(),
            fallback_areas: default_fallback_areas(),
            safety_score_floor: default_safety_score_floor(),
            diversity_backfill_ratio: default_diversity_backfill_ratio(),
        }
    }
}

// Default value functions
fn default_target_match() -> f64 {
    3.0
}

fn default_pain_type_compat() -> f64 {
    2.5
}

fn default_pain_level_suitability() -> f64 {
    2.0
}

fn default_contraindication_penalty() -> f64 {
    5.0
}

fn default_equipment_match() -> f64 {
    0.5
}

fn default_intensity_match() -> f64 {
    1.5
}

fn default_progression_bonus() -> f64 {
    0.75
}

fn default_safety_score_floor() -> f64 {
    -1.0
}

fn default_diversity_backfill_ratio() -> f64 {
    0.35
}

fn default_red_flags() -> Vec<String> {
    ["high_load", "impact", "inversion", "spinal_twist_with_load"]
        .iter()
        .map(|s| (*s).into())
        .collect()
}

fn default_pain_type_effects() -> HashMap<PainType, EffectPreference> {
    HashMap::from([
        (
            PainType::Sharp,
            EffectPreference::new(
                &["motor_control", "low_load_strength"],
                &["end_range_load", "high_load"],
            ),
        ),
        (
            PainType::Dull,
            EffectPreference::new(&["mobility", "end_range_control"], &[]),
        ),
        (
            PainType::Throbbing,
            EffectPreference::new(
                &["gentle_isometrics", "graded_movement"],
                &["high_repetition"],
            ),
        ),
        (
            PainType::Burning,
            EffectPreference::new(
                &["neural_gliding", "graded_exposure"],
                &["sustained_compression"],
            ),
        ),
        (
            PainType::Stiffness,
            EffectPreference::new(&["mobilisation", "hold", "end_range_mobility"], &[]),
        ),
        (
            PainType::Aching,
            EffectPreference::new(&["isometrics", "low_load_strength"], &[]),
        ),
        (
            PainType::Radiating,
            EffectPreference::new(
                &["neural_tension_reduction", "stability"],
                &["end_range_spine_loading"],
            ),
        ),
        (
            PainType::Cramping,
            EffectPreference::new(
                &["gentle_lengthening", "neuromuscular_retrain"],
                &["fatiguing_reps"],
            ),
        ),
        (
            PainType::Tingling,
            EffectPreference::new(
                &["neurodynamic", "gentle_isometrics"],
                &["sustained_compression"],
            ),
        ),
    ])
}

fn default_related_areas() -> HashMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 5] = [
        ("wrist", &["forearm", "hand"]),
        ("knee", &["hip", "ankle"]),
        ("shoulder", &["neck", "thoracic"]),
        ("spine/core", &["lumbar", "thoracic", "pelvis"]),
        ("hip", &["knee", "lumbar"]),
    ];
    entries
        .iter()
        .map(|(area, related)| {
            (
                (*area).into(),
                related.iter().map(|s| (*s).into()).collect(),
            )
        })
        .collect()
}

fn default_fallback_areas() -> Vec<String> {
    ["shoulder", "knee", "spine/core"]
        .iter()
        .map(|s| (*s).into())
        .collect()
}
