//! Composite scoring and the safety filter.
//!
//! Each candidate receives a weighted combination of five sub-scores plus a
//! progression bonus, minus a weighted contraindication penalty. Scores are
//! unbounded below zero; the safety filter then drops anything at or below
//! the configured floor and sorts the survivors.

use crate::knowledge::{ClinicalKnowledge, EffectPreference};
use crate::types::{ExerciseDefinition, Intensity, PainType, ScoredCandidate};

/// 1.0 when the candidate targets the injury area exactly
///
/// Fallback-area candidates score 0 here but stay eligible via other terms.
pub(crate) fn target_match(ex: &ExerciseDefinition, injury_area: &str) -> f64 {
    if ex.target_area == injury_area {
        1.0
    } else {
        0.0
    }
}

/// Pain-type compatibility, unfloored: +1.0 for a preferred-effect overlap,
/// -1.0 for an avoided-effect overlap
///
/// Callers floor this at 0.0 when combining; the sign of the unfloored value
/// drives the rationale note.
pub(crate) fn pain_type_compat(
    ex: &ExerciseDefinition,
    prefs: Option<&EffectPreference>,
) -> f64 {
    let Some(prefs) = prefs else {
        return 0.0;
    };
    let mut score = 0.0;
    if prefs
        .prefer
        .iter()
        .any(|tag| ex.intended_effects.iter().any(|e| e == tag))
    {
        score += 1.0;
    }
    if prefs
        .avoid
        .iter()
        .any(|tag| ex.intended_effects.iter().any(|e| e == tag))
    {
        score -= 1.0;
    }
    score
}

/// 1.0 when the candidate's intensity is admissible for the severity band
///
/// Severity >= 8 admits only low intensity; 5-7 admits low and medium;
/// below 5 admits anything.
pub(crate) fn pain_level_suitability(ex: &ExerciseDefinition, severity: u8) -> f64 {
    let suitable = if severity >= 8 {
        ex.intensity == Intensity::Low
    } else if severity >= 5 {
        matches!(ex.intensity, Intensity::Low | Intensity::Medium)
    } else {
        true
    };
    if suitable {
        1.0
    } else {
        0.0
    }
}

/// Contraindication penalty: +2.0 for any red-flag tag, +1.0 more when any
/// contraindication text mentions the pain type or injury area
pub(crate) fn contraindication_penalty(
    ex: &ExerciseDefinition,
    red_flags: &[String],
    pain_token: &str,
    injury_area: &str,
) -> f64 {
    let mut penalty = 0.0;
    if ex
        .contraindications
        .iter()
        .any(|tag| red_flags.iter().any(|flag| flag == tag))
    {
        penalty += 2.0;
    }
    if ex
        .contraindications
        .iter()
        .any(|tag| tag.contains(pain_token) || tag.contains(injury_area))
    {
        penalty += 1.0;
    }
    penalty
}

/// 1.0 when no equipment is required or the requirement is available
///
/// `available` entries must already be lowercase.
pub(crate) fn equipment_match(ex: &ExerciseDefinition, available: &[String]) -> f64 {
    let needed = ex.equipment.as_str();
    if needed.is_empty() || needed == "none" || needed == "bodyweight" {
        return 1.0;
    }
    if available.iter().any(|e| e == needed) {
        1.0
    } else {
        0.0
    }
}

/// Bonus for intensity fitting the severity band
pub(crate) fn intensity_match(ex: &ExerciseDefinition, severity: u8) -> f64 {
    if severity >= 7 && ex.intensity == Intensity::Low {
        1.0
    } else if (4..=6).contains(&severity)
        && matches!(ex.intensity, Intensity::Low | Intensity::Medium)
    {
        0.8
    } else if severity < 4 {
        1.0
    } else {
        0.0
    }
}

/// Compute the composite score for every candidate
pub fn score_candidates<'a>(
    candidates: &[&'a ExerciseDefinition],
    knowledge: &ClinicalKnowledge,
    injury_area: &str,
    severity: u8,
    pain_type: PainType,
    available_equipment: &[String],
) -> Vec<ScoredCandidate<'a>> {
    let weights = &knowledge.weights;
    let prefs = knowledge.pain_type_effects.get(&pain_type);
    let pain_token = pain_type.as_str();

    candidates
        .iter()
        .map(|&ex| {
            let mut score = 0.0;
            score += weights.target_match * target_match(ex, injury_area);
            score += weights.pain_type_compat * pain_type_compat(ex, prefs).max(0.0);
            score += weights.pain_level_suitability * pain_level_suitability(ex, severity);
            score -= weights.contraindication_penalty
                * contraindication_penalty(ex, &knowledge.red_flags, pain_token, injury_area);
            score += weights.equipment_match * equipment_match(ex, available_equipment);
            score += weights.intensity_match * intensity_match(ex, severity);
            if !ex.progressions.is_empty() {
                score += weights.progression_bonus;
            }
            ScoredCandidate {
                exercise: ex,
                raw_score: score,
            }
        })
        .collect()
}

/// Drop candidates at or below the safety floor, then sort by score
/// descending
///
/// The sort is stable: equal scores keep catalog order.
pub fn apply_safety_filter(
    mut scored: Vec<ScoredCandidate<'_>>,
    floor: f64,
) -> Vec<ScoredCandidate<'_>> {
    let before = scored.len();
    scored.retain(|c| c.raw_score > floor);
    if scored.len() < before {
        tracing::debug!(
            "Safety filter removed {} of {} candidates",
            before - scored.len(),
            before
        );
    }
    scored.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_knowledge;
    use crate::types::ExerciseKind;

    fn knee_def(name: &str, intensity: Intensity) -> ExerciseDefinition {
        ExerciseDefinition {
            name: name.into(),
            target_area: "knee".into(),
            intensity,
            ..Default::default()
        }
    }

    #[test]
    fn test_target_match_exact_only() {
        let def = knee_def("Quad Sets", Intensity::Low);
        assert_eq!(target_match(&def, "knee"), 1.0);
        assert_eq!(target_match(&def, "hip"), 0.0);
    }

    #[test]
    fn test_pain_type_compat_prefer_and_avoid() {
        let knowledge = default_knowledge();
        let prefs = knowledge.pain_type_effects.get(&PainType::Sharp);

        let mut def = knee_def("Quad Sets", Intensity::Low);
        def.intended_effects = vec!["motor_control".into()];
        assert_eq!(pain_type_compat(&def, prefs), 1.0);

        def.intended_effects = vec!["high_load".into()];
        assert_eq!(pain_type_compat(&def, prefs), -1.0);

        // both preferred and avoided cancel out
        def.intended_effects = vec!["motor_control".into(), "high_load".into()];
        assert_eq!(pain_type_compat(&def, prefs), 0.0);

        def.intended_effects = vec!["mobility".into()];
        assert_eq!(pain_type_compat(&def, prefs), 0.0);
    }

    #[test]
    fn test_pain_level_suitability_bands() {
        let low = knee_def("a", Intensity::Low);
        let medium = knee_def("b", Intensity::Medium);
        let high = knee_def("c", Intensity::High);

        assert_eq!(pain_level_suitability(&low, 9), 1.0);
        assert_eq!(pain_level_suitability(&medium, 9), 0.0);
        assert_eq!(pain_level_suitability(&medium, 6), 1.0);
        assert_eq!(pain_level_suitability(&high, 6), 0.0);
        assert_eq!(pain_level_suitability(&high, 3), 1.0);
    }

    #[test]
    fn test_suitability_monotonically_stricter_with_severity() {
        // for every intensity, suitability never increases as severity rises
        for intensity in [Intensity::Low, Intensity::Medium, Intensity::High] {
            let def = knee_def("x", intensity);
            let mut prev = f64::INFINITY;
            for severity in 1..=10 {
                let score = pain_level_suitability(&def, severity);
                assert!(
                    score <= prev,
                    "suitability rose from {prev} to {score} at severity {severity} for {intensity}"
                );
                prev = score;
            }
        }
    }

    #[test]
    fn test_contraindication_penalty_red_flag_and_mention() {
        let knowledge = default_knowledge();
        let mut def = knee_def("Jump Squats", Intensity::High);

        def.contraindications = vec!["impact".into()];
        assert_eq!(
            contraindication_penalty(&def, &knowledge.red_flags, "sharp", "knee"),
            2.0
        );

        // mentions the injury area on top of the red flag
        def.contraindications = vec!["impact".into(), "acute_knee_swelling".into()];
        assert_eq!(
            contraindication_penalty(&def, &knowledge.red_flags, "sharp", "knee"),
            3.0
        );

        // mention only, no red flag
        def.contraindications = vec!["sharp_pain_on_load".into()];
        assert_eq!(
            contraindication_penalty(&def, &knowledge.red_flags, "sharp", "knee"),
            1.0
        );

        def.contraindications = vec![];
        assert_eq!(
            contraindication_penalty(&def, &knowledge.red_flags, "sharp", "knee"),
            0.0
        );
    }

    #[test]
    fn test_equipment_match() {
        let mut def = knee_def("Band Work", Intensity::Low);
        assert_eq!(equipment_match(&def, &[]), 1.0); // "none" default

        def.equipment = "bodyweight".into();
        assert_eq!(equipment_match(&def, &[]), 1.0);

        def.equipment = "resistance_band".into();
        assert_eq!(equipment_match(&def, &[]), 0.0);
        assert_eq!(equipment_match(&def, &["resistance_band".into()]), 1.0);
    }

    #[test]
    fn test_intensity_match_bands() {
        let low = knee_def("a", Intensity::Low);
        let medium = knee_def("b", Intensity::Medium);
        let high = knee_def("c", Intensity::High);

        assert_eq!(intensity_match(&low, 8), 1.0);
        assert_eq!(intensity_match(&medium, 8), 0.0);
        assert_eq!(intensity_match(&low, 5), 0.8);
        assert_eq!(intensity_match(&medium, 5), 0.8);
        assert_eq!(intensity_match(&high, 5), 0.0);
        assert_eq!(intensity_match(&high, 2), 1.0);
    }

    #[test]
    fn test_composite_score_components() {
        let knowledge = default_knowledge();
        let mut def = knee_def("Quad Sets", Intensity::Low);
        def.intended_effects = vec!["motor_control".into()];
        def.progressions = vec!["Straight Leg Raise".into()];

        let scored = score_candidates(
            &[&def],
            knowledge,
            "knee",
            9,
            PainType::Sharp,
            &[],
        );

        // target 3.0 + compat 2.5 + suitability 2.0 + equipment 0.5
        // + intensity 1.5 + progression 0.75
        assert_eq!(scored.len(), 1);
        assert!((scored[0].raw_score - 10.25).abs() < 1e-9);
    }

    #[test]
    fn test_red_flag_drives_score_below_floor() {
        let knowledge = default_knowledge();
        let mut def = ExerciseDefinition {
            name: "Inverted Row".into(),
            target_area: "thoracic".into(),
            intensity: Intensity::High,
            kind: ExerciseKind::Repetition,
            ..Default::default()
        };
        def.contraindications = vec!["high_load".into()];

        let scored = score_candidates(
            &[&def],
            knowledge,
            "shoulder",
            9,
            PainType::Sharp,
            &[],
        );
        // no positive term outweighs the -10 red-flag penalty
        assert!(scored[0].raw_score <= knowledge.safety_score_floor);

        let filtered = apply_safety_filter(scored, knowledge.safety_score_floor);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_sorts_descending_and_ties_keep_order() {
        let a = knee_def("A", Intensity::Low);
        let b = knee_def("B", Intensity::Low);
        let c = knee_def("C", Intensity::Low);
        let scored = vec![
            ScoredCandidate {
                exercise: &a,
                raw_score: 1.0,
            },
            ScoredCandidate {
                exercise: &b,
                raw_score: 5.0,
            },
            ScoredCandidate {
                exercise: &c,
                raw_score: 1.0,
            },
        ];

        let filtered = apply_safety_filter(scored, -1.0);
        let names: Vec<_> = filtered.iter().map(|s| s.exercise.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_filter_is_strictly_greater_than_floor() {
        let a = knee_def("A", Intensity::Low);
        let scored = vec![ScoredCandidate {
            exercise: &a,
            raw_score: -1.0,
        }];
        assert!(apply_safety_filter(scored, -1.0).is_empty());

        let scored = vec![ScoredCandidate {
            exercise: &a,
            raw_score: -0.999,
        }];
        assert_eq!(apply_safety_filter(scored, -1.0).len(), 1);
    }
}
