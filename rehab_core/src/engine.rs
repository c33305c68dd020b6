//! The recommendation engine: pipeline orchestration over an immutable
//! catalog.
//!
//! Given a clinical profile, the engine shortlists candidates by injury
//! area, scores them, drops unsafe items, selects a diverse subset, computes
//! per-item dosage and confidence, and orders the final plan by
//! physiological intent. The pipeline is a pure function of the catalog,
//! the knowledge tables, and the request; concurrent callers may share one
//! engine freely.

use crate::confidence::{self, PoolStats};
use crate::knowledge::ClinicalKnowledge;
use crate::ordering::order_by_intent;
use crate::scoring::{apply_safety_filter, score_candidates};
use crate::selection::{select_diverse, target_count};
use crate::shortlist::shortlist;
use crate::types::{OutcomeSample, Recommendation, RecommendationRequest};
use crate::Catalog;

/// The recommendation engine, borrowing catalog and knowledge for the
/// process lifetime
#[derive(Clone, Copy, Debug)]
pub struct Recommender<'a> {
    catalog: &'a Catalog,
    knowledge: &'a ClinicalKnowledge,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a Catalog, knowledge: &'a ClinicalKnowledge) -> Self {
        Self { catalog, knowledge }
    }

    /// Build an engine over the built-in clinical knowledge tables
    pub fn with_default_knowledge(catalog: &'a Catalog) -> Self {
        Self::new(catalog, crate::knowledge::default_knowledge())
    }

    /// Produce the ordered recommendation list for one request
    ///
    /// Inputs are assumed pre-validated (severity 1-10, known pain type).
    /// An empty result is valid: it means the catalog had nothing safe and
    /// relevant to offer. Under-filled results are returned as-is.
    pub fn recommend(&self, request: &RecommendationRequest) -> Vec<Recommendation> {
        let injury_area = request.injury_area.trim().to_lowercase();
        let available_equipment: Vec<String> = request
            .available_equipment
            .iter()
            .map(|e| e.trim().to_lowercase())
            .collect();

        let candidates = shortlist(self.catalog, self.knowledge, &injury_area);
        tracing::debug!(
            "Shortlisted {} candidates for area '{}'",
            candidates.len(),
            injury_area
        );

        let scored = score_candidates(
            &candidates,
            self.knowledge,
            &injury_area,
            request.severity,
            request.pain_type,
            &available_equipment,
        );

        let filtered = apply_safety_filter(scored, self.knowledge.safety_score_floor);

        let target = request
            .desired_count
            .unwrap_or_else(|| target_count(request.severity));
        let selected = select_diverse(
            &filtered,
            target,
            self.knowledge.diversity_backfill_ratio,
        );

        tracing::info!(
            "Selected {} of {} filtered candidates (target {}) for area '{}'",
            selected.len(),
            filtered.len(),
            target,
            injury_area
        );

        let stats = PoolStats::from_filtered(&filtered, self.catalog, &injury_area);
        let prefs = self.knowledge.pain_type_effects.get(&request.pain_type);

        let mut plan: Vec<Recommendation> = selected
            .iter()
            .map(|candidate| {
                let ex = candidate.exercise;
                Recommendation {
                    exercise_name: ex.name.clone(),
                    kind: ex.kind,
                    dosage: crate::dosage::compute_dosage(ex, request.severity),
                    target_area: ex.target_area.clone(),
                    difficulty: ex.difficulty.clone(),
                    equipment: ex.equipment.clone(),
                    tracking_enabled: ex.tracking_enabled,
                    description: ex.description.clone(),
                    demo_video: ex.demo_video.clone(),
                    image: ex.image.clone(),
                    intended_effects: ex.intended_effects.clone(),
                    progressions: ex.progressions.clone(),
                    raw_score: confidence::round3(candidate.raw_score),
                    confidence: confidence::confidence(candidate.raw_score, &stats),
                    rationale: confidence::rationale(
                        ex,
                        &injury_area,
                        request.pain_type,
                        prefs,
                    ),
                }
            })
            .collect();

        order_by_intent(&mut plan);
        plan
    }
}

/// Hook for fitting scoring weights from clinician-labelled outcomes.
///
/// Not implemented: the engine currently runs on the static
/// [`ClinicalKnowledge`] tables only, and collected samples are discarded.
pub fn train_from_outcomes(_samples: &[OutcomeSample]) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dosage, ExerciseDefinition, ExerciseKind, Intensity, PainType};

    struct DefSpec {
        name: &'static str,
        kind: ExerciseKind,
        area: &'static str,
        intensity: Intensity,
        effects: &'static [&'static str],
        contras: &'static [&'static str],
    }

    fn build(spec: DefSpec) -> ExerciseDefinition {
        ExerciseDefinition {
            name: spec.name.into(),
            kind: spec.kind,
            target_area: spec.area.into(),
            base_reps: matches!(spec.kind, ExerciseKind::Repetition).then_some(10),
            base_hold_seconds: matches!(spec.kind, ExerciseKind::Hold).then_some(20),
            intensity: spec.intensity,
            intended_effects: spec.effects.iter().map(|s| (*s).into()).collect(),
            contraindications: spec.contras.iter().map(|s| (*s).into()).collect(),
            ..Default::default()
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_definitions(vec![
            build(DefSpec {
                name: "Quad Sets",
                kind: ExerciseKind::Repetition,
                area: "knee",
                intensity: Intensity::Low,
                effects: &["motor_control", "activation"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Straight Leg Raise",
                kind: ExerciseKind::Repetition,
                area: "knee",
                intensity: Intensity::Low,
                effects: &["low_load_strength", "motor_control"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Wall Sit Hold",
                kind: ExerciseKind::Hold,
                area: "knee",
                intensity: Intensity::Low,
                effects: &["isometrics", "low_load_strength"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Hamstring Curl",
                kind: ExerciseKind::Repetition,
                area: "knee",
                intensity: Intensity::Low,
                effects: &["low_load_strength"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Mini Squats",
                kind: ExerciseKind::Repetition,
                area: "knee",
                intensity: Intensity::Medium,
                effects: &["low_load_strength", "graded_exposure"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Jump Squats",
                kind: ExerciseKind::Repetition,
                area: "knee",
                intensity: Intensity::High,
                effects: &["high_repetition"],
                contras: &["impact", "high_load"],
            }),
            build(DefSpec {
                name: "Pendulum Swing",
                kind: ExerciseKind::Repetition,
                area: "shoulder",
                intensity: Intensity::Low,
                effects: &["mobility"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Cat Camel",
                kind: ExerciseKind::Repetition,
                area: "spine/core",
                intensity: Intensity::Low,
                effects: &["mobility", "graded_movement"],
                contras: &[],
            }),
        ])
    }

    fn request(area: &str, severity: u8, pain_type: PainType) -> RecommendationRequest {
        RecommendationRequest::new(area, severity, pain_type)
    }

    #[test]
    fn test_severe_knee_profile_yields_three_safe_low_intensity_items() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);
        let mut req = request("knee", 9, PainType::Sharp);
        req.desired_count = Some(3);

        let plan = engine.recommend(&req);

        assert_eq!(plan.len(), 3);
        for rec in &plan {
            let def = catalog
                .all()
                .iter()
                .find(|d| d.name == rec.exercise_name)
                .unwrap();
            assert_eq!(def.intensity, Intensity::Low, "{} not low", rec.exercise_name);
            for flag in ["high_load", "impact", "inversion", "spinal_twist_with_load"] {
                assert!(
                    !def.contraindications.iter().any(|c| c == flag),
                    "{} carries red flag {}",
                    rec.exercise_name,
                    flag
                );
            }
        }
    }

    #[test]
    fn test_severity_eight_defaults_to_three_items() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        let plan = engine.recommend(&request("knee", 8, PainType::Sharp));
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_unknown_area_falls_back_and_defaults_to_four() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        // elbow has no entries and no adjacency mapping
        let plan = engine.recommend(&request("elbow", 3, PainType::Dull));

        assert!(!plan.is_empty());
        assert!(plan.len() <= 4);
        // fallback candidates come from the default area set
        for rec in &plan {
            assert!(
                ["shoulder", "knee", "spine/core"].contains(&rec.target_area.as_str()),
                "unexpected area {}",
                rec.target_area
            );
        }
    }

    #[test]
    fn test_red_flagged_exercise_never_recommended() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        for severity in [2, 6, 9] {
            let plan = engine.recommend(&request("knee", severity, PainType::Sharp));
            assert!(
                plan.iter().all(|r| r.exercise_name != "Jump Squats"),
                "red-flagged exercise surfaced at severity {severity}"
            );
        }
    }

    #[test]
    fn test_oversized_request_returns_pool_size() {
        let catalog = Catalog::from_definitions(vec![
            build(DefSpec {
                name: "Pendulum Swing",
                kind: ExerciseKind::Repetition,
                area: "shoulder",
                intensity: Intensity::Low,
                effects: &["mobility"],
                contras: &[],
            }),
            build(DefSpec {
                name: "Scapular Retraction",
                kind: ExerciseKind::Repetition,
                area: "shoulder",
                intensity: Intensity::Low,
                effects: &["motor_control"],
                contras: &[],
            }),
        ]);
        let engine = Recommender::with_default_knowledge(&catalog);
        let mut req = request("shoulder", 4, PainType::Dull);
        req.desired_count = Some(10);

        let plan = engine.recommend(&req);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_no_duplicate_names_in_output() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        let plan = engine.recommend(&request("knee", 5, PainType::Aching));
        let mut names: Vec<String> = plan
            .iter()
            .map(|r| r.exercise_name.to_lowercase())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), plan.len());
    }

    #[test]
    fn test_identical_requests_are_deterministic() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);
        let mut req = request("knee", 6, PainType::Aching);
        req.seed = Some(42);

        let first = engine.recommend(&req);
        let second = engine.recommend(&req);
        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_ordered_by_physiological_intent() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        let plan = engine.recommend(&request("knee", 4, PainType::Sharp));
        assert!(plan.len() >= 2);
        // activation/motor-control work leads the plan
        assert!(plan[0]
            .intended_effects
            .iter()
            .any(|e| e == "motor_control" || e == "activation"));
    }

    #[test]
    fn test_confidence_bounds_hold_across_profiles() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        for severity in 1..=10 {
            for pain_type in [PainType::Sharp, PainType::Stiffness, PainType::Radiating] {
                let plan = engine.recommend(&request("knee", severity, pain_type));
                for rec in &plan {
                    assert!(
                        (0.0..=1.0).contains(&rec.confidence),
                        "confidence {} out of bounds",
                        rec.confidence
                    );
                }
            }
        }
    }

    #[test]
    fn test_severe_dosage_floors_in_output() {
        let catalog = test_catalog();
        let engine = Recommender::with_default_knowledge(&catalog);

        let plan = engine.recommend(&request("knee", 9, PainType::Sharp));
        for rec in &plan {
            match rec.dosage {
                Dosage::Repetition { reps, sets } => {
                    assert!(reps >= 4);
                    assert!(sets >= 1);
                }
                Dosage::Hold { hold_seconds, sets } => {
                    assert!(hold_seconds >= 3);
                    assert!(sets >= 1);
                }
            }
        }
    }

    #[test]
    fn test_empty_catalog_yields_empty_plan() {
        let catalog = Catalog::from_definitions(vec![]);
        let engine = Recommender::with_default_knowledge(&catalog);

        let plan = engine.recommend(&request("knee", 5, PainType::Sharp));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_equipment_gates_scoring_not_eligibility() {
        let mut band_row = build(DefSpec {
            name: "Band Row",
            kind: ExerciseKind::Repetition,
            area: "shoulder",
            intensity: Intensity::Low,
            effects: &["low_load_strength"],
            contras: &[],
        });
        band_row.equipment = "resistance_band".into();
        let catalog = Catalog::from_definitions(vec![band_row]);
        let engine = Recommender::with_default_knowledge(&catalog);

        // still recommended without the band: equipment only shifts score
        let without = engine.recommend(&request("shoulder", 4, PainType::Aching));
        assert_eq!(without.len(), 1);

        let mut req = request("shoulder", 4, PainType::Aching);
        req.available_equipment = vec!["Resistance_Band".into()];
        let with = engine.recommend(&req);
        assert!(with[0].raw_score > without[0].raw_score);
    }
}
