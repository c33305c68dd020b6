//! Severity-adjusted dosage computation.
//!
//! Base repetition/hold parameters from the catalog are scaled down as pain
//! severity rises, with floors so a prescription never collapses to nothing.

use crate::types::{Dosage, ExerciseDefinition, ExerciseKind};

/// Base reps substituted when a repetition exercise has no rep count
const DEFAULT_BASE_REPS: u32 = 8;

/// Base hold substituted when a hold exercise has no hold time
const DEFAULT_BASE_HOLD_SECONDS: u32 = 5;

fn scale(base: u32, factor: f64, floor: u32) -> u32 {
    let scaled = (f64::from(base) * factor).round() as u32;
    scaled.max(floor)
}

/// Compute the prescription for one exercise at the given severity
///
/// Severity >= 8 halves reps (floor 4) and scales holds by 0.6 (floor 3 s),
/// clamping sets to at least 1. Severity 5-7 scales by 0.75 / 0.8 with
/// floors 6 and 4 s. Below 5 the catalog base passes through unchanged.
pub fn compute_dosage(ex: &ExerciseDefinition, severity: u8) -> Dosage {
    match ex.kind {
        ExerciseKind::Repetition => {
            let base = ex.base_reps.unwrap_or(DEFAULT_BASE_REPS);
            let (reps, sets) = if severity >= 8 {
                (scale(base, 0.5, 4), ex.base_sets.max(1))
            } else if severity >= 5 {
                (scale(base, 0.75, 6), ex.base_sets)
            } else {
                (base, ex.base_sets)
            };
            Dosage::Repetition { sets, reps }
        }
        ExerciseKind::Hold => {
            let base = ex.base_hold_seconds.unwrap_or(DEFAULT_BASE_HOLD_SECONDS);
            let (hold_seconds, sets) = if severity >= 8 {
                (scale(base, 0.6, 3), ex.base_sets.max(1))
            } else if severity >= 5 {
                (scale(base, 0.8, 4), ex.base_sets)
            } else {
                (base, ex.base_sets)
            };
            Dosage::Hold { sets, hold_seconds }
        }
    }
}
