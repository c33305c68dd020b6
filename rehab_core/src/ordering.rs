//! Final ordering of the selected plan by physiological intent.
//!
//! Activation and neuromotor work first, then mobility, then low-load
//! strengthening, then everything else, so the plan reads as a warm-up
//! through strengthening narrative.

use crate::types::Recommendation;

/// Effect tags treated as activation / neuromotor work
const ACTIVATION_EFFECTS: [&str; 3] = ["motor_control", "activation", "neural_gliding"];

/// Effect tags treated as mobility work
const MOBILITY_EFFECTS: [&str; 2] = ["mobility", "end_range_mobility"];

/// Effect tags treated as low-load strengthening
const STRENGTH_EFFECTS: [&str; 2] = ["low_load_strength", "graded_exposure"];

fn intent_tier(effects: &[String]) -> u8 {
    let has_any = |tags: &[&str]| effects.iter().any(|e| tags.contains(&e.as_str()));

    if has_any(&ACTIVATION_EFFECTS) {
        0
    } else if has_any(&MOBILITY_EFFECTS) {
        1
    } else if has_any(&STRENGTH_EFFECTS) {
        2
    } else {
        3
    }
}

/// Stable-sort recommendations into the four-tier intent order
pub fn order_by_intent(recommendations: &mut [Recommendation]) {
    recommendations.sort_by_key(|rec| intent_tier(&rec.intended_effects));
}
