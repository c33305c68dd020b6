//! Candidate shortlisting by injury area.
//!
//! Direct target-area matches first; when an area has no entries, an
//! adjacency map supplies related regions, and unknown areas fall back to a
//! fixed default set so the pipeline always has something to score.

use crate::knowledge::ClinicalKnowledge;
use crate::types::ExerciseDefinition;
use crate::Catalog;

/// Narrow the catalog to exercises relevant to `injury_area` (lowercase)
///
/// Output order follows catalog order; it is not significant at this stage.
pub fn shortlist<'a>(
    catalog: &'a Catalog,
    knowledge: &ClinicalKnowledge,
    injury_area: &str,
) -> Vec<&'a ExerciseDefinition> {
    let direct = catalog.by_area(injury_area);
    if !direct.is_empty() {
        return direct;
    }

    let fallback_areas = knowledge
        .related_areas
        .get(injury_area)
        .unwrap_or(&knowledge.fallback_areas);

    tracing::debug!(
        "No direct catalog entries for '{}', falling back to {:?}",
        injury_area,
        fallback_areas
    );

    catalog
        .all()
        .iter()
        .filter(|def| fallback_areas.iter().any(|area| area == &def.target_area))
        .collect()
}
