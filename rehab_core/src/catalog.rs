//! Exercise catalog loading and queries.
//!
//! The catalog is read once from a CSV source at process start and never
//! mutated afterwards. Individual malformed rows are excluded with a
//! warning; an unreadable source is a fatal load error since the engine
//! must not serve without its catalog.

use crate::types::{ExerciseDefinition, ExerciseKind, Intensity};
use crate::{Error, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// CSV row as it appears in the source, before defensive conversion
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default, rename = "exerciseName")]
    exercise_name: String,
    #[serde(default, rename = "exerciseType")]
    exercise_type: String,
    #[serde(default, rename = "targetArea")]
    target_area: String,
    #[serde(default)]
    rep: String,
    #[serde(default, rename = "holdTime")]
    hold_time: String,
    #[serde(default, rename = "set")]
    set: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default, rename = "equipmentNeeded")]
    equipment_needed: String,
    #[serde(default, rename = "aiTrackingEnabled")]
    ai_tracking_enabled: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "demoVideo")]
    demo_video: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    intensity: String,
    #[serde(default)]
    intended_effects: String,
    #[serde(default)]
    contraindications: String,
    #[serde(default)]
    movement_plane: String,
    #[serde(default)]
    progressions: String,
}

/// Parse a count-like field; empty or non-numeric values become absent
fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u32)
}

/// Split a pipe-delimited field into lowercase trimmed tags
fn split_tags(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Split a pipe-delimited field into trimmed names, case preserved
fn split_names(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl TryFrom<RawRow> for ExerciseDefinition {
    type Error = Error;

    fn try_from(row: RawRow) -> Result<Self> {
        let name = row.exercise_name.trim().to_string();

        let kind: ExerciseKind = row
            .exercise_type
            .parse()
            .map_err(|e: String| Error::Catalog(format!("row '{name}': {e}")))?;

        let intensity = if row.intensity.trim().is_empty() {
            Intensity::Low
        } else {
            row.intensity
                .parse()
                .map_err(|e: String| Error::Catalog(format!("row '{name}': {e}")))?
        };

        let difficulty = row.difficulty.trim().to_lowercase();
        let equipment = row.equipment_needed.trim().to_lowercase();

        Ok(ExerciseDefinition {
            name,
            kind,
            target_area: row.target_area.trim().to_lowercase(),
            base_reps: parse_count(&row.rep),
            base_hold_seconds: parse_count(&row.hold_time),
            base_sets: parse_count(&row.set).unwrap_or(3),
            difficulty: if difficulty.is_empty() {
                "easy".into()
            } else {
                difficulty
            },
            equipment: if equipment.is_empty() {
                "none".into()
            } else {
                equipment
            },
            tracking_enabled: row.ai_tracking_enabled.trim().is_empty()
                || row.ai_tracking_enabled.trim().eq_ignore_ascii_case("true"),
            description: row.description.trim().to_string(),
            demo_video: row.demo_video.trim().to_string(),
            image: row.image.trim().to_string(),
            intensity,
            intended_effects: split_tags(&row.intended_effects),
            contraindications: split_tags(&row.contraindications),
            movement_plane: row.movement_plane.trim().to_lowercase(),
            progressions: split_names(&row.progressions),
        })
    }
}

/// The immutable, deduplicated set of exercise definitions
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    definitions: Vec<ExerciseDefinition>,
}

impl Catalog {
    /// Load the catalog from a CSV file
    ///
    /// Rows with an empty or already-seen name (case-insensitive) are
    /// skipped, first occurrence wins. Rows with an unrecognized exercise
    /// kind or intensity are skipped with a warning. An unreadable file is
    /// a fatal error.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

        let mut definitions = Vec::new();
        let mut seen = HashSet::new();

        for result in reader.deserialize::<RawRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping unreadable catalog row: {}", e);
                    continue;
                }
            };

            let name = row.exercise_name.trim().to_string();
            if name.is_empty() {
                tracing::debug!("Skipping catalog row with empty exercise name");
                continue;
            }

            let key = name.to_lowercase();
            if seen.contains(&key) {
                tracing::debug!("Duplicate exercise name '{}', keeping first", name);
                continue;
            }

            match ExerciseDefinition::try_from(row) {
                Ok(def) => {
                    seen.insert(key);
                    definitions.push(def);
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed catalog row: {}", e);
                }
            }
        }

        tracing::info!(
            "Loaded {} exercise definitions from {:?}",
            definitions.len(),
            path
        );

        Ok(Self { definitions })
    }

    /// Build a catalog from in-memory definitions, deduplicating by
    /// case-insensitive name (first occurrence wins)
    pub fn from_definitions(definitions: Vec<ExerciseDefinition>) -> Self {
        let mut seen = HashSet::new();
        let definitions = definitions
            .into_iter()
            .filter(|def| seen.insert(def.name_key()))
            .collect();
        Self { definitions }
    }

    /// All definitions, in load order
    pub fn all(&self) -> &[ExerciseDefinition] {
        &self.definitions
    }

    /// Definitions whose target area equals `area` exactly
    pub fn by_area(&self, area: &str) -> Vec<&ExerciseDefinition> {
        self.definitions
            .iter()
            .filter(|def| def.target_area == area)
            .collect()
    }

    /// Number of definitions targeting `area`
    pub fn area_count(&self, area: &str) -> usize {
        self.definitions
            .iter()
            .filter(|def| def.target_area == area)
            .count()
    }

    /// Definition counts per target area, sorted by area name
    pub fn area_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for def in &self.definitions {
            *counts.entry(def.target_area.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Check the catalog for advisory consistency problems
    ///
    /// Returns a list of issues, or empty Vec if clean. These are not load
    /// failures: a repetition exercise without a rep count still works (the
    /// dosage calculator substitutes a base), but a clinician should know.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for def in &self.definitions {
            if def.target_area.is_empty() {
                issues.push(format!("Exercise '{}' has no target area", def.name));
            }
            match def.kind {
                ExerciseKind::Repetition => {
                    if def.base_reps.is_none() {
                        issues.push(format!(
                            "Repetition exercise '{}' has no rep count",
                            def.name
                        ));
                    }
                }
                ExerciseKind::Hold => {
                    if def.base_hold_seconds.is_none() {
                        issues.push(format!("Hold exercise '{}' has no hold time", def.name));
                    }
                }
            }
            if def.base_sets == 0 {
                issues.push(format!("Exercise '{}' has a zero set count", def.name));
            }
            if def.intended_effects.is_empty() {
                issues.push(format!("Exercise '{}' has no intended effects", def.name));
            }
        }

        issues
    }
}
