//! Core domain types for the rehab recommendation system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions and their properties
//! - Clinical profile inputs (injury area, pain severity, pain type)
//! - Scored candidates and final recommendations
//! - Dosage prescriptions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Types
// ============================================================================

/// How an exercise is performed: counted repetitions or a timed hold
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Repetition,
    Hold,
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "repetition" => Ok(ExerciseKind::Repetition),
            "hold" => Ok(ExerciseKind::Hold),
            other => Err(format!("unknown exercise kind '{other}'")),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Repetition => write!(f, "repetition"),
            ExerciseKind::Hold => write!(f, "hold"),
        }
    }
}

/// Exertion level of an exercise as labelled in the catalog
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            other => Err(format!("unknown intensity '{other}'")),
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Low => write!(f, "low"),
            Intensity::Medium => write!(f, "medium"),
            Intensity::High => write!(f, "high"),
        }
    }
}

/// A single exercise definition from the catalog
///
/// Definitions are created once at catalog load and never mutated.
/// Names are unique within a catalog (case-insensitive).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub name: String,
    pub kind: ExerciseKind,
    /// Body region this exercise targets, lowercase
    pub target_area: String,
    pub base_reps: Option<u32>,
    pub base_hold_seconds: Option<u32>,
    pub base_sets: u32,
    pub difficulty: String,
    /// Required equipment, lowercase; "none"/"bodyweight"/empty means none
    pub equipment: String,
    pub tracking_enabled: bool,
    pub description: String,
    pub demo_video: String,
    pub image: String,
    pub intensity: Intensity,
    /// Physiological purpose tags, lowercase (e.g. "mobility", "motor_control")
    pub intended_effects: Vec<String>,
    /// Tags marking contexts under which the exercise is unsafe, lowercase
    pub contraindications: Vec<String>,
    pub movement_plane: String,
    /// Names of harder variants, in progression order
    pub progressions: Vec<String>,
}

impl Default for ExerciseDefinition {
    /// Matches the catalog loader defaults for absent fields
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ExerciseKind::Repetition,
            target_area: String::new(),
            base_reps: None,
            base_hold_seconds: None,
            base_sets: 3,
            difficulty: "easy".into(),
            equipment: "none".into(),
            tracking_enabled: true,
            description: String::new(),
            demo_video: String::new(),
            image: String::new(),
            intensity: Intensity::Low,
            intended_effects: Vec::new(),
            contraindications: Vec::new(),
            movement_plane: String::new(),
            progressions: Vec::new(),
        }
    }
}

impl ExerciseDefinition {
    /// Case-insensitive identity key for deduplication
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

// ============================================================================
// Clinical Profile Types
// ============================================================================

/// Qualitative descriptor of pain character
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PainType {
    Sharp,
    Dull,
    Throbbing,
    Burning,
    Stiffness,
    Aching,
    Radiating,
    Cramping,
    Tingling,
}

impl PainType {
    /// Lowercase token as it appears in contraindication text and tables
    pub fn as_str(&self) -> &'static str {
        match self {
            PainType::Sharp => "sharp",
            PainType::Dull => "dull",
            PainType::Throbbing => "throbbing",
            PainType::Burning => "burning",
            PainType::Stiffness => "stiffness",
            PainType::Aching => "aching",
            PainType::Radiating => "radiating",
            PainType::Cramping => "cramping",
            PainType::Tingling => "tingling",
        }
    }
}

impl FromStr for PainType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sharp" => Ok(PainType::Sharp),
            "dull" => Ok(PainType::Dull),
            "throbbing" => Ok(PainType::Throbbing),
            "burning" => Ok(PainType::Burning),
            "stiffness" => Ok(PainType::Stiffness),
            "aching" => Ok(PainType::Aching),
            "radiating" => Ok(PainType::Radiating),
            "cramping" => Ok(PainType::Cramping),
            "tingling" => Ok(PainType::Tingling),
            other => Err(format!("unknown pain type '{other}'")),
        }
    }
}

impl fmt::Display for PainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recommendation request from the caller-facing boundary
///
/// Severity is 1-10 inclusive and pain type is a member of the fixed
/// vocabulary; both are validated by the boundary before this core sees them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Injury area as reported; normalized to lowercase by the engine
    pub injury_area: String,
    pub severity: u8,
    pub pain_type: PainType,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[serde(default)]
    pub desired_count: Option<usize>,
    /// Reserved for sampling variants; the current pipeline is deterministic
    #[serde(default)]
    pub seed: Option<u64>,
    /// Opaque pass-through, not interpreted by the engine
    #[serde(default)]
    pub patient_history: Option<serde_json::Value>,
}

impl RecommendationRequest {
    pub fn new(injury_area: impl Into<String>, severity: u8, pain_type: PainType) -> Self {
        Self {
            injury_area: injury_area.into(),
            severity,
            pain_type,
            available_equipment: Vec::new(),
            desired_count: None,
            seed: None,
            patient_history: None,
        }
    }
}

// ============================================================================
// Pipeline and Output Types
// ============================================================================

/// A catalog entry paired with its composite score, transient within one
/// request
#[derive(Clone, Copy, Debug)]
pub struct ScoredCandidate<'a> {
    pub exercise: &'a ExerciseDefinition,
    pub raw_score: f64,
}

/// Severity-adjusted prescription for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Dosage {
    Repetition { sets: u32, reps: u32 },
    Hold { sets: u32, hold_seconds: u32 },
}

/// A single recommended exercise with dosage, score, confidence and rationale
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub exercise_name: String,
    pub kind: ExerciseKind,
    pub dosage: Dosage,
    pub target_area: String,
    pub difficulty: String,
    pub equipment: String,
    pub tracking_enabled: bool,
    pub description: String,
    pub demo_video: String,
    pub image: String,
    pub intended_effects: Vec<String>,
    pub progressions: Vec<String>,
    /// Composite score, rounded to 3 decimals
    pub raw_score: f64,
    /// Blend of normalized score and catalog coverage, in [0, 1]
    pub confidence: f64,
    pub rationale: Vec<String>,
}

/// A clinician-labelled outcome for the (unimplemented) training hook
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutcomeSample {
    pub features: serde_json::Value,
    pub approved: bool,
}
