#![forbid(unsafe_code)]

//! Core domain model and recommendation pipeline for the rehab exercise
//! prescription system.
//!
//! This crate provides:
//! - Domain types (exercise definitions, clinical profiles, recommendations)
//! - Catalog loading and queries
//! - Clinical knowledge tables (weights, pain-type preferences, red flags)
//! - The recommendation pipeline (shortlist, scoring, safety filter,
//!   diversity selection, dosage, confidence, final ordering)

pub mod types;
pub mod error;
pub mod catalog;
pub mod knowledge;
pub mod config;
pub mod logging;
pub mod shortlist;
pub mod scoring;
pub mod selection;
pub mod dosage;
pub mod confidence;
pub mod ordering;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::Catalog;
pub use knowledge::{default_knowledge, ClinicalKnowledge, EffectPreference, ScoringWeights};
pub use config::Config;
pub use dosage::compute_dosage;
pub use engine::{train_from_outcomes, Recommender};
