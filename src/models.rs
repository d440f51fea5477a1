// ==============================================================================
// models.rs - Core Pharmacogenomic Data Models
// ==============================================================================
// Description: Phenotype, risk label and severity types shared across the pipeline
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-20
// Version: 1.1.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Metabolizer phenotype code derived from a genotype call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhenotypeCode {
    /// Poor Metabolizer
    #[serde(rename = "PM")]
    Pm,
    /// Intermediate Metabolizer
    #[serde(rename = "IM")]
    Im,
    /// Normal Metabolizer
    #[serde(rename = "NM")]
    Nm,
    /// Rapid Metabolizer
    #[serde(rename = "RM")]
    Rm,
    /// Ultra-rapid Metabolizer
    #[serde(rename = "UM")]
    Um,
    /// Ultra-rapid Metabolizer (extended)
    #[serde(rename = "URM")]
    Urm,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl PhenotypeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhenotypeCode::Pm => "PM",
            PhenotypeCode::Im => "IM",
            PhenotypeCode::Nm => "NM",
            PhenotypeCode::Rm => "RM",
            PhenotypeCode::Um => "UM",
            PhenotypeCode::Urm => "URM",
            PhenotypeCode::Unknown => "Unknown",
        }
    }

    /// Coerce an arbitrary string into a phenotype code.
    ///
    /// Anything outside the closed set (including case variants and stray
    /// whitespace) degrades to `Unknown` rather than erroring.
    pub fn coerce(value: &str) -> Self {
        match value {
            "PM" => PhenotypeCode::Pm,
            "IM" => PhenotypeCode::Im,
            "NM" => PhenotypeCode::Nm,
            "RM" => PhenotypeCode::Rm,
            "UM" => PhenotypeCode::Um,
            "URM" => PhenotypeCode::Urm,
            _ => PhenotypeCode::Unknown,
        }
    }
}

/// Clinical risk label attached to a (drug, phenotype) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
    Unknown,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AdjustDosage => "Adjust Dosage",
            RiskLabel::Toxic => "Toxic",
            RiskLabel::Ineffective => "Ineffective",
            RiskLabel::Unknown => "Unknown",
        }
    }

    /// Coerce an arbitrary string into a risk label (out-of-set -> Unknown)
    pub fn coerce(value: &str) -> Self {
        match value {
            "Safe" => RiskLabel::Safe,
            "Adjust Dosage" => RiskLabel::AdjustDosage,
            "Toxic" => RiskLabel::Toxic,
            "Ineffective" => RiskLabel::Ineffective,
            _ => RiskLabel::Unknown,
        }
    }
}

/// Categorical risk magnitude, ordered none < low < moderate < high < critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Coerce an arbitrary string into a severity level (out-of-set -> none)
    pub fn coerce(value: &str) -> Self {
        match value {
            "none" => Severity::None,
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::None,
        }
    }

    /// Numeric rank for cross-drug severity comparison
    pub fn rank(&self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Low => 1,
            Severity::Moderate => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Severity::None),
            1 => Some(Severity::Low),
            2 => Some(Severity::Moderate),
            3 => Some(Severity::High),
            4 => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Risk label, severity and confidence produced as one unit per (drug, phenotype)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub confidence_score: f64,
    pub severity: Severity,
}
