// ==============================================================================
// risk.rs - Phenotype Risk Evaluation
// ==============================================================================
// Description: Maps metabolizer phenotypes to clinical risk assessments
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-20
// Version: 1.1.0
// ==============================================================================

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{PhenotypeCode, RiskAssessment, RiskLabel, Severity};

/// Drug name (canonical case) -> primary metabolizing gene.
///
/// One gene per drug. Lookups are case-insensitive via the upper-cased
/// index below, built once at first use.
pub static PRIMARY_GENE_MAP: &[(&str, &str)] = &[
    ("Codeine", "CYP2D6"),
    ("Clopidogrel", "CYP2C19"),
    ("Warfarin", "CYP2C9"),
    ("Simvastatin", "SLCO1B1"),
    ("Azathioprine", "TPMT"),
    ("Fluorouracil", "DPYD"),
];

/// Upper-cased drug name -> (canonical name, primary gene)
static DRUG_INDEX: LazyLock<HashMap<String, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        PRIMARY_GENE_MAP
            .iter()
            .map(|&(drug, gene)| (drug.to_uppercase(), (drug, gene)))
            .collect()
    });

/// Look up a drug case-insensitively, returning its canonical name and
/// primary gene.
pub fn lookup_drug(name: &str) -> Option<(&'static str, &'static str)> {
    DRUG_INDEX.get(&name.trim().to_uppercase()).copied()
}

/// Evaluate clinical risk for a (drug, phenotype) pair.
///
/// The rule is currently phenotype-only; `_drug` is kept in the signature
/// for per-drug calibration without an API break. Deterministic, total,
/// no failure mode.
pub fn evaluate_risk(_drug: &str, phenotype: PhenotypeCode) -> RiskAssessment {
    match phenotype {
        PhenotypeCode::Pm => RiskAssessment {
            risk_label: RiskLabel::Toxic,
            confidence_score: 0.92,
            severity: Severity::High,
        },
        PhenotypeCode::Im => RiskAssessment {
            risk_label: RiskLabel::AdjustDosage,
            confidence_score: 0.75,
            severity: Severity::Moderate,
        },
        PhenotypeCode::Nm => RiskAssessment {
            risk_label: RiskLabel::Safe,
            confidence_score: 0.60,
            severity: Severity::Low,
        },
        // RM/UM/URM/Unknown: insufficient evidence in the rule table
        _ => RiskAssessment {
            risk_label: RiskLabel::Unknown,
            confidence_score: 0.0,
            severity: Severity::None,
        },
    }
}
