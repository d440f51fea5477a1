// ==============================================================================
// explain.rs - Clinical Explanation Generation
// ==============================================================================
// Description: Explanation-generator interface and deterministic fallbacks
// Author: Matt Barham
// Created: 2025-11-19
// Modified: 2025-11-22
// Version: 1.1.0
// ==============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::models::PhenotypeCode;

/// Explanation used when no supporting variant rows were found for a gene
pub const NO_VARIANT_EXPLANATION: &str = "No actionable pharmacogenomic variants detected.";

/// Deterministic fallback when the explanation collaborator fails
pub fn generic_fallback(gene: &str, phenotype: PhenotypeCode) -> String {
    format!(
        "Analysis completed. Phenotype {} detected for {} gene. \
         Clinical interpretation should be confirmed with laboratory testing.",
        phenotype.as_str(),
        gene
    )
}

/// Human-readable description of a phenotype code
pub fn phenotype_description(phenotype: PhenotypeCode) -> &'static str {
    match phenotype {
        PhenotypeCode::Pm => "Poor Metabolizer - minimal enzyme activity",
        PhenotypeCode::Im => "Intermediate Metabolizer - reduced enzyme activity",
        PhenotypeCode::Nm => "Normal Metabolizer - typical enzyme activity",
        PhenotypeCode::Rm => "Rapid Metabolizer - increased enzyme activity",
        PhenotypeCode::Um | PhenotypeCode::Urm => {
            "Ultra-rapid Metabolizer - very high enzyme activity"
        }
        PhenotypeCode::Unknown => "Phenotype not determined",
    }
}

/// External collaborator producing free-text clinical explanations.
///
/// Implementations may fail for any reason (network, quota, service error);
/// the pipeline substitutes a deterministic fallback and never propagates
/// the failure.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    async fn explain(&self, gene: &str, phenotype: PhenotypeCode, drug: &str) -> Result<String>;
}

/// Default explainer built on fixed per-phenotype templates. Never fails.
#[derive(Debug, Default)]
pub struct TemplateExplainer;

#[async_trait]
impl ExplanationGenerator for TemplateExplainer {
    async fn explain(&self, gene: &str, phenotype: PhenotypeCode, drug: &str) -> Result<String> {
        let desc = phenotype_description(phenotype);
        let text = match phenotype {
            PhenotypeCode::Pm => format!(
                "Patient with {gene} Poor Metabolizer ({desc}) phenotype may experience \
                 elevated drug levels when treated with {drug}, potentially increasing \
                 toxicity risk. Dose reduction and close monitoring are recommended per \
                 CPIC guidelines."
            ),
            PhenotypeCode::Im => format!(
                "Patient with {gene} Intermediate Metabolizer ({desc}) phenotype may have \
                 reduced clearance of {drug}. Standard dosing with clinical monitoring is \
                 advised."
            ),
            PhenotypeCode::Nm => format!(
                "Patient with {gene} Normal Metabolizer ({desc}) phenotype is expected to \
                 respond normally to {drug} at standard doses."
            ),
            PhenotypeCode::Rm => format!(
                "Patient with {gene} Rapid Metabolizer ({desc}) phenotype may have \
                 accelerated clearance of {drug}. Consider standard dosing with monitoring."
            ),
            PhenotypeCode::Um | PhenotypeCode::Urm => format!(
                "Patient with {gene} Ultra-rapid Metabolizer ({desc}) phenotype may have \
                 subtherapeutic response to {drug} at standard doses. Dose increase may be \
                 required."
            ),
            PhenotypeCode::Unknown => format!(
                "Unable to determine {gene} metabolizer status for {drug}. Clinical \
                 judgment and therapeutic drug monitoring are recommended."
            ),
        };
        Ok(text)
    }
}
