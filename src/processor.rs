// ==============================================================================
// processor.rs - Core Pharmacogenomic Analysis Pipeline
// ==============================================================================
// Description: Orchestrates variant extraction, phenotype and risk evaluation
// Author: Matt Barham
// Created: 2025-11-19
// Modified: 2025-11-24
// Version: 1.2.0
// ==============================================================================

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::composer::{build_multi_drug_report, build_report, AnalysisReport, DrugResult};
use crate::explain::{generic_fallback, ExplanationGenerator, TemplateExplainer, NO_VARIANT_EXPLANATION};
use crate::parsers::{VariantRecord, VcfExtractor, VcfParseError};
use crate::phenotype::resolve_phenotype;
use crate::risk::{evaluate_risk, lookup_drug};
use crate::storage::{NullStore, ReportStore};
use crate::validator::{parse_drug_list, validate_patient_id, validate_raw_input, RequestError};

/// Request-rejecting pipeline failures. Everything else degrades into a
/// valid, lower-confidence report.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Parse(#[from] VcfParseError),
}

/// Pharmacogenomic analysis pipeline.
///
/// Stateless across calls apart from the process-wide read-only lookup
/// tables; safe to share between concurrent tasks.
pub struct PgxProcessor {
    explainer: Arc<dyn ExplanationGenerator>,
    store: Arc<dyn ReportStore>,
}

impl Default for PgxProcessor {
    fn default() -> Self {
        Self {
            explainer: Arc::new(TemplateExplainer),
            store: Arc::new(NullStore),
        }
    }
}

impl PgxProcessor {
    pub fn new(explainer: Arc<dyn ExplanationGenerator>, store: Arc<dyn ReportStore>) -> Self {
        Self { explainer, store }
    }

    /// Run the full pipeline for one request.
    ///
    /// `drug_input` is a comma-separated selection validated before any
    /// parsing work. Only intake validation and a missing VCF format header
    /// reject the request.
    pub async fn analyze(
        &self,
        patient_id: &str,
        drug_input: &str,
        raw_vcf: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        validate_patient_id(patient_id)?;
        let drugs = parse_drug_list(drug_input)?;
        validate_raw_input(raw_vcf)?;

        info!(
            "Starting pharmacogenomic analysis for patient {} ({} drug(s))",
            patient_id,
            drugs.len()
        );

        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(raw_vcf)?;
        let parsing_success = true;
        info!(
            "Extracted {} supported variant(s), {} row(s) skipped",
            variants.len(),
            extractor.skipped_count
        );

        let mut results = Vec::with_capacity(drugs.len());
        for drug in &drugs {
            results.push(self.analyze_drug(drug, &variants).await?);
        }

        let report = if results.len() == 1 {
            build_report(patient_id, &results[0], parsing_success)
        } else {
            build_multi_drug_report(patient_id, &results, parsing_success)
        };

        // Storage failures never affect the returned report
        if let Err(e) = self
            .store
            .save_report(patient_id, &report.drug, &report)
            .await
        {
            warn!("Failed to persist report for patient {}: {}", patient_id, e);
        }

        info!(
            "Analysis complete: overall risk {}",
            report.risk_assessment.risk_label.as_str()
        );
        Ok(report)
    }

    /// Evaluate one drug against the extracted variants.
    ///
    /// The genotype of the first variant matching the drug's primary gene
    /// feeds the phenotype resolver; no match leaves the phenotype Unknown.
    async fn analyze_drug(
        &self,
        drug: &str,
        variants: &[VariantRecord],
    ) -> Result<DrugResult, AnalysisError> {
        let (canonical, gene) =
            lookup_drug(drug).ok_or_else(|| RequestError::UnsupportedDrug(drug.to_uppercase()))?;

        let relevant: Vec<&VariantRecord> =
            variants.iter().filter(|v| v.gene == gene).collect();

        let phenotype = relevant
            .first()
            .map(|v| resolve_phenotype(&v.genotype))
            .unwrap_or(crate::models::PhenotypeCode::Unknown);

        let rsids: Vec<String> = relevant.iter().map(|v| v.rsid.clone()).collect();
        let risk = evaluate_risk(canonical, phenotype);

        let explanation = if relevant.is_empty() {
            NO_VARIANT_EXPLANATION.to_string()
        } else {
            match self.explainer.explain(gene, phenotype, canonical).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Explanation generator failed for {}: {}", canonical, e);
                    generic_fallback(gene, phenotype)
                }
            }
        };

        debug!(
            "Drug {}: gene {}, phenotype {}, risk {}",
            canonical,
            gene,
            phenotype.as_str(),
            risk.risk_label.as_str()
        );

        Ok(DrugResult {
            drug: canonical.to_string(),
            gene: gene.to_string(),
            phenotype,
            risk,
            rsids,
            explanation,
        })
    }
}
