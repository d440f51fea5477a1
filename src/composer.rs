// ==============================================================================
// composer.rs - Analysis Report Composition
// ==============================================================================
// Description: Builds single-drug and multi-drug analysis reports for delivery
// Author: Matt Barham
// Created: 2025-11-19
// Modified: 2025-11-24
// Version: 1.2.0
// ==============================================================================
// Field declaration order in the structs below is the wire key order;
// consumers rely on it for display (not for machine parsing).
// ==============================================================================

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PhenotypeCode, RiskAssessment, RiskLabel, Severity};

/// Per-drug evaluation result handed to the composer
#[derive(Debug, Clone)]
pub struct DrugResult {
    pub drug: String,
    pub gene: String,
    pub phenotype: PhenotypeCode,
    pub risk: RiskAssessment,
    pub rsids: Vec<String>,
    pub explanation: String,
}

/// Detected variant reference (rsID only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedVariant {
    pub rsid: String,
}

/// Pharmacogenomic profile section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: String,
    pub diplotype: String,
    pub phenotype: String,
    pub detected_variants: Vec<DetectedVariant>,
}

impl PharmacogenomicProfile {
    /// Empty placeholder profile used at the top level of multi-drug reports
    fn placeholder() -> Self {
        Self {
            primary_gene: String::new(),
            diplotype: String::new(),
            phenotype: String::new(),
            detected_variants: Vec::new(),
        }
    }
}

/// Clinical recommendation section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub action: String,
    pub dose_adjustment: String,
    pub monitoring: String,
}

/// Explanation text wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationSummary {
    pub summary: String,
}

/// Parse quality flags attached to every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
}

/// Per-drug analysis entry in a multi-drug report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugAnalysis {
    pub drug: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: ExplanationSummary,
}

/// Top-level analysis report (single- or multi-drug)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub patient_id: String,
    pub drug: String,
    pub timestamp: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: ExplanationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_analyses: Option<Vec<DrugAnalysis>>,
    pub quality_metrics: QualityMetrics,
}

/// Symbolic diplotype notation for a phenotype (display only, default *1/*1)
pub fn determine_diplotype(phenotype: PhenotypeCode) -> &'static str {
    match phenotype {
        PhenotypeCode::Pm => "*4/*4",
        PhenotypeCode::Im => "*1/*4",
        PhenotypeCode::Nm => "*1/*1",
        PhenotypeCode::Rm => "*1x2/*1",
        PhenotypeCode::Um => "*1xN/*1",
        PhenotypeCode::Urm => "*1xN/*1",
        PhenotypeCode::Unknown => "*1/*1",
    }
}

/// Fixed clinical recommendation per phenotype; Unknown is the default bucket
pub fn clinical_recommendation(phenotype: PhenotypeCode) -> ClinicalRecommendation {
    let (action, dose_adjustment, monitoring) = match phenotype {
        PhenotypeCode::Pm => (
            "Reduce dose or consider alternative therapy",
            "Significant dose reduction recommended",
            "Frequent therapeutic drug monitoring required",
        ),
        PhenotypeCode::Im => (
            "Consider dose adjustment",
            "Moderate dose reduction may be needed",
            "Regular clinical monitoring advised",
        ),
        PhenotypeCode::Nm => (
            "Standard dosing",
            "No dose adjustment required",
            "Standard monitoring per protocol",
        ),
        PhenotypeCode::Rm => (
            "Standard dosing",
            "Standard dose, may consider increase if needed",
            "Monitor for efficacy",
        ),
        PhenotypeCode::Um | PhenotypeCode::Urm => (
            "Consider increased dose or alternative",
            "May require higher than standard doses",
            "Monitor for therapeutic response",
        ),
        PhenotypeCode::Unknown => (
            "Refer to clinical genetics",
            "Use standard dosing with caution",
            "Close clinical monitoring recommended",
        ),
    };

    ClinicalRecommendation {
        action: action.to_string(),
        dose_adjustment: dose_adjustment.to_string(),
        monitoring: monitoring.to_string(),
    }
}

/// UTC ISO-8601 composition timestamp with trailing "Z"
fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn profile_for(result: &DrugResult) -> PharmacogenomicProfile {
    PharmacogenomicProfile {
        primary_gene: result.gene.clone(),
        diplotype: determine_diplotype(result.phenotype).to_string(),
        phenotype: result.phenotype.as_str().to_string(),
        detected_variants: result
            .rsids
            .iter()
            .map(|r| DetectedVariant { rsid: r.clone() })
            .collect(),
    }
}

fn explanation_for(result: &DrugResult) -> ExplanationSummary {
    let summary = if result.explanation.is_empty() {
        "No explanation available".to_string()
    } else {
        result.explanation.clone()
    };
    ExplanationSummary { summary }
}

/// Compose a single-drug analysis report
pub fn build_report(patient_id: &str, result: &DrugResult, parsing_success: bool) -> AnalysisReport {
    AnalysisReport {
        patient_id: patient_id.to_string(),
        drug: result.drug.clone(),
        timestamp: utc_timestamp(),
        risk_assessment: result.risk,
        pharmacogenomic_profile: profile_for(result),
        clinical_recommendation: clinical_recommendation(result.phenotype),
        llm_generated_explanation: explanation_for(result),
        drug_analyses: None,
        quality_metrics: QualityMetrics {
            vcf_parsing_success: parsing_success,
        },
    }
}

/// Derive the overall (label, severity) verdict across per-drug results.
///
/// Any Toxic finding short-circuits to Toxic/high regardless of the numeric
/// severity maximum. Otherwise Adjust Dosage wins over Safe, with the
/// max-rank severity label (defaulting to moderate and low respectively
/// when the rank is unmapped).
pub fn determine_overall_risk(results: &[DrugResult]) -> (RiskLabel, Severity) {
    let mut has_toxic = false;
    let mut has_adjust = false;
    let mut max_severity_rank = 0u8;

    for result in results {
        match result.risk.risk_label {
            RiskLabel::Toxic => has_toxic = true,
            RiskLabel::AdjustDosage => has_adjust = true,
            _ => {}
        }
        max_severity_rank = max_severity_rank.max(result.risk.severity.rank());
    }

    if has_toxic {
        (RiskLabel::Toxic, Severity::High)
    } else if has_adjust {
        (
            RiskLabel::AdjustDosage,
            Severity::from_rank(max_severity_rank).unwrap_or(Severity::Moderate),
        )
    } else {
        (
            RiskLabel::Safe,
            Severity::from_rank(max_severity_rank).unwrap_or(Severity::Low),
        )
    }
}

/// Assemble the overall summary by bucketing drugs into toxic/adjust/safe
/// and concatenating one sentence per non-empty bucket, in that order.
pub fn generate_overall_summary(results: &[DrugResult]) -> String {
    let mut toxic_drugs = Vec::new();
    let mut adjust_drugs = Vec::new();
    let mut safe_drugs = Vec::new();

    for result in results {
        match result.risk.risk_label {
            RiskLabel::Toxic => toxic_drugs.push(result.drug.as_str()),
            RiskLabel::AdjustDosage => adjust_drugs.push(result.drug.as_str()),
            _ => safe_drugs.push(result.drug.as_str()),
        }
    }

    let mut parts = Vec::new();
    if !toxic_drugs.is_empty() {
        parts.push(format!(
            "Drugs with potential toxicity risk: {}. Consider dose reduction or alternative therapy.",
            toxic_drugs.join(", ")
        ));
    }
    if !adjust_drugs.is_empty() {
        parts.push(format!(
            "Dose adjustment recommended for: {}.",
            adjust_drugs.join(", ")
        ));
    }
    if !safe_drugs.is_empty() {
        parts.push(format!(
            "Standard dosing appropriate for: {}.",
            safe_drugs.join(", ")
        ));
    }

    if parts.is_empty() {
        return "Multi-drug analysis completed. Please refer to individual drug recommendations."
            .to_string();
    }

    parts.join(" ")
}

/// Compose a multi-drug analysis report with the cross-drug verdict.
///
/// Overall confidence is the maximum of the per-drug confidences so a
/// single high-confidence toxic finding is not diluted.
pub fn build_multi_drug_report(
    patient_id: &str,
    results: &[DrugResult],
    parsing_success: bool,
) -> AnalysisReport {
    let overall_confidence = results
        .iter()
        .map(|r| r.risk.confidence_score)
        .fold(0.0f64, f64::max);

    let (overall_label, overall_severity) = determine_overall_risk(results);

    let drug_analyses: Vec<DrugAnalysis> = results
        .iter()
        .map(|result| DrugAnalysis {
            drug: result.drug.clone(),
            risk_assessment: result.risk,
            pharmacogenomic_profile: profile_for(result),
            clinical_recommendation: clinical_recommendation(result.phenotype),
            llm_generated_explanation: explanation_for(result),
        })
        .collect();

    let drug_names: Vec<&str> = results.iter().map(|r| r.drug.as_str()).collect();

    AnalysisReport {
        patient_id: patient_id.to_string(),
        drug: drug_names.join(", "),
        timestamp: utc_timestamp(),
        risk_assessment: RiskAssessment {
            risk_label: overall_label,
            confidence_score: overall_confidence,
            severity: overall_severity,
        },
        pharmacogenomic_profile: PharmacogenomicProfile::placeholder(),
        clinical_recommendation: ClinicalRecommendation {
            action: overall_label.as_str().to_string(),
            dose_adjustment: "See drug analyses".to_string(),
            monitoring: "See drug analyses".to_string(),
        },
        llm_generated_explanation: ExplanationSummary {
            summary: generate_overall_summary(results),
        },
        drug_analyses: Some(drug_analyses),
        quality_metrics: QualityMetrics {
            vcf_parsing_success: parsing_success,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::evaluate_risk;

    fn result(drug: &str, gene: &str, phenotype: PhenotypeCode) -> DrugResult {
        DrugResult {
            drug: drug.to_string(),
            gene: gene.to_string(),
            phenotype,
            risk: evaluate_risk(drug, phenotype),
            rsids: vec!["rs1057910".to_string()],
            explanation: "test explanation".to_string(),
        }
    }

    fn result_with_risk(drug: &str, risk: RiskAssessment) -> DrugResult {
        DrugResult {
            drug: drug.to_string(),
            gene: "CYP2C9".to_string(),
            phenotype: PhenotypeCode::Unknown,
            risk,
            rsids: Vec::new(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_diplotype_lookup() {
        assert_eq!(determine_diplotype(PhenotypeCode::Pm), "*4/*4");
        assert_eq!(determine_diplotype(PhenotypeCode::Im), "*1/*4");
        assert_eq!(determine_diplotype(PhenotypeCode::Nm), "*1/*1");
        assert_eq!(determine_diplotype(PhenotypeCode::Rm), "*1x2/*1");
        assert_eq!(determine_diplotype(PhenotypeCode::Um), "*1xN/*1");
        assert_eq!(determine_diplotype(PhenotypeCode::Urm), "*1xN/*1");
        assert_eq!(determine_diplotype(PhenotypeCode::Unknown), "*1/*1");
    }

    #[test]
    fn test_single_drug_report_round_trip() {
        let report = build_report("P-001", &result("Warfarin", "CYP2C9", PhenotypeCode::Pm), true);

        assert_eq!(report.patient_id, "P-001");
        assert_eq!(report.drug, "Warfarin");
        assert_eq!(report.pharmacogenomic_profile.diplotype, "*4/*4");
        assert_eq!(report.pharmacogenomic_profile.phenotype, "PM");
        assert_eq!(
            report.clinical_recommendation.action,
            "Reduce dose or consider alternative therapy"
        );
        assert_eq!(report.risk_assessment.risk_label, RiskLabel::Toxic);
        assert_eq!(report.risk_assessment.confidence_score, 0.92);
        assert!(report.drug_analyses.is_none());
        assert!(report.quality_metrics.vcf_parsing_success);
    }

    #[test]
    fn test_empty_explanation_gets_default() {
        let mut r = result("Warfarin", "CYP2C9", PhenotypeCode::Nm);
        r.explanation = String::new();
        let report = build_report("P-001", &r, true);
        assert_eq!(
            report.llm_generated_explanation.summary,
            "No explanation available"
        );
    }

    #[test]
    fn test_timestamp_is_utc_with_trailing_z() {
        let report = build_report("P-001", &result("Warfarin", "CYP2C9", PhenotypeCode::Nm), true);
        assert!(report.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn test_toxic_short_circuits_overall_severity_to_high() {
        let results = vec![
            result_with_risk(
                "Simvastatin",
                RiskAssessment {
                    risk_label: RiskLabel::Safe,
                    confidence_score: 0.60,
                    severity: Severity::Low,
                },
            ),
            result_with_risk(
                "Codeine",
                RiskAssessment {
                    risk_label: RiskLabel::AdjustDosage,
                    confidence_score: 0.75,
                    severity: Severity::Moderate,
                },
            ),
            result_with_risk(
                "Warfarin",
                RiskAssessment {
                    risk_label: RiskLabel::Toxic,
                    confidence_score: 0.92,
                    severity: Severity::Critical,
                },
            ),
        ];

        let (label, severity) = determine_overall_risk(&results);
        assert_eq!(label, RiskLabel::Toxic);
        // Not critical: toxicity always reports as high overall
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn test_overall_confidence_is_max_not_mean() {
        let results = vec![
            result("Simvastatin", "SLCO1B1", PhenotypeCode::Nm), // 0.60
            result("Codeine", "CYP2D6", PhenotypeCode::Im),      // 0.75
            result("Warfarin", "CYP2C9", PhenotypeCode::Pm),     // 0.92
        ];
        let report = build_multi_drug_report("P-001", &results, true);
        assert_eq!(report.risk_assessment.confidence_score, 0.92);
    }

    #[test]
    fn test_adjust_without_toxic_takes_max_rank_severity() {
        let results = vec![
            result_with_risk(
                "Codeine",
                RiskAssessment {
                    risk_label: RiskLabel::AdjustDosage,
                    confidence_score: 0.75,
                    severity: Severity::Moderate,
                },
            ),
            result_with_risk(
                "Simvastatin",
                RiskAssessment {
                    risk_label: RiskLabel::Safe,
                    confidence_score: 0.60,
                    severity: Severity::Critical,
                },
            ),
        ];
        let (label, severity) = determine_overall_risk(&results);
        assert_eq!(label, RiskLabel::AdjustDosage);
        assert_eq!(severity, Severity::Critical);
    }

    #[test]
    fn test_all_unknown_results_aggregate_safe_with_none_severity() {
        let results = vec![
            result("Warfarin", "CYP2C9", PhenotypeCode::Unknown),
            result("Codeine", "CYP2D6", PhenotypeCode::Unknown),
        ];
        let report = build_multi_drug_report("P-001", &results, true);

        assert_eq!(report.risk_assessment.risk_label, RiskLabel::Safe);
        assert_eq!(report.risk_assessment.severity, Severity::None);
        assert_eq!(report.risk_assessment.confidence_score, 0.0);
        for analysis in report.drug_analyses.as_deref().unwrap() {
            assert_eq!(analysis.pharmacogenomic_profile.phenotype, "Unknown");
        }
    }

    #[test]
    fn test_multi_drug_placeholder_profile_and_recommendation() {
        let results = vec![
            result("Warfarin", "CYP2C9", PhenotypeCode::Pm),
            result("Codeine", "CYP2D6", PhenotypeCode::Nm),
        ];
        let report = build_multi_drug_report("P-001", &results, true);

        assert_eq!(report.drug, "Warfarin, Codeine");
        assert!(report.pharmacogenomic_profile.primary_gene.is_empty());
        assert!(report.pharmacogenomic_profile.detected_variants.is_empty());
        assert_eq!(report.clinical_recommendation.action, "Toxic");
        assert_eq!(report.clinical_recommendation.dose_adjustment, "See drug analyses");
        assert_eq!(report.clinical_recommendation.monitoring, "See drug analyses");
        assert_eq!(report.drug_analyses.as_deref().unwrap().len(), 2);
    }

    #[test]
    fn test_summary_bucket_order_toxic_adjust_safe() {
        let results = vec![
            result("Simvastatin", "SLCO1B1", PhenotypeCode::Nm),
            result("Warfarin", "CYP2C9", PhenotypeCode::Pm),
            result("Codeine", "CYP2D6", PhenotypeCode::Im),
        ];
        let summary = generate_overall_summary(&results);
        assert_eq!(
            summary,
            "Drugs with potential toxicity risk: Warfarin. Consider dose reduction or alternative therapy. \
             Dose adjustment recommended for: Codeine. \
             Standard dosing appropriate for: Simvastatin."
        );
    }

    #[test]
    fn test_summary_fallback_when_no_drugs() {
        assert_eq!(
            generate_overall_summary(&[]),
            "Multi-drug analysis completed. Please refer to individual drug recommendations."
        );
    }

    #[test]
    fn test_unknown_risk_drugs_bucket_with_safe() {
        let results = vec![result("Fluorouracil", "DPYD", PhenotypeCode::Unknown)];
        let summary = generate_overall_summary(&results);
        assert_eq!(summary, "Standard dosing appropriate for: Fluorouracil.");
    }

    #[test]
    fn test_serialized_key_order_single_drug() {
        let report = build_report("P-001", &result("Warfarin", "CYP2C9", PhenotypeCode::Pm), true);
        let json = serde_json::to_string(&report).unwrap();

        let keys = [
            "\"patient_id\"",
            "\"drug\"",
            "\"timestamp\"",
            "\"risk_assessment\"",
            "\"risk_label\"",
            "\"confidence_score\"",
            "\"severity\"",
            "\"pharmacogenomic_profile\"",
            "\"primary_gene\"",
            "\"diplotype\"",
            "\"phenotype\"",
            "\"detected_variants\"",
            "\"clinical_recommendation\"",
            "\"action\"",
            "\"dose_adjustment\"",
            "\"monitoring\"",
            "\"llm_generated_explanation\"",
            "\"summary\"",
            "\"quality_metrics\"",
            "\"vcf_parsing_success\"",
        ];
        let mut last = 0;
        for key in keys {
            let pos = json[last..].find(key).unwrap_or_else(|| panic!("missing {key}"));
            last += pos;
        }
        // Single-drug reports carry no drug_analyses key at all
        assert!(!json.contains("\"drug_analyses\""));
    }

    #[test]
    fn test_serialized_multi_drug_has_analyses_before_quality_metrics() {
        let results = vec![result("Warfarin", "CYP2C9", PhenotypeCode::Pm)];
        let report = build_multi_drug_report("P-001", &results, true);
        let json = serde_json::to_string(&report).unwrap();

        let analyses_pos = json.find("\"drug_analyses\"").unwrap();
        let metrics_pos = json.find("\"quality_metrics\"").unwrap();
        assert!(analyses_pos < metrics_pos);
    }
}
