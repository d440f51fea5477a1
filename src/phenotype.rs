// ==============================================================================
// phenotype.rs - Genotype to Phenotype Resolution
// ==============================================================================
// Description: Maps genotype call strings to metabolizer phenotype codes
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-18
// Version: 1.0.0
// ==============================================================================
// Rule table (literal genotype strings, no allele-order normalization):
//   "1/1"              -> PM
//   "0/1"              -> IM
//   "0/0"              -> NM
//   "1/2" | "2/1"      -> UM
//   "1x2/1" | "1/1x2"  -> RM
//   missing/empty/else -> Unknown
// ==============================================================================

use crate::models::PhenotypeCode;
use crate::parsers::MISSING_GENOTYPE;

/// Resolve a genotype call string to a metabolizer phenotype code.
///
/// Pure and total: every input maps to a code, with anything outside the
/// literal rule table resolving to `Unknown`.
pub fn resolve_phenotype(genotype: &str) -> PhenotypeCode {
    if genotype.is_empty() || genotype == MISSING_GENOTYPE {
        return PhenotypeCode::Unknown;
    }

    match genotype {
        "1/1" => PhenotypeCode::Pm,
        "0/1" => PhenotypeCode::Im,
        "0/0" => PhenotypeCode::Nm,
        "1/2" | "2/1" => PhenotypeCode::Um,
        "1x2/1" | "1/1x2" => PhenotypeCode::Rm,
        _ => PhenotypeCode::Unknown,
    }
}
