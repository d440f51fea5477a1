// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for pharmacogenomic input file formats
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-18
// Version: 1.0.0
// ==============================================================================

pub mod vcf;

pub use vcf::{
    validate_vcf_header, VariantRecord, VcfExtractor, VcfParseError, MISSING_GENOTYPE,
    SUPPORTED_MARKERS, VCF_FORMAT_HEADER,
};
