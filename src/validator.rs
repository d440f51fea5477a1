// ==============================================================================
// validator.rs - Request Intake Validation
// ==============================================================================
// Description: Validates drug selections and uploaded VCF input before analysis
// Author: Matt Barham
// Created: 2025-11-19
// Modified: 2025-11-23
// Version: 1.1.0
// ==============================================================================
// Security: Allowlist-only file extension, hard size limit
// ==============================================================================

use thiserror::Error;
use tracing::debug;

use crate::risk::lookup_drug;

/// Maximum accepted VCF upload size
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5 MB

/// Intake validation errors; the only request-rejecting failures besides a
/// malformed VCF header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Drug input is required")]
    DrugRequired,

    #[error("Unsupported drug: {0}")]
    UnsupportedDrug(String),

    #[error("Patient ID is required")]
    PatientIdRequired,

    #[error("VCF input is required")]
    EmptyInput,

    #[error("Invalid file extension '{0}'. Only .vcf files are allowed.")]
    InvalidExtension(String),

    #[error("File too large ({size} bytes). Maximum allowed size is {max} bytes.")]
    FileTooLarge { size: usize, max: usize },
}

/// Parse a comma-separated drug selection into canonical drug names.
///
/// Names are trimmed and matched case-insensitively against the primary
/// gene map; input order is preserved and the first unsupported name is
/// reported. At least one recognized drug is required.
pub fn parse_drug_list(input: &str) -> Result<Vec<String>, RequestError> {
    let names: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        return Err(RequestError::DrugRequired);
    }

    let mut drugs = Vec::with_capacity(names.len());
    for name in names {
        let (canonical, _gene) =
            lookup_drug(name).ok_or_else(|| RequestError::UnsupportedDrug(name.to_uppercase()))?;
        drugs.push(canonical.to_string());
    }

    debug!("Validated drug selection: {:?}", drugs);
    Ok(drugs)
}

/// Require a non-empty patient identifier
pub fn validate_patient_id(patient_id: &str) -> Result<(), RequestError> {
    if patient_id.trim().is_empty() {
        return Err(RequestError::PatientIdRequired);
    }
    Ok(())
}

/// Require non-empty raw VCF input
pub fn validate_raw_input(raw: &str) -> Result<(), RequestError> {
    if raw.trim().is_empty() {
        return Err(RequestError::EmptyInput);
    }
    Ok(())
}

/// Allowlist check: only .vcf files are accepted
pub fn validate_file_extension(filename: &str) -> Result<(), RequestError> {
    let name = filename.trim();
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("vcf") && !stem.is_empty() => Ok(()),
        Some((_, ext)) => Err(RequestError::InvalidExtension(format!(".{}", ext.to_lowercase()))),
        None => Err(RequestError::InvalidExtension(String::new())),
    }
}

/// Enforce the upload size limit
pub fn validate_file_size(size: usize) -> Result<(), RequestError> {
    if size > MAX_FILE_SIZE {
        return Err(RequestError::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }
    Ok(())
}
