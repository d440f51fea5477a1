// ==============================================================================
// parsers/vcf.rs - Pharmacogenomic VCF variant extractor
// ==============================================================================
// Description: Extracts supported pharmacogenomic markers from VCF 4.2 text
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-21
// Version: 1.1.0
// ==============================================================================
// References:
// - VCF 4.2 Spec: https://samtools.github.io/hts-specs/VCFv4.2.pdf
// ==============================================================================

use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Exact format header line required within the first 50 lines of the file
pub const VCF_FORMAT_HEADER: &str = "##fileformat=VCFv4.2";

/// Sentinel for a missing genotype call
pub const MISSING_GENOTYPE: &str = "./.";

/// Number of leading lines scanned for the format header
const HEADER_SCAN_LINES: usize = 50;

/// Minimum tab-separated columns for a usable data row (through first sample)
const MIN_COLUMNS: usize = 10;

/// Supported pharmacogenomic markers: rsID -> gene symbol.
///
/// Every extracted record derives its gene from this table; rows carrying
/// any other marker are skipped.
pub static SUPPORTED_MARKERS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("rs3892097", "CYP2D6"),
            ("rs4244285", "CYP2C19"),
            ("rs1057910", "CYP2C9"),
            ("rs4149056", "SLCO1B1"),
            ("rs1142345", "TPMT"),
            ("rs3918290", "DPYD"),
        ])
    });

/// Recognized variant extracted from one VCF data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    /// rsID (e.g., "rs1057910")
    pub rsid: String,

    /// Gene symbol from the supported-marker table
    pub gene: String,

    /// Genotype call from the first sample column (e.g., "0/1")
    pub genotype: String,
}

/// VCF extraction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VcfParseError {
    #[error("Invalid VCF format: missing {VCF_FORMAT_HEADER} header")]
    MissingFormatHeader,
}

/// Extractor for supported pharmacogenomic markers.
///
/// Row-level defects (too few columns, unrecognized marker, no genotype
/// call) never abort the parse; the offending row is skipped and counted.
/// Only a missing format header is fatal.
#[derive(Debug, Default)]
pub struct VcfExtractor {
    /// Count of data rows skipped (for reporting)
    pub skipped_count: usize,
}

impl VcfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract supported variants from raw VCF text.
    ///
    /// Result order follows file line order; duplicate markers are all
    /// retained. Calling twice on identical input yields identical output.
    pub fn extract(&mut self, content: &str) -> Result<Vec<VariantRecord>, VcfParseError> {
        if !validate_vcf_header(content) {
            return Err(VcfParseError::MissingFormatHeader);
        }

        self.skipped_count = 0;
        let mut variants = Vec::new();

        for line in content.lines() {
            match self.parse_line(line) {
                Some(variant) => variants.push(variant),
                None => {
                    if !line.trim().is_empty() && !line.starts_with('#') {
                        self.skipped_count += 1;
                    }
                }
            }
        }

        debug!(
            "VCF extraction: {} variants, {} data rows skipped",
            variants.len(),
            self.skipped_count
        );

        Ok(variants)
    }

    /// Parse a single line, returning None for header/comment/blank lines
    /// and for data rows that fail any per-field validity check.
    fn parse_line(&self, line: &str) -> Option<VariantRecord> {
        if line.trim().is_empty() || line.starts_with('#') {
            return None;
        }

        let columns: Vec<&str> = line.trim().split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return None; // Malformed row, not fatal
        }

        let rsid = columns[2].trim();
        let gene = *SUPPORTED_MARKERS.get(rsid)?;

        let genotype = resolve_genotype(columns[8], columns[9]);
        if genotype == MISSING_GENOTYPE || genotype.is_empty() {
            return None; // No genotype call available
        }

        Some(VariantRecord {
            rsid: rsid.to_string(),
            gene: gene.to_string(),
            genotype: genotype.to_string(),
        })
    }
}

/// Check that the exact format header appears within the first 50 lines
pub fn validate_vcf_header(content: &str) -> bool {
    content
        .lines()
        .take(HEADER_SCAN_LINES)
        .any(|line| line.trim_end() == VCF_FORMAT_HEADER)
}

/// Resolve the genotype value by zipping the colon-delimited FORMAT spec
/// against the sample values.
///
/// The `GT` subkey locates the genotype; when absent, sample index 0 is the
/// fallback. An index beyond the sample values yields the missing sentinel.
fn resolve_genotype<'a>(format_field: &str, sample_data: &'a str) -> &'a str {
    let format_keys: Vec<&str> = format_field.split(':').collect();
    let sample_values: Vec<&str> = sample_data.split(':').collect();

    let gt_index = format_keys.iter().position(|&k| k == "GT").unwrap_or(0);

    sample_values.get(gt_index).copied().unwrap_or(MISSING_GENOTYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "##fileformat=VCFv4.2";

    fn row(rsid: &str, format: &str, sample: &str) -> String {
        format!("22\t42522613\t{rsid}\tG\tA\t.\tPASS\t.\t{format}\t{sample}")
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let content = format!("{}\n{}", "##source=test", row("rs1057910", "GT", "1/1"));
        let mut extractor = VcfExtractor::new();
        assert_eq!(
            extractor.extract(&content),
            Err(VcfParseError::MissingFormatHeader)
        );
    }

    #[test]
    fn test_header_must_be_in_first_50_lines() {
        let mut lines = vec!["##source=test".to_string(); 50];
        lines.push(HEADER.to_string());
        lines.push(row("rs1057910", "GT", "1/1"));
        let content = lines.join("\n");

        let mut extractor = VcfExtractor::new();
        assert_eq!(
            extractor.extract(&content),
            Err(VcfParseError::MissingFormatHeader)
        );
    }

    #[test]
    fn test_extracts_supported_marker() {
        let content = format!("{HEADER}\n{}", row("rs1057910", "GT:DP", "1/1:30"));
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(
            variants,
            vec![VariantRecord {
                rsid: "rs1057910".to_string(),
                gene: "CYP2C9".to_string(),
                genotype: "1/1".to_string(),
            }]
        );
        assert_eq!(extractor.skipped_count, 0);
    }

    #[test]
    fn test_unrecognized_marker_skipped_silently() {
        let content = format!(
            "{HEADER}\n{}\n{}",
            row("rs9999999", "GT", "0/1"),
            row("rs4244285", "GT", "0/1")
        );
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].gene, "CYP2C19");
        assert_eq!(extractor.skipped_count, 1);
    }

    #[test]
    fn test_short_row_skipped() {
        let content = format!("{HEADER}\n22\t100\trs1057910\tG\tA");
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert!(variants.is_empty());
        assert_eq!(extractor.skipped_count, 1);
    }

    #[test]
    fn test_comments_and_blank_lines_not_counted_as_skips() {
        let content = format!(
            "{HEADER}\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n\n{}",
            row("rs3892097", "GT", "0/0")
        );
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(variants.len(), 1);
        assert_eq!(extractor.skipped_count, 0);
    }

    #[test]
    fn test_gt_subkey_located_mid_format() {
        let content = format!("{HEADER}\n{}", row("rs1142345", "DP:GT:GQ", "30:0/1:99"));
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(variants[0].genotype, "0/1");
    }

    #[test]
    fn test_missing_gt_falls_back_to_first_sample_value() {
        let content = format!("{HEADER}\n{}", row("rs1142345", "DP:GQ", "0/1:99"));
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(variants[0].genotype, "0/1");
    }

    #[test]
    fn test_gt_index_beyond_sample_values_drops_row() {
        // GT at index 2 but only one sample value available
        let content = format!("{HEADER}\n{}", row("rs1142345", "DP:GQ:GT", "30"));
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert!(variants.is_empty());
        assert_eq!(extractor.skipped_count, 1);
    }

    #[test]
    fn test_missing_sentinel_genotype_dropped() {
        let content = format!("{HEADER}\n{}", row("rs4149056", "GT", "./."));
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert!(variants.is_empty());
        assert_eq!(extractor.skipped_count, 1);
    }

    #[test]
    fn test_duplicates_retained_in_file_order() {
        let content = format!(
            "{HEADER}\n{}\n{}\n{}",
            row("rs1057910", "GT", "1/1"),
            row("rs4244285", "GT", "0/1"),
            row("rs1057910", "GT", "0/0")
        );
        let mut extractor = VcfExtractor::new();
        let variants = extractor.extract(&content).unwrap();

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].genotype, "1/1");
        assert_eq!(variants[1].rsid, "rs4244285");
        assert_eq!(variants[2].genotype, "0/0");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let content = format!(
            "{HEADER}\n{}\n{}",
            row("rs1057910", "GT", "1/1"),
            row("rs3918290", "GT", "0/1")
        );
        let first = VcfExtractor::new().extract(&content).unwrap();
        let second = VcfExtractor::new().extract(&content).unwrap();
        assert_eq!(first, second);
    }
}
