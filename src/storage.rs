// ==============================================================================
// storage.rs - Report Persistence Interface
// ==============================================================================
// Description: Storage collaborator seam for composed analysis reports
// Author: Matt Barham
// Created: 2025-11-19
// Modified: 2025-11-19
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::composer::AnalysisReport;

/// External collaborator persisting composed reports.
///
/// The pipeline does not depend on success: a store failure is logged and
/// the report is still returned to the caller.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save_report(&self, patient_id: &str, drug: &str, report: &AnalysisReport)
        -> Result<()>;
}

/// No-op store for contexts without persistence (CLI, tests)
#[derive(Debug, Default)]
pub struct NullStore;

#[async_trait]
impl ReportStore for NullStore {
    async fn save_report(
        &self,
        patient_id: &str,
        drug: &str,
        _report: &AnalysisReport,
    ) -> Result<()> {
        debug!("NullStore: discarding report for patient {patient_id}, drug {drug}");
        Ok(())
    }
}
