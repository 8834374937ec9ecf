use crate::model::{DuplicateReference, ReconResult, ReconSummary};

/// Compute summary statistics for a finished reconciliation.
pub fn compute_summary(
    result: &ReconResult,
    duplicates: &[DuplicateReference],
    internal_records: usize,
    provider_records: usize,
) -> ReconSummary {
    let mut fully_agreeing = 0;
    let mut amount_mismatches = 0;
    let mut status_mismatches = 0;

    for entry in &result.matched {
        if !entry.is_amount_match {
            amount_mismatches += 1;
        }
        if !entry.is_status_match {
            status_mismatches += 1;
        }
        if entry.agrees() {
            fully_agreeing += 1;
        }
    }

    ReconSummary {
        internal_records,
        provider_records,
        matched: result.matched.len(),
        fully_agreeing,
        amount_mismatches,
        status_mismatches,
        only_internal: result.only_internal.len(),
        only_provider: result.only_provider.len(),
        duplicate_references: duplicates.len(),
    }
}
