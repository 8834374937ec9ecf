use crate::config::ReconConfig;
use crate::matcher::{build_matched_entry, KeyedIndex};
use crate::model::{
    DuplicateReference, ReconMeta, ReconReport, ReconResult, Side, TransactionRecord,
};
use crate::summary::compute_summary;

/// Partition two record sets by `transaction_reference` into matched,
/// internal-only and provider-only.
///
/// Pure and total: inputs are never mutated, malformed records never fail.
/// A repeated reference within one side keeps its first-seen position but
/// the last record for it wins; earlier records drop out silently (see
/// [`reconcile_report`] to have them listed).
pub fn reconcile(internal: &[TransactionRecord], provider: &[TransactionRecord]) -> ReconResult {
    let internal_index = KeyedIndex::build(internal);
    let provider_index = KeyedIndex::build(provider);
    partition(&internal_index, &provider_index)
}

/// Same partition as [`reconcile`], plus duplicate references, summary
/// counts and run metadata.
pub fn reconcile_report(
    internal: &[TransactionRecord],
    provider: &[TransactionRecord],
    config: Option<&ReconConfig>,
) -> ReconReport {
    let internal_index = KeyedIndex::build(internal);
    let provider_index = KeyedIndex::build(provider);
    let result = partition(&internal_index, &provider_index);

    let mut duplicates: Vec<DuplicateReference> = internal_index.duplicates(Side::Internal);
    duplicates.extend(provider_index.duplicates(Side::Provider));
    for dup in &duplicates {
        tracing::debug!(
            side = %dup.side,
            reference = %dup.reference,
            occurrences = dup.occurrences,
            "duplicate reference, keeping last occurrence"
        );
    }

    let summary = compute_summary(&result, &duplicates, internal.len(), provider.len());
    tracing::debug!(
        matched = summary.matched,
        only_internal = summary.only_internal,
        only_provider = summary.only_provider,
        "reconciliation complete"
    );

    ReconReport {
        meta: ReconMeta {
            config_name: config.and_then(|c| c.name.clone()),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        result,
        duplicates,
    }
}

fn partition(internal: &KeyedIndex<'_>, provider: &KeyedIndex<'_>) -> ReconResult {
    let mut matched = Vec::new();
    let mut only_internal = Vec::new();
    let mut only_provider = Vec::new();

    for (key, internal_tx) in internal.iter() {
        match provider.get(key) {
            Some(provider_tx) => matched.push(build_matched_entry(internal_tx, provider_tx)),
            None => only_internal.push(internal_tx.clone()),
        }
    }

    for (key, provider_tx) in provider.iter() {
        if !internal.contains(key) {
            only_provider.push(provider_tx.clone());
        }
    }

    ReconResult {
        matched,
        only_internal,
        only_provider,
    }
}
