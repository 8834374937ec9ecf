//! `tally-recon`: two-source transaction reconciliation engine.
//!
//! The engine ([`reconcile`]) is a pure function over pre-loaded records.
//! Ingestion, pagination and CSV export are separate modules that feed it
//! or consume its result; none of them is reachable from the engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod ingest;
pub mod matcher;
pub mod model;
pub mod page;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{reconcile, reconcile_report};
pub use error::ReconError;
pub use export::ResultTable;
pub use model::{MatchedEntry, ReconReport, ReconResult, TransactionRecord};
pub use page::Paginator;
